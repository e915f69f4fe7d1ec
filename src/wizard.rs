// wizard.rs
use crate::campaign::UserData;
use crate::error::TukiError;
use crate::questions::{Question, QuestionId, ResponseKind, NO_SOCIAL_NETWORKS, QUESTIONS};
use crate::response_validator::validate_response;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

pub const WELCOME_MESSAGE: &str = "¡Hola! 👋 Soy Tuki, tu asistente de marketing digital. Estoy aquí para ayudarte a crear campañas increíbles para tu negocio. Te voy a hacer algunas preguntas rápidas para conocerte mejor. ¿Estás listo?";
pub const RESTART_MESSAGE: &str = "¡Perfecto! Vamos a revisar tus respuestas. Te haré las preguntas nuevamente 😊";
pub const COMPLETION_MESSAGE: &str = "¡Perfecto! Ya tengo toda la información que necesito. Ahora voy a preparar un resumen de tu briefing 📋";
pub const NOT_SPECIFIED: &str = "No especificado";

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    #[serde(rename = "isBot")]
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(text: impl Into<String>, is_bot: bool) -> Self {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            is_bot,
            timestamp: Utc::now(),
        }
    }
}

/// What happened after feeding an answer to the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Blank input; nothing recorded.
    Ignored,
    /// The answer failed validation and the same question stays open.
    Rejected { hint: &'static str },
    /// The answer was stored and the next question was asked.
    Asked { question: QuestionId },
    /// Multi-choice selection changed.
    Toggled { selected: Vec<String> },
    Completed,
}

/// Human-readable briefing shown once onboarding ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingSummary {
    #[serde(rename = "productoServicio")]
    pub product_service: String,
    #[serde(rename = "clienteIdeal")]
    pub ideal_customer: String,
    #[serde(rename = "objetivoMarketing")]
    pub marketing_objective: String,
    #[serde(rename = "redesSociales")]
    pub social_networks: String,
}

fn or_not_specified(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

/// Linear question sequencer for the onboarding chat.
#[derive(Debug, Clone, Default)]
pub struct OnboardingWizard {
    current: usize,
    user_data: UserData,
    messages: Vec<ChatMessage>,
    complete: bool,
}

impl OnboardingWizard {
    /// Creates a wizard that has already greeted the user and asked the
    /// first question.
    pub fn start() -> Self {
        let mut wizard = OnboardingWizard::default();
        wizard.bot_says(WELCOME_MESSAGE);
        wizard.ask_current();
        wizard
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        if self.complete {
            return None;
        }
        QUESTIONS.get(self.current)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn user_data(&self) -> &UserData {
        &self.user_data
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn selected(&self) -> &[String] {
        &self.user_data.social_networks
    }

    fn bot_says(&mut self, text: &str) {
        self.messages.push(ChatMessage::new(text, true));
    }

    fn user_says(&mut self, text: &str) {
        self.messages.push(ChatMessage::new(text, false));
    }

    fn ask_current(&mut self) {
        if let Some(question) = QUESTIONS.get(self.current) {
            debug!("Asking question {}", question.id.as_str());
            self.bot_says(question.text);
        }
    }

    fn expect_kind(&self, kind: ResponseKind) -> Result<&'static Question, TukiError> {
        let question = self
            .current_question()
            .ok_or_else(|| TukiError::Validation("onboarding is already complete".to_string()))?;
        if question.kind != kind {
            return Err(TukiError::Validation(format!(
                "question '{}' does not accept a {:?} answer",
                question.id.as_str(),
                kind
            )));
        }
        Ok(question)
    }

    fn store(&mut self, question: QuestionId, value: &str) {
        match question {
            QuestionId::ProductService => self.user_data.product_service = value.to_string(),
            QuestionId::IdealCustomer => self.user_data.ideal_customer = value.to_string(),
            QuestionId::MarketingObjective => {
                self.user_data.marketing_objective = value.to_string()
            }
            QuestionId::SocialNetworks => {}
        }
    }

    fn advance(&mut self) -> Outcome {
        self.current += 1;
        match QUESTIONS.get(self.current) {
            Some(next) => {
                self.ask_current();
                Outcome::Asked { question: next.id }
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) -> Outcome {
        self.current = QUESTIONS.len();
        self.complete = true;
        self.bot_says(COMPLETION_MESSAGE);
        info!("Onboarding complete: {:?}", self.user_data);
        Outcome::Completed
    }

    /// Free-text answer for the current question.
    pub fn submit_text(&mut self, input: &str) -> Result<Outcome, TukiError> {
        let question = self.expect_kind(ResponseKind::FreeText)?;
        if input.trim().is_empty() {
            return Ok(Outcome::Ignored);
        }

        self.user_says(input);
        if let Err(hint) = validate_response(question.id, input) {
            info!("Answer to {} rejected", question.id.as_str());
            self.bot_says(hint);
            return Ok(Outcome::Rejected { hint });
        }

        self.store(question.id, input.trim());
        Ok(self.advance())
    }

    /// Single-choice answer; the option must belong to the current question.
    pub fn select_option(&mut self, option: &str) -> Result<Outcome, TukiError> {
        let question = self.expect_kind(ResponseKind::SingleChoice)?;
        if !question.has_option(option) {
            return Err(TukiError::Validation(format!("unknown option '{}'", option)));
        }

        self.user_says(option);
        self.store(question.id, option);
        Ok(self.advance())
    }

    /// Adds or removes an option from the multi-choice selection.
    pub fn toggle_option(&mut self, option: &str) -> Result<Outcome, TukiError> {
        let question = self.expect_kind(ResponseKind::MultiChoice)?;
        if !question.has_option(option) {
            return Err(TukiError::Validation(format!("unknown option '{}'", option)));
        }

        let selected = &mut self.user_data.social_networks;
        if let Some(pos) = selected.iter().position(|s| s == option) {
            selected.remove(pos);
        } else {
            selected.push(option.to_string());
        }
        Ok(Outcome::Toggled {
            selected: selected.clone(),
        })
    }

    /// Closes the multi-choice question and completes onboarding.
    pub fn confirm_selection(&mut self) -> Result<Outcome, TukiError> {
        self.expect_kind(ResponseKind::MultiChoice)?;
        let echoed = if self.user_data.social_networks.is_empty() {
            NO_SOCIAL_NETWORKS.to_string()
        } else {
            self.user_data.social_networks.join(", ")
        };
        self.user_says(&echoed);
        Ok(self.finish())
    }

    /// Clears every answer and asks the questions again.
    pub fn restart(&mut self) {
        *self = OnboardingWizard::default();
        self.bot_says(RESTART_MESSAGE);
        self.ask_current();
    }

    pub fn summary(&self) -> OnboardingSummary {
        let networks = if self.user_data.social_networks.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            self.user_data.social_networks.join(", ")
        };
        OnboardingSummary {
            product_service: or_not_specified(&self.user_data.product_service),
            ideal_customer: or_not_specified(&self.user_data.ideal_customer),
            marketing_objective: or_not_specified(&self.user_data.marketing_objective),
            social_networks: networks,
        }
    }
}
