// questions.rs
use crate::campaign::{OBJECTIVE_LEADS, OBJECTIVE_SALES, OBJECTIVE_VISIBILITY};
use serde::Serialize;

pub const NO_SOCIAL_NETWORKS: &str = "No tengo redes activas aún";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionId {
    #[serde(rename = "productoServicio")]
    ProductService,
    #[serde(rename = "clienteIdeal")]
    IdealCustomer,
    #[serde(rename = "objetivoMarketing")]
    MarketingObjective,
    #[serde(rename = "redesSociales")]
    SocialNetworks,
}

impl QuestionId {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionId::ProductService => "productoServicio",
            QuestionId::IdealCustomer => "clienteIdeal",
            QuestionId::MarketingObjective => "objetivoMarketing",
            QuestionId::SocialNetworks => "redesSociales",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    FreeText,
    SingleChoice,
    MultiChoice,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: &'static str,
    pub kind: ResponseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    pub options: &'static [&'static str],
}

impl Question {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| *o == option)
    }
}

pub static QUESTIONS: [Question; 4] = [
    Question {
        id: QuestionId::ProductService,
        text: "¡Perfecto! Empecemos conociendo tu negocio. ¿Qué tipo de producto o servicio ofrecés? Contame con detalles para poder ayudarte mejor 😊",
        kind: ResponseKind::FreeText,
        placeholder: Some("Por ejemplo: Vendo ropa deportiva para mujeres, soy contador, tengo una panadería..."),
        options: &[],
    },
    Question {
        id: QuestionId::IdealCustomer,
        text: "¡Genial! Ahora contame, ¿quién es tu cliente ideal? Pensá en esa persona que realmente necesita lo que ofrecés 🎯",
        kind: ResponseKind::FreeText,
        placeholder: Some("Por ejemplo: Mujeres de 25-40 años que hacen ejercicio, pequeños empresarios, familias del barrio..."),
        options: &[],
    },
    Question {
        id: QuestionId::MarketingObjective,
        text: "Excelente. ¿Cuál es tu principal objetivo de marketing en este momento? 🚀",
        kind: ResponseKind::SingleChoice,
        placeholder: None,
        options: &[OBJECTIVE_VISIBILITY, OBJECTIVE_LEADS, OBJECTIVE_SALES],
    },
    Question {
        id: QuestionId::SocialNetworks,
        text: "¡Última pregunta! ¿Tenés redes sociales activas? Seleccioná todas las que usás 📱",
        kind: ResponseKind::MultiChoice,
        placeholder: None,
        options: &[
            "Instagram",
            "Facebook",
            "Google My Business",
            "Email Marketing",
            NO_SOCIAL_NETWORKS,
        ],
    },
];
