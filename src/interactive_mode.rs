// interactive_mode.rs
use crate::campaign_generator::create_campaign;
use crate::config::Config;
use crate::error::TukiError;
use crate::image_api::ImageClient;
use crate::image_prompt::{build_image_prompt, is_image_relevant};
use crate::questions::ResponseKind;
use crate::user_store::UserDataStore;
use crate::wizard::{OnboardingWizard, Outcome};

use log::{error, info};
use reqwest::Client;
use std::io::{self, Write};

const EXIT_COMMAND: &str = "exit";
const EDIT_COMMAND: &str = "editar";
const CONFIRM_COMMANDS: [&str; 2] = ["listo", "continuar"];

/// Maps one console line onto the wizard. Choice questions accept the
/// option number or its text; multi-choice confirms on a blank line or
/// "listo".
pub fn handle_line(wizard: &mut OnboardingWizard, line: &str) -> Result<Outcome, TukiError> {
    let line = line.trim();
    let question = match wizard.current_question() {
        Some(question) => question,
        None => return Err(TukiError::Validation("onboarding is already complete".to_string())),
    };

    let option = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.options.get(i).copied())
        .unwrap_or(line);

    match question.kind {
        ResponseKind::FreeText => wizard.submit_text(line),
        ResponseKind::SingleChoice => wizard.select_option(option),
        ResponseKind::MultiChoice => {
            if line.is_empty() || CONFIRM_COMMANDS.contains(&line.to_lowercase().as_str()) {
                wizard.confirm_selection()
            } else {
                wizard.toggle_option(option)
            }
        }
    }
}

fn print_new_messages(wizard: &OnboardingWizard, shown: &mut usize) {
    for message in &wizard.messages()[*shown..] {
        if message.is_bot {
            println!("\nTUKI:\n{}", message.text);
        }
    }
    *shown = wizard.messages().len();
}

fn print_options(wizard: &OnboardingWizard) {
    if let Some(question) = wizard.current_question() {
        for (i, option) in question.options.iter().enumerate() {
            let mark = if wizard.selected().iter().any(|s| s == option) { "x" } else { " " };
            match question.kind {
                ResponseKind::MultiChoice => println!("  [{}] {}. {}", mark, i + 1, option),
                _ => println!("  {}. {}", i + 1, option),
            }
        }
        if question.kind == ResponseKind::MultiChoice {
            println!("  (escribí \"listo\" para continuar)");
        }
    }
}

async fn present_results(wizard: &OnboardingWizard, images: &ImageClient, store: &UserDataStore) {
    if let Err(e) = store.save(wizard.user_data()).await {
        error!("Failed to store user data: {}", e);
    }

    let summary = wizard.summary();
    println!("\n¡Perfecto! Tu briefing está listo");
    println!("- Producto o servicio: {}", summary.product_service);
    println!("- Cliente ideal: {}", summary.ideal_customer);
    println!("- Objetivo de marketing: {}", summary.marketing_objective);
    println!("- Redes sociales: {}", summary.social_networks);

    let campaign = create_campaign(wizard.user_data(), None, &mut rand::thread_rng());
    info!("Console campaign generated: {:?}", campaign);
    println!("\n¡Tu campaña está lista! 🎉");
    println!("Título: {}", campaign.title);
    println!("Texto: {}", campaign.body);
    println!("Público objetivo: {}", campaign.target_audience);
    println!("Canal: {}", campaign.channel);
    println!("Presupuesto: {}", campaign.budget);
    println!("Duración: {}", campaign.duration);

    let prompt = build_image_prompt(&wizard.user_data().product_service);
    match images.generate_image(&prompt).await {
        Ok(url) if is_image_relevant(&url, &wizard.user_data().product_service) => {
            println!("Imagen sugerida: {}", url)
        }
        Ok(url) => println!("Imagen sugerida (genérica): {}", url),
        Err(e) => error!("Image lookup failed: {}", e),
    }
    println!("\n(escribí \"{}\" para revisar tus respuestas o \"{}\" para salir)", EDIT_COMMAND, EXIT_COMMAND);
}

pub async fn run_interactive_mode(config: Config, client: Client) -> Result<(), Box<dyn std::error::Error>> {
    let images = ImageClient::new(client, config.unsplash_access_key.clone());
    let store = UserDataStore::new(&config.storage_dir);

    let mut wizard = OnboardingWizard::start();
    let mut shown = 0;
    print_new_messages(&wizard, &mut shown);
    print_options(&wizard);

    loop {
        print!("\nVos:\n");
        io::stdout().flush()?;
        let mut user_input = String::new();
        if io::stdin().read_line(&mut user_input)? == 0 {
            info!("Console input closed");
            break;
        }
        let user_input = user_input.trim().to_string();
        info!("User input: {}", user_input);

        if user_input.eq_ignore_ascii_case(EXIT_COMMAND) {
            info!("User requested exit");
            break;
        }

        if user_input.eq_ignore_ascii_case(EDIT_COMMAND) {
            wizard.restart();
            shown = 0;
        } else if wizard.is_complete() {
            continue;
        } else {
            match handle_line(&mut wizard, &user_input) {
                Ok(Outcome::Completed) => {
                    print_new_messages(&wizard, &mut shown);
                    tokio::time::sleep(config.simulated_delay).await;
                    present_results(&wizard, &images, &store).await;
                    continue;
                }
                Ok(_) => {}
                Err(e) => println!("\nTUKI:\n{}", e),
            }
        }

        print_new_messages(&wizard, &mut shown);
        print_options(&wizard);
    }

    Ok(())
}
