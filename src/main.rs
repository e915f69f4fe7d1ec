// main.rs
mod api_auth;
mod api_routes;
mod campaign;
mod campaign_generator;
mod config;
mod error;
mod image_api;
mod image_prompt;
mod insights;
mod instagram_publisher;
mod interactive_mode;
mod logging_setup;
mod meta_client;
mod questions;
mod response_validator;
mod session_manager;
mod user_store;
mod wizard;

use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use reqwest::Client;

use api_routes::AppState;
use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    logging_setup::setup_logging()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    info!("Starting Tuki campaign builder");

    let config = Config::from_env();
    let client = Client::new();

    if config.interactive {
        let config_clone = config.clone();
        let client_clone = client.clone();

        // The console wizard runs on its own thread and runtime.
        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to start console runtime: {}", e);
                    return;
                }
            };
            rt.block_on(async {
                if let Err(e) = interactive_mode::run_interactive_mode(config_clone, client_clone).await {
                    error!("Error in interactive mode: {}", e);
                }
            });
        });
    }

    let bind_addr = config.bind_addr.clone();
    let api_key = config.api_key.clone();
    let state = web::Data::new(AppState::new(config, client));
    info!("Listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(api_auth::ApiKey::new(api_key.clone()))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(api_routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
