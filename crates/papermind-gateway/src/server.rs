use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;

use papermind_core::BackendConfig;

use crate::handlers;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub backend: BackendConfig,
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::health::handler))
        .route("/health", web::get().to(handlers::health::handler))
        .route("/chat", web::post().to(handlers::chat::handler));
}

pub async fn run_server_with_config(config: GatewayConfig) -> io::Result<()> {
    log::info!(
        "Initializing gateway on {}:{}, backend: {}",
        config.host,
        config.port,
        config.backend.base_url
    );

    let state = web::Data::new(AppState::from_backend(&config.backend));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
