use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use papermind_core::{ChatSession, Config, FileSnapshotStore, PromptComposer, SnapshotStore};
use papermind_llm::HttpGateway;

use crate::handlers;
use crate::state::AppState;

/// Uploads travel base64-encoded inside JSON, so the default 2 MB cap is far too small.
const JSON_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub config: Config,
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT))
        .route("/", web::get().to(handlers::page::index))
        .service(
            web::scope("/api/v1")
                .route("/conversation", web::get().to(handlers::conversation::get))
                .route(
                    "/conversation/new",
                    web::post().to(handlers::conversation::reset),
                )
                .route("/chat", web::post().to(handlers::chat::handler))
                .route("/documents", web::post().to(handlers::documents::upload))
                .route("/snapshots", web::get().to(handlers::snapshots::list))
                .route("/snapshots", web::post().to(handlers::snapshots::save))
                .route(
                    "/snapshots",
                    web::delete().to(handlers::snapshots::delete_all),
                )
                .route(
                    "/snapshots/{id}/load",
                    web::post().to(handlers::snapshots::load),
                )
                .route(
                    "/snapshots/{id}",
                    web::delete().to(handlers::snapshots::delete),
                )
                .route("/status", web::get().to(handlers::status::handler)),
        );
}

pub async fn run_server_with_config(web_config: WebConfig) -> io::Result<()> {
    let config = web_config.config;
    log::info!(
        "Initializing web shell on {}:{}, gateway: {}, conversations: {:?}",
        web_config.host,
        web_config.port,
        config.gateway_url,
        config.conversations_dir
    );

    let store = FileSnapshotStore::new(&config.conversations_dir);
    store
        .init()
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;

    let gateway = Arc::new(
        HttpGateway::new(&config.gateway_url, &config.user_id)
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
            .with_health_timeout(Duration::from_secs(config.health_timeout_secs)),
    );

    if !gateway.health().await {
        log::warn!(
            "Gateway at {} is not reachable yet; questions will fail until it is up",
            config.gateway_url
        );
    }

    let session = ChatSession::new(Arc::new(store), gateway.clone())
        .with_composer(PromptComposer::new(config.context_chars));
    let state = web::Data::new(AppState::new(session, gateway, config.gateway_url));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind((web_config.host.as_str(), web_config.port))?
    .run()
    .await
}
