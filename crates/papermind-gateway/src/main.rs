use clap::Parser;
use std::io;

use papermind_core::logging::{init_logging, init_with_filter};
use papermind_core::Config;
use papermind_gateway::{run_server_with_config, GatewayConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "papermind-gateway")]
#[command(about = "Relay between the papermind shells and a local model server")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Model server base URL (OpenAI-compatible, up to and including /v1)
    #[arg(long)]
    llm_base_url: Option<String>,

    /// Model identifier sent with every completion
    #[arg(long)]
    model: Option<String>,

    /// API key for the model server, if it wants one
    #[arg(long)]
    api_key: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    match cli.log_level.as_deref() {
        Some(level) => init_with_filter(level),
        None => init_logging(cli.debug),
    }

    let config = Config::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut backend = config.backend;
    if let Some(base_url) = cli.llm_base_url {
        backend.base_url = base_url;
    }
    if let Some(model) = cli.model {
        backend.model = model;
    }
    if let Some(api_key) = cli.api_key {
        backend.api_key = Some(api_key);
    }
    if let Some(temperature) = cli.temperature {
        backend.temperature = temperature;
    }

    log::info!("Starting papermind gateway on {}:{}", cli.host, cli.port);
    log::info!("LLM Configuration:");
    log::info!("  Base URL: {}", backend.base_url);
    log::info!("  Model: {}", backend.model);
    log::info!("  Temperature: {}", backend.temperature);

    if cli.debug {
        log::debug!("Debug mode enabled");
        log::debug!("  API key set: {}", backend.api_key.is_some());
    }

    run_server_with_config(GatewayConfig {
        host: cli.host,
        port: cli.port,
        backend,
    })
    .await
}
