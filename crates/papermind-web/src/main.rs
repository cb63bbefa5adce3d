use clap::Parser;
use std::io;
use std::path::PathBuf;

use papermind_core::logging::{init_logging, init_with_filter};
use papermind_core::Config;
use papermind_web::{run_server_with_config, WebConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "papermind-web")]
#[command(about = "Browser chat over your PDFs, backed by the papermind gateway")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "8501")]
    port: u16,

    /// Completion gateway URL
    #[arg(long)]
    gateway_url: Option<String>,

    /// Directory holding saved conversations
    #[arg(long)]
    conversations_dir: Option<PathBuf>,

    /// Maximum document characters placed in each prompt
    #[arg(long)]
    context_chars: Option<usize>,

    /// Seconds to wait for the gateway before giving up
    #[arg(long)]
    timeout_secs: Option<u64>,

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

    let mut config = Config::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if let Some(url) = cli.gateway_url {
        config.gateway_url = url;
    }
    if let Some(dir) = cli.conversations_dir {
        config.conversations_dir = dir;
    }
    if let Some(chars) = cli.context_chars {
        config.context_chars = chars;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs;
    }

    log::info!("Starting papermind web shell on {}:{}", cli.host, cli.port);
    if cli.debug {
        log::debug!("Debug mode enabled");
        log::debug!("  Context characters: {}", config.context_chars);
        log::debug!("  Request timeout: {}s", config.request_timeout_secs);
    }

    run_server_with_config(WebConfig {
        host: cli.host,
        port: cli.port,
        config,
    })
    .await
}
