mod command;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use papermind_core::logging::init_with_filter;
use papermind_core::{
    ChatSession, Config, Conversation, FileSnapshotStore, PromptComposer, Role, SnapshotId,
    SnapshotStore, GREETING,
};
use papermind_llm::HttpGateway;
use papermind_pdf::{extract_documents, UploadedFile};

use command::{ReplCommand, HELP};

#[derive(Parser)]
#[command(name = "papermind")]
#[command(about = "Ask questions about your PDFs from the terminal")]
#[command(version)]
struct Cli {
    /// Completion gateway URL
    #[arg(long, env = "PAPERMIND_GATEWAY_URL")]
    gateway_url: Option<String>,

    /// Directory holding saved conversations
    #[arg(long, env = "PAPERMIND_CONVERSATIONS_DIR")]
    conversations_dir: Option<PathBuf>,

    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive chat
    Chat {
        /// PDF files to load before the first question
        #[arg(long = "pdf")]
        pdfs: Vec<PathBuf>,
    },
    /// Ask a single question and print the answer
    Ask {
        /// Question text
        question: String,

        /// PDF files to ground the question in
        #[arg(long = "pdf")]
        pdfs: Vec<PathBuf>,
    },
    /// Manage saved conversations
    Snapshots {
        #[command(subcommand)]
        action: SnapshotAction,
    },
}

#[derive(Subcommand)]
enum SnapshotAction {
    /// List saved conversations, newest first
    List,
    /// Print a saved conversation
    Show { id: String },
    /// Delete one saved conversation
    Delete { id: String },
    /// Delete every saved conversation
    DeleteAll,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_with_filter(if cli.debug { "debug" } else { "warn" });

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(url) = cli.gateway_url {
        config.gateway_url = url;
    }
    if let Some(dir) = cli.conversations_dir {
        config.conversations_dir = dir;
    }

    if cli.debug {
        eprintln!("{}", "[DEBUG] Debug mode enabled".dimmed());
        eprintln!(
            "{}",
            format!("[DEBUG] Gateway URL: {}", config.gateway_url).dimmed()
        );
        eprintln!(
            "{}",
            format!("[DEBUG] Conversations: {:?}", config.conversations_dir).dimmed()
        );
    }

    match cli.command {
        Commands::Chat { pdfs } => run_interactive_chat(&config, &pdfs, cli.debug).await,
        Commands::Ask { question, pdfs } => ask_once(&config, &question, &pdfs, cli.debug).await,
        Commands::Snapshots { action } => manage_snapshots(&config, action).await,
    }
}

async fn build_session(config: &Config) -> anyhow::Result<ChatSession> {
    let store = FileSnapshotStore::new(&config.conversations_dir);
    store
        .init()
        .await
        .with_context(|| format!("cannot use {:?}", config.conversations_dir))?;

    let gateway = HttpGateway::new(&config.gateway_url, &config.user_id)
        .with_timeout(Duration::from_secs(config.request_timeout_secs))
        .with_health_timeout(Duration::from_secs(config.health_timeout_secs));
    log::debug!(
        "Session ready: gateway {}, {} context characters",
        gateway.base_url(),
        config.context_chars
    );

    Ok(ChatSession::new(Arc::new(store), Arc::new(gateway))
        .with_composer(PromptComposer::new(config.context_chars)))
}

async fn load_pdfs(session: &mut ChatSession, paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        files.push(UploadedFile::new(name, bytes));
    }

    let extraction = tokio::task::spawn_blocking(move || extract_documents(&files)).await?;

    for failure in &extraction.failures {
        println!(
            "{}",
            format!("❌ Error reading PDF {}: {}", failure.file, failure.message).red()
        );
    }
    if extraction.is_empty() {
        println!("{}", format!("⚠️ {}", extraction.notice()).yellow());
    } else {
        println!("{}", format!("📄 {}", extraction.notice()).green());
    }

    session.set_document(extraction.text);
    Ok(())
}

fn print_answer(conversation: &Conversation) {
    if let Some(turn) = conversation.messages.last() {
        if turn.content.starts_with("⚠️") {
            println!("{}", turn.content.red());
        } else {
            println!("{}", turn.content);
        }
    }
}

fn print_transcript(conversation: &Conversation) {
    if conversation.is_empty() {
        println!("{}", GREETING.dimmed());
        return;
    }
    for turn in &conversation.messages {
        match turn.role {
            Role::User => println!("{} {}", "You:".cyan().bold(), turn.content),
            Role::Assistant => println!("{} {}", "Assistant:".green().bold(), turn.content),
        }
    }
}

async fn ask_once(
    config: &Config,
    question: &str,
    pdfs: &[PathBuf],
    debug: bool,
) -> anyhow::Result<()> {
    let mut session = build_session(config).await?;
    if !pdfs.is_empty() {
        load_pdfs(&mut session, pdfs).await?;
    }

    let start = Instant::now();
    let conversation = session.ask(question).await?;
    if debug {
        eprintln!(
            "{}",
            format!("[DEBUG] Answer received in {:?}", start.elapsed()).dimmed()
        );
    }

    print_answer(conversation);
    Ok(())
}

async fn run_interactive_chat(config: &Config, pdfs: &[PathBuf], debug: bool) -> anyhow::Result<()> {
    let mut session = build_session(config).await?;

    println!("{}", "📚 PaperMind Interactive Chat".cyan().bold());
    println!("{}", format!("Gateway: {}", config.gateway_url).dimmed());
    println!("{}", "Type /help for commands, 'exit' or 'quit' to leave".dimmed());

    if !session.gateway_reachable().await {
        println!(
            "{}",
            format!(
                "⚠️ Gateway at {} is not reachable; questions will fail until it is up",
                config.gateway_url
            )
            .yellow()
        );
    }

    if !pdfs.is_empty() {
        load_pdfs(&mut session, pdfs).await?;
    }

    println!();
    println!("{} {}", "Assistant:".green().bold(), GREETING);
    println!();

    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let command = ReplCommand::parse(&input);
        if command == ReplCommand::Exit {
            println!("{}", "👋 Goodbye!".cyan());
            break;
        }

        if let Err(e) = run_command(&mut session, command, debug).await {
            if debug {
                eprintln!("{}", format!("[DEBUG] Error: {:?}", e).dimmed());
            }
            println!("{}", format!("❌ Error: {}", e).red());
        }

        println!();
    }

    Ok(())
}

async fn run_command(
    session: &mut ChatSession,
    command: ReplCommand,
    debug: bool,
) -> anyhow::Result<()> {
    match command {
        ReplCommand::Ask(question) => {
            println!("{}", "Assistant:".green().bold());
            let start = Instant::now();
            let conversation = session.ask(&question).await?;
            if debug {
                eprintln!(
                    "{}",
                    format!("[DEBUG] Answer received in {:?}", start.elapsed()).dimmed()
                );
            }
            print_answer(conversation);
        }
        ReplCommand::Pdf(paths) => load_pdfs(session, &paths).await?,
        ReplCommand::New => {
            session.new_conversation();
            println!("{}", "🆕 New conversation".cyan());
        }
        ReplCommand::Save => {
            let id = session.save().await?;
            println!("{}", format!("💾 Conversation saved as {}", id).green());
        }
        ReplCommand::List => {
            let ids = session.list().await?;
            print_snapshot_list(&ids, session.current_snapshot());
        }
        ReplCommand::Load(id) => {
            let id = SnapshotId::parse(&id)?;
            let conversation = session.load(&id).await?;
            println!("{}", format!("📂 Loaded {}", id).green());
            print_transcript(conversation);
        }
        ReplCommand::Delete(id) => {
            let id = SnapshotId::parse(&id)?;
            session.delete(&id).await?;
            println!("{}", format!("🗑️ Deleted {}", id).green());
        }
        ReplCommand::DeleteAll => {
            let removed = session.delete_all().await?;
            println!(
                "{}",
                format!("🗑️ Deleted {} saved conversations", removed).green()
            );
        }
        ReplCommand::History => print_transcript(session.conversation()),
        ReplCommand::Help => println!("{}", HELP),
        ReplCommand::Unknown(line) => {
            println!("{}", format!("Unknown command: {}", line).yellow());
            println!("{}", HELP.dimmed());
        }
        ReplCommand::Empty | ReplCommand::Exit => {}
    }
    Ok(())
}

fn print_snapshot_list(ids: &[SnapshotId], current: Option<&SnapshotId>) {
    if ids.is_empty() {
        println!("{}", "No saved conversations".dimmed());
        return;
    }
    for id in ids {
        if Some(id) == current {
            println!("{} {}", "*".green(), id.to_string().green());
        } else {
            println!("  {}", id);
        }
    }
}

async fn manage_snapshots(config: &Config, action: SnapshotAction) -> anyhow::Result<()> {
    let store = FileSnapshotStore::new(&config.conversations_dir);

    match action {
        SnapshotAction::List => {
            let ids = store.list().await?;
            print_snapshot_list(&ids, None);
        }
        SnapshotAction::Show { id } => {
            let id = SnapshotId::parse(&id)?;
            let conversation = store.load(&id).await?;
            println!("{}", id.to_string().cyan().bold());
            println!(
                "{}",
                format!("{} characters of document text", conversation.document_chars()).dimmed()
            );
            print_transcript(&conversation);
        }
        SnapshotAction::Delete { id } => {
            let id = SnapshotId::parse(&id)?;
            store.delete(&id).await?;
            println!("{}", format!("🗑️ Deleted {}", id).green());
        }
        SnapshotAction::DeleteAll => {
            let removed = store.delete_all().await?;
            println!(
                "{}",
                format!("🗑️ Deleted {} saved conversations", removed).green()
            );
        }
    }

    Ok(())
}
