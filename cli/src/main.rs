//! CipherSync: command-line security dashboard.
//!
//! Runs the dashboard tools against the Gemini API and keeps the audit
//! history on disk.
//!
//! Usage:
//!   ciphersync status
//!   ciphersync code-audit app.py --image screenshot.jpg
//!   ciphersync cloud-audit main.tf
//!   ciphersync intel breach alice@example.com
//!   ciphersync password 'correct horse battery staple'
//!   ciphersync chat
//!   ciphersync history list

mod render;

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use base64::Engine;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ciphersync_config::Settings;
use ciphersync_contracts::{
    error::{CipherError, CipherResult},
    generation::{GenerationReply, GenerationRequest, InlineImage},
    report::IntelKind,
};
use ciphersync_core::{traits::GenerativeBackend, Adapter};
use ciphersync_dashboard::{Dashboard, SocChat};
use ciphersync_gemini::GeminiClient;
use ciphersync_vault::{FileStorage, HistoryStore};
use ciphersync_verify::SchemaVerifier;

// ── CLI definition ────────────────────────────────────────────────────────────

/// CipherSync: AI-assisted security dashboard.
#[derive(Parser)]
#[command(
    name = "ciphersync",
    about = "AI-assisted security dashboard",
    long_about = "Audits code and cloud configuration, runs reconnaissance scans,\n\
                  checks password strength, and keeps a local history of results."
)]
struct Cli {
    /// Configuration file. Defaults to ./ciphersync.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON where supported.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show history totals per tool.
    Status,
    /// Static security analysis of a source file.
    CodeAudit {
        file: PathBuf,
        /// JPEG screenshot sent along for context.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Misconfiguration review of an infrastructure file.
    CloudAudit {
        file: PathBuf,
        /// JPEG architecture diagram sent along for context.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Reconnaissance on a URL, username, or breach identifier.
    Intel {
        #[arg(value_enum)]
        kind: IntelTarget,
        input: String,
    },
    /// Local password strength check. Only a fingerprint is recorded.
    Password { password: String },
    /// Interactive SOC assistant chat. Type /exit to quit.
    Chat,
    /// Inspect or prune the audit history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List entries, newest first.
    List,
    /// Print one entry in full.
    Show { id: String },
    /// Remove one entry.
    Delete { id: String },
    /// Remove every entry.
    Purge,
}

#[derive(Clone, Copy, ValueEnum)]
enum IntelTarget {
    Url,
    User,
    Breach,
}

impl From<IntelTarget> for IntelKind {
    fn from(target: IntelTarget) -> Self {
        match target {
            IntelTarget::Url => IntelKind::Url,
            IntelTarget::User => IntelKind::User,
            IntelTarget::Breach => IntelKind::Breach,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CipherResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let mut dashboard = open_dashboard(&settings)?;

    match cli.command {
        Command::Status => render::status(&dashboard.status(), cli.json),
        Command::CodeAudit { file, image } => {
            let source = read_text(&file)?;
            let image = image.as_deref().map(read_image).transpose()?;
            let recorded = dashboard.code_audit(&source, image.as_ref()).await?;
            render::code_audit(&recorded);
            Ok(())
        }
        Command::CloudAudit { file, image } => {
            let config = read_text(&file)?;
            let image = image.as_deref().map(read_image).transpose()?;
            let recorded = dashboard.cloud_audit(&config, image.as_ref()).await?;
            render::cloud_audit(&recorded);
            Ok(())
        }
        Command::Intel { kind, input } => {
            let recorded = dashboard.intel_scan(kind.into(), &input).await?;
            render::intel(&recorded);
            Ok(())
        }
        Command::Password { password } => {
            let recorded = dashboard.password_check(&password)?;
            render::password(&recorded, cli.json)
        }
        Command::Chat => chat_loop(dashboard.adapter()).await,
        Command::History { action } => match action {
            HistoryAction::List => render::history(dashboard.history(), cli.json),
            HistoryAction::Show { id } => match dashboard.history_entry(&id) {
                Some(entry) => render::json(entry),
                None => Err(unknown_id(&id)),
            },
            HistoryAction::Delete { id } => {
                if dashboard.delete_entry(&id) {
                    println!("Deleted {id}.");
                    Ok(())
                } else {
                    Err(unknown_id(&id))
                }
            }
            HistoryAction::Purge => {
                let dropped = dashboard.history().len();
                dashboard.purge_history();
                println!("Purged {dropped} entries.");
                Ok(())
            }
        },
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn open_dashboard(settings: &Settings) -> CipherResult<Dashboard<FileStorage>> {
    let backend: Box<dyn GenerativeBackend> = match settings.api_key() {
        Ok(key) => Box::new(GeminiClient::with_options(
            key,
            settings.model.base_url.clone(),
            settings.request_timeout(),
        )?),
        Err(CipherError::Config { reason }) => {
            debug!(%reason, "no API key; network tools unavailable");
            Box::new(Unconfigured { reason })
        }
        Err(e) => return Err(e),
    };
    let adapter = Adapter::new(backend, Box::new(SchemaVerifier::new()), settings.model.name.clone());

    let storage = FileStorage::new(settings.history.dir.clone());
    let mut store = HistoryStore::new(storage)
        .with_key(settings.history.storage_key.clone())
        .with_capacity(settings.history.capacity);
    store.hydrate();

    Ok(Dashboard::new(adapter, store))
}

/// Stands in for the Gemini client when no API key is configured, so the
/// offline commands keep working and the network ones fail with the reason.
struct Unconfigured {
    reason: String,
}

#[async_trait]
impl GenerativeBackend for Unconfigured {
    async fn generate(&self, _request: GenerationRequest) -> CipherResult<GenerationReply> {
        Err(CipherError::Config {
            reason: self.reason.clone(),
        })
    }
}

// ── Chat ──────────────────────────────────────────────────────────────────────

async fn chat_loop(adapter: &Adapter) -> CipherResult<()> {
    let mut chat = SocChat::new();
    let stdin = io::stdin();
    println!("SOC assistant ready. Type /exit to quit.");

    loop {
        print!("you> ");
        io::stdout().flush().map_err(io_error)?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(io_error)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "/exit" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        // A failed turn is reported and the conversation continues.
        match chat.send(adapter, line).await {
            Ok(reply) => println!("soc> {reply}\n"),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

// ── Input helpers ─────────────────────────────────────────────────────────────

fn read_text(path: &Path) -> CipherResult<String> {
    std::fs::read_to_string(path).map_err(|e| CipherError::InvalidInput {
        reason: format!("cannot read '{}': {}", path.display(), e),
    })
}

fn read_image(path: &Path) -> CipherResult<InlineImage> {
    let bytes = std::fs::read(path).map_err(|e| CipherError::InvalidInput {
        reason: format!("cannot read image '{}': {}", path.display(), e),
    })?;
    Ok(InlineImage::jpeg(
        base64::engine::general_purpose::STANDARD.encode(bytes),
    ))
}

fn unknown_id(id: &str) -> CipherError {
    CipherError::InvalidInput {
        reason: format!("no history entry with id '{id}'"),
    }
}

fn io_error(e: io::Error) -> CipherError {
    CipherError::InvalidInput {
        reason: format!("terminal I/O failed: {e}"),
    }
}
