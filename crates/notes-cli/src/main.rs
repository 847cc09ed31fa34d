//! notes CLI — keyword-searchable notes for LLM agents
//!
//! Commands: serve (default), add, search
//!
//! `serve` speaks MCP over stdin/stdout, so all logging goes to stderr.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rmcp::{service::ServerInitializeError, transport::stdio, ServiceExt};
use tracing::info;

use notes_mcp::{handlers, NotesMcpService};
use notes_store::NoteStore;

#[derive(Parser)]
#[command(name = "notes")]
#[command(version)]
#[command(about = "Keyword-searchable notes served over MCP stdio")]
struct Cli {
    /// Path to the notes database (created if absent)
    #[arg(long, global = true, env = "NOTES_DB", default_value = "my_notes.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout
    Serve,
    /// Save a note
    Add {
        /// Note title
        #[arg(long)]
        title: String,
        /// Note body
        #[arg(long)]
        content: String,
    },
    /// Search notes by keyword
    #[command(alias = "s")]
    Search {
        /// Keyword matched against titles and contents
        query: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Format {
    Json,
    Text,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn open_store(path: &Path) -> anyhow::Result<NoteStore> {
    NoteStore::open(path).with_context(|| format!("failed to open note database {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&cli.db).await,
        Commands::Add { title, content } => {
            let store = open_store(&cli.db)?;
            let id = store.insert(&title, &content)?;
            let note = store
                .get(id)?
                .with_context(|| format!("note {id} vanished after insert"))?;
            println!("{}", serde_json::to_string_pretty(&note)?);
            Ok(())
        }
        Commands::Search { query, format } => {
            let store = open_store(&cli.db)?;
            match format {
                Format::Json => {
                    let notes = store.search(&query)?;
                    println!("{}", serde_json::to_string_pretty(&notes)?);
                }
                Format::Text => println!("{}", handlers::search_notes(&store, &query)?),
            }
            Ok(())
        }
    }
}

async fn serve(db: &Path) -> anyhow::Result<()> {
    let store = open_store(db)?;
    info!(db = %db.display(), notes = store.count()?, "note store ready");

    info!("notes MCP server running on stdio");

    let service = match NotesMcpService::new(Arc::new(store)).serve(stdio()).await {
        Ok(service) => service,
        // The client went away before the handshake finished.
        Err(ServerInitializeError::ConnectionClosed(during)) => {
            info!(during = %during, "stdin closed before initialization, exiting");
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to start MCP server"),
    };

    let reason = service.waiting().await?;
    info!(?reason, "notes MCP server stopped");

    Ok(())
}
