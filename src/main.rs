//! # FactGuard CLI (`factguard`)
//!
//! The `factguard` binary runs the claim-analysis API server and its
//! maintenance commands.
//!
//! ## Usage
//!
//! ```bash
//! factguard --config ./config/factguard.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `factguard init` | Create the SQLite database and run schema migrations |
//! | `factguard serve` | Start the HTTP API server |
//! | `factguard export-history` | Export the query history table as CSV |
//!
//! API credentials are read from the environment (`GEMINI_API_KEY`,
//! `GOOGLE_FACTCHECK_KEY`, `NEWSDATA_API_KEY`, `SERPAPI_KEY`,
//! `CUSTOM_MODEL_URL`, `CUSTOM_MODEL_API_KEY`, `HF_API_TOKEN`); a missing
//! key degrades the corresponding provider instead of failing startup.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use factguard::{config, export, migrate, server};

/// FactGuard — a claim-analysis backend aggregating fact-check, news,
/// and search evidence into a verdict.
#[derive(Parser)]
#[command(
    name = "factguard",
    about = "FactGuard — a claim-analysis backend aggregating fact-check, news, and search evidence into a verdict",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/factguard.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the query_history table.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// analyze and history endpoints.
    Serve,

    /// Export the query history table as CSV.
    ///
    /// Column order is fixed: id, headline, serpapi_result, gemini_result,
    /// factcheck_result, verdict, credibility, created_at.
    ExportHistory {
        /// Output file path. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::ExportHistory { output } => {
            export::run_export(&cfg, output.as_deref()).await?;
        }
    }

    Ok(())
}
