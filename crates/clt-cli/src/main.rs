//! clubtrack entry point.
//!
//! This file is intentionally thin: it parses arguments, sets up tracing,
//! and hands off to the command handlers in `commands/`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "clubtrack")]
#[command(about = "Membership tracking for chess.com clubs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a club's live member list against the stored roster.
    Membership {
        /// Club to check (url-name or club url). Defaults to the
        /// configured default club.
        #[arg(long, short = 'c', conflicts_with = "all_clubs")]
        club: Option<String>,

        /// Check every configured club.
        #[arg(long, short = 'a', default_value_t = false)]
        all_clubs: bool,

        /// Report only; do not persist the updated roster.
        #[arg(long, short = 'r', default_value_t = false)]
        readonly: bool,

        /// Path to the config file.
        #[arg(long, default_value = clt_config::DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Membership {
            club,
            all_clubs,
            readonly,
            config,
        } => commands::membership::run(club.as_deref(), all_clubs, readonly, &config).await,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
