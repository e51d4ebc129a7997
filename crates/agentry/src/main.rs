// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agentry: a web-search agent served over an HTTP playground, and a PDF
//! knowledge agent backed by Qdrant or MongoDB.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod knowledge;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use crate::knowledge::KnowledgeArgs;

/// Agentry - conversational and knowledge agents.
#[derive(Parser, Debug)]
#[command(name = "agentry", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the web agent and serve the playground API.
    Serve,
    /// Embed a sample, load the knowledge sources and answer a question.
    Knowledge(KnowledgeArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // `.env` values win over the inherited environment.
    if let Err(e) = dotenvy::dotenv_override() {
        if !e.not_found() {
            eprintln!("agentry: failed to read .env: {e}");
        }
    }

    let loaded = match &cli.config {
        Some(path) => agentry_config::load_and_validate_path(path),
        None => agentry_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            agentry_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Knowledge(args)) => knowledge::run_knowledge(config, args).await,
        None => {
            println!("agentry: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(error = %e, "fatal error");
        eprintln!("agentry: {e}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `agentry*` targets log at `log_level` and everything else at warn.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("agentry={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
