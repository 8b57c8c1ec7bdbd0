//! Roundtable CLI, the main entry point.
//!
//! Commands:
//! - `chat`: interactive chat with a team
//! - `run`:  hand the team one task, print the transcript, exit

use clap::{Parser, Subcommand};

mod commands;
mod roster;

use roster::Mode;

#[derive(Parser)]
#[command(
    name = "roundtable",
    about = "Roundtable: natural-language queries answered by cooperating agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with a team interactively
    Chat {
        /// Which team answers the queries
        #[arg(short, long, value_enum, default_value = "assistant")]
        mode: Mode,
    },

    /// Dispatch a single task and exit
    Run {
        /// Which team answers the queries
        #[arg(short, long, value_enum, default_value = "assistant")]
        mode: Mode,

        /// The task to hand to the team
        task: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { mode } => commands::chat::run(mode).await?,
        Commands::Run { mode, task } => commands::run::run(mode, &task).await?,
    }

    Ok(())
}
