//! Maya Connect CLI - Main entry point

mod cli;
mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Maya Connect - discover and launch Maya for hub tasks
#[derive(Parser, Debug)]
#[command(name = "maya-connect")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Hub data fixture (JSON: {"apiUser": ..., "entities": [...]})
    #[arg(long, global = true)]
    hub: Option<PathBuf>,

    /// Act as this hub user (overrides config and FTRACK_API_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List Maya installations found on this machine
    Apps,
    /// Publish a discover event for a task and print the menu items
    Discover {
        /// Task id to select
        #[arg(long)]
        task: String,
    },
    /// Publish a launch event for a task and application
    Launch {
        /// Task id to select
        #[arg(long)]
        task: String,

        /// Application identifier (e.g. maya_2020)
        #[arg(long)]
        app: String,
    },
    /// Print plugin version information
    DebugInfo,
    /// Show the current context (FTRACK_TASKID / FTRACK_SHOTID)
    Context {
        /// Open the entity browser to pick a new context
        #[arg(long)]
        browse: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging (stderr, stdout is for command output)
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let runtime = cli::Runtime::build(cli::RuntimeOptions {
        hub: args.hub,
        user: args.user,
        debug: args.debug,
    })
    .await?;

    match args.command {
        Command::Apps => cli::run_apps(&runtime),
        Command::Discover { task } => cli::run_discover(&runtime, &task).await,
        Command::Launch { task, app } => cli::run_launch(&runtime, &task, &app).await,
        Command::DebugInfo => cli::run_debug_info(&runtime).await,
        Command::Context { browse } => cli::run_context(&runtime, browse),
    }
}
