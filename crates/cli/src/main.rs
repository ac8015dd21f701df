//! wikisave CLI - push a single-file wiki to a remote save function
//!
//! # Configuration
//!
//! Options are loaded from multiple sources with priority:
//!
//! 1. CLI arguments (`--debug`)
//! 2. Environment variables (`WIKISAVE_*`, also read from `.env`)
//! 3. Config file (`--config PATH`, else `wikisave.toml`/`wikisave.json`)
//! 4. Default values
//!
//! # Environment Variables
//!
//! - `WIKISAVE_PASSWORD`: Save password; prompts on the terminal when unset
//! - `WIKISAVE_STATS_FILE`: Where save stats are kept
//! - `WIKISAVE_NO_PROXY`: Ignore `HTTP_PROXY`/`HTTPS_PROXY` when set

mod app;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use wikisave_domain::SaveMethod;

/// wikisave - remote saver for single-file wikis
#[derive(Parser, Debug)]
#[command(name = "wikisave")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (JSON or TOML)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging and verbose save diagnostics
    #[arg(short, long)]
    debug: bool,

    /// Save stats file
    #[arg(long, env = "WIKISAVE_STATS_FILE", default_value = "wikisave-stats.json")]
    stats_file: PathBuf,

    /// Connect directly, ignoring HTTP_PROXY/HTTPS_PROXY
    #[arg(long, env = "WIKISAVE_NO_PROXY")]
    no_proxy: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save a document as a manual save
    Save {
        /// Document to upload
        file: PathBuf,
    },
    /// Save a document as an autosave
    Autosave {
        /// Document to upload
        file: PathBuf,
    },
    /// Send one test save and report whether the endpoint accepts it
    TestConnection {
        /// Document to send (a small placeholder page by default)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the recorded save stats
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(err) = wikisave_infra::logging::init(cli.debug) {
        eprintln!("wikisave: {err}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("wikisave: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let options = app::AppOptions {
        config_path: cli.config,
        debug: cli.debug,
        stats_file: cli.stats_file,
        proxy_from_env: !cli.no_proxy,
    };
    let app = app::App::build(options)?;

    match cli.command {
        Command::Save { file } => app.save(&file, SaveMethod::Save).await,
        Command::Autosave { file } => app.save(&file, SaveMethod::Autosave).await,
        Command::TestConnection { file } => app.test_connection(file.as_deref()).await,
        Command::Stats => app.print_stats().await,
    }
}
