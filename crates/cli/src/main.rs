//! Gallery CLI - manage an image gallery from the terminal

mod commands;
mod config;
mod logging;
mod state_dir;
mod storage;
mod terminal;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use gallery_http::GalleryClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug, error};

use crate::config::GalleryConfig;
use crate::state_dir::StateDir;
use crate::storage::FileStorage;
use crate::terminal::{TerminalNavigator, TerminalNotifier};

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Upload, arrange and manage your image gallery")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Directory holding the saved session and logs
    #[arg(short = 'd', long, global = true, env = "GALLERY_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Configuration file (defaults to <config dir>/gallery/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let state_dir = StateDir::resolve(cli.state_dir);
    state_dir.create()?;
    logging::init_logging(cli.log_level.into(), &state_dir, cli.no_file_log)?;

    let config = GalleryConfig::load(cli.config.as_deref())?;
    debug!(base_url = %config.api.base_url, state_dir = %state_dir.root().display(), "Loaded configuration");

    let client = build_client(&config, &state_dir)?;

    if let Err(e) = cli.command.execute(&client).await {
        error!("Command failed: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn build_client(config: &GalleryConfig, state_dir: &StateDir) -> Result<GalleryClient> {
    let storage = FileStorage::open(state_dir.session_path())?;

    let mut builder = GalleryClient::builder()
        .base_url(&config.api.base_url)
        .timeout(config.api.timeout())
        .login_path(&config.login_path)
        .storage(Arc::new(storage))
        .navigator(Arc::new(TerminalNavigator))
        .notifier(Arc::new(TerminalNotifier));

    if let Some(agent) = &config.api.user_agent {
        builder = builder.user_agent(agent);
    }

    Ok(builder.build()?)
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
