// src/cli/mod.rs
// Headless commands: talk to the OCR service without opening a window.

pub mod grid;
pub mod probe;
pub mod upload;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::digitization::api::ApiError;
use crate::settings::{base_url_override, io::load_settings_from_file, AppSettings};

#[derive(Parser)]
#[command(name = "aquagrid")]
#[command(about = "Aquagrid - survey sheet digitization with an OCR review step", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether the OCR service answers
    Probe {
        /// OCR service base URL (defaults to AQUAGRID_API_BASE, then saved settings)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Upload a survey photo and print the extracted grid
    Upload {
        /// PNG or JPEG image of the sheet
        image: PathBuf,
        /// Zone the sheet belongs to
        #[arg(long, default_value = "1")]
        zone: String,
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print the grid of an OCR response saved as JSON
    Grid {
        /// File holding the upload response body
        file: PathBuf,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Could not read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("{path} is not an OCR document: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("Could not start the async runtime: {0}")]
    Runtime(io::Error),
}

/// Flag, then environment, then saved settings.
pub fn resolve_base_url(flag: Option<String>) -> String {
    let settings = load_settings_from_file::<AppSettings>().unwrap_or_default();
    let chosen = flag.filter(|f| !f.trim().is_empty()).or_else(base_url_override);
    settings.effective_base_url(chosen.as_deref())
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init only happens in tests; ignore it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(future))
}

pub fn run(command: Commands) -> ExitCode {
    init_logging();
    let result = match command {
        Commands::Probe { base_url } => {
            block_on(probe::run(resolve_base_url(base_url))).and_then(|r| r)
        }
        Commands::Upload { image, zone, base_url } => {
            block_on(upload::run(resolve_base_url(base_url), image, zone)).and_then(|r| r)
        }
        Commands::Grid { file } => grid::run(file),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
