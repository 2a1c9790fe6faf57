pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::OutputFormat;
use crate::core::config::AppConfig;
use crate::core::source::NewTransaction;
use anyhow::Result;
use tracing::{debug, info};

/// Commands that read or write the linked spreadsheet.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Operations { format: OutputFormat },
    Sheets,
    Profit { sheet: String, format: OutputFormat },
    Add(NewTransaction),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("sheetdash starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let source_config = config.require_source()?;
    let source = providers::AppsScriptProvider::new(source_config)?;

    match command {
        AppCommand::Operations { format } => cli::operations::run(&source, format).await,
        AppCommand::Sheets => cli::sheets::run(&source).await,
        AppCommand::Profit { sheet, format } => cli::profit::run(&source, &sheet, format).await,
        AppCommand::Add(transaction) => cli::add::run(&source, &transaction).await,
    }
}
