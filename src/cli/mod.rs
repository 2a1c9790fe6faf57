//! Command implementations and terminal rendering

pub mod add;
pub mod operations;
pub mod profit;
pub mod setup;
pub mod sheets;
pub mod ui;

use anyhow::{Context, Result};
use serde::Serialize;

/// How a report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Styled tables for the terminal
    #[default]
    Table,
    /// A JSON document for other tools
    Json,
}

pub(crate) fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}
