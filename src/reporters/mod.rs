//! Output reporters for textmetrics results
//!
//! Results are first projected into a [`Table`] (see [`table`]), then
//! rendered in one of:
//! - `text` - Plain aligned table for the terminal
//! - `markdown` - GitHub-flavored Markdown table
//! - `csv` - Comma-separated values
//! - `json` - Machine-readable JSON

mod csv;
mod json;
mod markdown;
pub mod table;
mod text;

pub use table::{
    comparative_rows, intrinsic_rows, project, worklist, Cell, PathKey, Row, RowSpec, Table,
    Verbosity, MISSING,
};

use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, markdown, csv, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a projected table in the given format
pub fn render(table: &Table, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render(table)),
        OutputFormat::Markdown => Ok(markdown::render(table)),
        OutputFormat::Csv => csv::render(table),
        OutputFormat::Json => json::render(table),
    }
}
