//! CSV reporter

use super::Table;
use anyhow::{Context, Result};

/// Render the table as CSV, header first
pub fn render(table: &Table) -> Result<String> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.header)?;
    for row in &table.rows {
        let record = std::iter::once(row.metric.clone())
            .chain(row.values.iter().map(|c| c.to_string()));
        writer.write_record(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}
