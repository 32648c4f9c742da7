//! JSON reporter
//!
//! Outputs the projected table as pretty-printed JSON. Missing values are
//! `null`; numbers stay numbers.

use super::Table;
use anyhow::Result;

/// Render table as JSON
pub fn render(table: &Table) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_table;

    #[test]
    fn test_json_render_valid() {
        let json_str = render(&test_table()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["header"][0], "Metric");
        assert_eq!(parsed["rows"][0]["metric"], "BLEU: Overall");
        assert_eq!(parsed["rows"][0]["values"][0], 27.31);
        assert!(parsed["rows"][0]["values"][1].is_null());
        assert_eq!(parsed["rows"][1]["values"][0], 13);
    }

    #[test]
    fn test_json_empty_rows() {
        let mut table = test_table();
        table.rows.clear();
        let parsed: serde_json::Value =
            serde_json::from_str(&render(&table).unwrap()).expect("parse JSON");
        assert_eq!(parsed["rows"].as_array().expect("rows array").len(), 0);
    }
}
