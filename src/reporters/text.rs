//! Plain-text table reporter
//!
//! Column layout: metric names left-aligned, values right-aligned, a dashed
//! rule under the header and no outer borders.

use super::Table;

/// Render the table as aligned plain text
pub fn render(table: &Table) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            std::iter::once(row.metric.clone())
                .chain(row.values.iter().map(|c| c.to_string()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..table.header.len())
        .map(|col| {
            cells
                .iter()
                .filter_map(|r| r.get(col))
                .chain(std::iter::once(&table.header[col]))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &table.header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, fields: &[String], widths: &[usize]) {
    let line: Vec<String> = fields
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (field, &w))| {
            if col == 0 {
                format!("{:<w$}", field, w = w)
            } else {
                format!("{:>w$}", field, w = w)
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_table;

    #[test]
    fn test_text_layout() {
        let out = render(&test_table());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Metric"));
        assert!(lines[1].chars().all(|c| c == '-' || c == ' '));
        assert!(lines[2].starts_with("BLEU: Overall"));
        assert!(lines[2].ends_with("--"));
        assert!(lines[3].contains("13"));
    }

    #[test]
    fn test_values_right_aligned() {
        let out = render(&test_table());
        let lines: Vec<&str> = out.lines().collect();
        // every line is padded to the same width
        let width = lines[1].len();
        assert_eq!(lines[0].len(), width);
        assert_eq!(lines[2].len(), width);
        assert!(lines[2].contains("27.3100"));
    }

    #[test]
    fn test_header_only() {
        let mut table = test_table();
        table.rows.clear();
        let out = render(&table);
        assert_eq!(out.lines().count(), 2);
    }
}
