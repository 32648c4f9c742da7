//! Markdown reporter
//!
//! GitHub-flavored pipe table, value columns right-aligned.

use super::Table;

/// Escape pipes so candidate names cannot break the table
fn escape(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Render the table as Markdown
pub fn render(table: &Table) -> String {
    let mut out = String::new();

    let header: Vec<String> = table.header.iter().map(|h| escape(h)).collect();
    out.push_str(&format!("| {} |\n", header.join(" | ")));

    let align: Vec<&str> = (0..table.header.len())
        .map(|col| if col == 0 { ":---" } else { "---:" })
        .collect();
    out.push_str(&format!("|{}|\n", align.join("|")));

    for row in &table.rows {
        let fields: Vec<String> = std::iter::once(escape(&row.metric))
            .chain(row.values.iter().map(|c| escape(&c.to_string())))
            .collect();
        out.push_str(&format!("| {} |\n", fields.join(" | ")));
    }
    out
}
