//! Token removal preprocessing
//!
//! Assumes already-tokenized text: tokens are separated by single spaces and
//! lines by `\n`. Removal is a plain set difference per line.

use super::CorpusError;
use std::collections::HashSet;
use std::path::Path;

/// Load a removal list, one token per line. Surrounding whitespace is
/// stripped and blank lines are ignored.
pub fn load(path: &Path) -> Result<HashSet<String>, CorpusError> {
    let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&content))
}

/// Parse a removal list from its file contents
pub fn parse(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Remove every token in `removal` from `body`, keeping line structure.
pub fn clean(body: &str, removal: &HashSet<String>) -> String {
    body.split('\n')
        .map(|line| {
            line.split(' ')
                .filter(|tkn| !removal.contains(*tkn))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
