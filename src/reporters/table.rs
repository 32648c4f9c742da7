//! Result projection
//!
//! Turns candidate results into a rectangular table. Each row is a
//! [`RowSpec`]: the lowest verbosity that shows it, a display name, and a key
//! path into the candidate's serialized results. A path that runs into a
//! missing key at any level yields [`Cell::Missing`] instead of an error, so
//! skipped metrics simply show up as placeholders.

use crate::corpus::CandidateSet;
use crate::models::MetricKind;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::path::Path;

/// Placeholder shown for missing values
pub const MISSING: &str = "--";

/// How many rows to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Headline rows only
    Summary = 0,
    /// Every row
    #[default]
    Detail = 1,
}

impl TryFrom<u8> for Verbosity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Verbosity::Summary),
            1 => Ok(Verbosity::Detail),
            other => Err(format!("verbosity must be 0 or 1, got {}", other)),
        }
    }
}

/// One step of a row path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKey {
    /// Named field
    Field(String),
    /// N-gram order (or array position)
    Index(usize),
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Field(key.to_string())
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

impl From<MetricKind> for PathKey {
    fn from(kind: MetricKind) -> Self {
        PathKey::Field(kind.key().to_string())
    }
}

/// Declarative description of one table row
#[derive(Debug, Clone, PartialEq)]
pub struct RowSpec {
    pub verbosity: Verbosity,
    pub name: String,
    pub path: Vec<PathKey>,
}

impl RowSpec {
    pub fn new(verbosity: Verbosity, name: impl Into<String>, path: Vec<PathKey>) -> Self {
        Self {
            verbosity,
            name: name.into(),
            path,
        }
    }
}

/// Build a row path from heterogeneous keys: `path![MetricKind::Bleu, "overall"]`
macro_rules! path {
    ($($key:expr),* $(,)?) => {
        vec![$(PathKey::from($key)),*]
    };
}

/// One value in the table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl Cell {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Cell::Int(i)
                } else {
                    n.as_f64().map(Cell::Float).unwrap_or(Cell::Missing)
                }
            }
            Value::String(s) => Cell::Text(s.clone()),
            Value::Bool(b) => Cell::Text(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => Cell::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{:.4}", x),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Missing => write!(f, "{}", MISSING),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(x) => serializer.serialize_f64(*x),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Missing => serializer.serialize_none(),
        }
    }
}

/// A named row of cells, one per candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub metric: String,
    pub values: Vec<Cell>,
}

/// Projected results: a header plus one row per displayed spec
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn row(&self, metric: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.metric == metric)
    }
}

/// Follow `path` through `value`, `None` as soon as a key is absent.
pub fn lookup<'a>(value: &'a Value, path: &[PathKey]) -> Option<&'a Value> {
    path.iter().try_fold(value, |cur, key| match (key, cur) {
        (PathKey::Field(name), Value::Object(map)) => map.get(name),
        (PathKey::Index(i), Value::Object(map)) => map.get(&i.to_string()),
        (PathKey::Index(i), Value::Array(items)) => items.get(*i),
        _ => None,
    })
}

/// Column label for a candidate: the basename of its source name
fn column_label(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Project every candidate's results through `rows` at `verbosity`.
pub fn project(candidates: &CandidateSet, rows: &[RowSpec], verbosity: Verbosity) -> Table {
    let mut header = vec!["Metric".to_string()];
    header.extend(candidates.corpora.names().map(column_label));

    let results: Vec<Value> = candidates
        .corpora
        .values()
        .map(|c| c.results_value())
        .collect();

    let rows = rows
        .iter()
        .filter(|spec| spec.verbosity <= verbosity)
        .map(|spec| Row {
            metric: spec.name.clone(),
            values: results
                .iter()
                .map(|res| {
                    lookup(res, &spec.path)
                        .map(Cell::from_value)
                        .unwrap_or(Cell::Missing)
                })
                .collect(),
        })
        .collect();

    Table { header, rows }
}

/// Rows for the comparative metrics, in display order
pub fn comparative_rows() -> Vec<RowSpec> {
    use MetricKind::{Bleu, Meteor, Rouge};
    use Verbosity::{Detail, Summary};
    vec![
        RowSpec::new(Summary, "BLEU: Overall", path![Bleu, "overall"]),
        RowSpec::new(Detail, "BLEU-1", path![Bleu, "bleu1"]),
        RowSpec::new(Detail, "BLEU-2", path![Bleu, "bleu2"]),
        RowSpec::new(Detail, "BLEU-3", path![Bleu, "bleu3"]),
        RowSpec::new(Detail, "BLEU-4", path![Bleu, "bleu4"]),
        RowSpec::new(Detail, "BLEU: brevity penalty", path![Bleu, "brevity_penalty"]),
        RowSpec::new(Detail, "BLEU: length ratio", path![Bleu, "length_ratio"]),
        RowSpec::new(Detail, "BLEU: candidate len", path![Bleu, "candidate_length"]),
        RowSpec::new(Detail, "BLEU: reference len", path![Bleu, "reference_length"]),
        RowSpec::new(Detail, "ROUGE-1: F1", path![Rouge, "rouge1", "f1"]),
        RowSpec::new(Detail, "ROUGE-2: F1", path![Rouge, "rouge2", "f1"]),
        RowSpec::new(Detail, "ROUGE-L: Precision", path![Rouge, "rougeL", "precision"]),
        RowSpec::new(Detail, "ROUGE-L: Recall", path![Rouge, "rougeL", "recall"]),
        RowSpec::new(Summary, "ROUGE-L: F1", path![Rouge, "rougeL", "f1"]),
        RowSpec::new(Summary, "METEOR", path![Meteor, "overall"]),
    ]
}

/// Rows for the n-gram statistics of each order: overall rows first, then
/// per-line rows. Unigram rows are summary rows.
pub fn intrinsic_rows(orders: &[usize]) -> Vec<RowSpec> {
    use MetricKind::Ngrams;

    let level = |n: usize| {
        if n == 1 {
            Verbosity::Summary
        } else {
            Verbosity::Detail
        }
    };

    let mut rows = Vec::new();
    for &n in orders {
        let (unique, total) = if n == 1 {
            (" (vocab)", " (len)")
        } else {
            ("", "")
        };
        rows.push(RowSpec::new(
            level(n),
            format!("{}-grams: overall unique{}", n, unique),
            path![Ngrams, "overall_unique", n],
        ));
        rows.push(RowSpec::new(
            level(n),
            format!("{}-grams: overall total{}", n, total),
            path![Ngrams, "overall_total", n],
        ));
        rows.push(RowSpec::new(
            level(n),
            format!("{}-grams: overall ratio (unique/total)", n),
            path![Ngrams, "overall_ratio", n],
        ));
    }
    for &n in orders {
        let (unique, total) = if n == 1 {
            (" (line-vocab)", " (line-len)")
        } else {
            ("", "")
        };
        rows.push(RowSpec::new(
            level(n),
            format!("{}-grams: per-line avg unique{}", n, unique),
            path![Ngrams, "perline_avg_unique", n],
        ));
        rows.push(RowSpec::new(
            level(n),
            format!("{}-grams: per-line avg total{}", n, total),
            path![Ngrams, "perline_avg_total", n],
        ));
        rows.push(RowSpec::new(
            level(n),
            format!("{}-grams: per-line ratio (unique/total)", n),
            path![Ngrams, "perline_avg_ratio", n],
        ));
    }
    rows
}

/// Rows for the enabled metric groups. Disabled groups contribute no rows.
pub fn worklist(comparative: bool, intrinsic: bool, orders: &[usize]) -> Vec<RowSpec> {
    let mut rows = Vec::new();
    if comparative {
        rows.extend(comparative_rows());
    }
    if intrinsic {
        rows.extend(intrinsic_rows(orders));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusGroup;
    use crate::metrics::ngrams;
    use crate::models::{MeteorResults, MetricResult};
    use serde_json::json;

    fn candidates() -> CandidateSet {
        let mut group = CorpusGroup::new();
        group.insert("out/model_a.txt", "a b c\na b").unwrap();
        group.insert("out/model_b.txt", "x x x").unwrap();
        let mut cands = CandidateSet::new(group);
        ngrams::ngrams(&mut cands, &[1, 2]);
        cands
    }

    #[test]
    fn test_lookup_paths() {
        let v = json!({"ngrams": {"overall_unique": {"1": 3}}, "list": [10, 20]});
        let hit = lookup(&v, &path![MetricKind::Ngrams, "overall_unique", 1usize]);
        assert_eq!(hit, Some(&json!(3)));
        assert_eq!(lookup(&v, &path!["list", 1usize]), Some(&json!(20)));
        assert_eq!(lookup(&v, &path!["ngrams", "overall_total", 1usize]), None);
        assert_eq!(lookup(&v, &path!["missing", "deeper"]), None);
        assert_eq!(lookup(&v, &path!["list", "field"]), None);
    }

    #[test]
    fn test_missing_metric_renders_placeholder() {
        let cands = candidates();
        let table = project(&cands, &comparative_rows(), Verbosity::Detail);
        assert_eq!(table.rows.len(), comparative_rows().len());
        for row in &table.rows {
            assert!(row.values.iter().all(Cell::is_missing));
            assert!(row.values.iter().all(|c| c.to_string() == MISSING));
        }
    }

    #[test]
    fn test_partial_results_per_candidate() {
        let mut cands = candidates();
        cands
            .corpora
            .get_mut("out/model_b.txt")
            .unwrap()
            .set_result(MetricResult::Meteor(MeteorResults { overall: 0.5 }));

        let table = project(&cands, &comparative_rows(), Verbosity::Summary);
        let meteor = table.row("METEOR").unwrap();
        assert_eq!(meteor.values, vec![Cell::Missing, Cell::Float(0.5)]);
    }

    #[test]
    fn test_header_uses_basenames_in_insertion_order() {
        let table = project(&candidates(), &[], Verbosity::Detail);
        assert_eq!(table.header, vec!["Metric", "model_a.txt", "model_b.txt"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_verbosity_filters_rows() {
        let rows = intrinsic_rows(&[1, 2]);
        let summary = project(&candidates(), &rows, Verbosity::Summary);
        let detail = project(&candidates(), &rows, Verbosity::Detail);
        assert_eq!(summary.rows.len(), 6);
        assert_eq!(detail.rows.len(), 12);
        assert!(summary.rows.iter().all(|r| r.metric.starts_with("1-grams")));
    }

    #[test]
    fn test_ngram_values_projected() {
        let table = project(&candidates(), &intrinsic_rows(&[1]), Verbosity::Detail);
        let vocab = table.row("1-grams: overall unique (vocab)").unwrap();
        assert_eq!(vocab.values, vec![Cell::Int(3), Cell::Int(1)]);
        let len = table.row("1-grams: overall total (len)").unwrap();
        assert_eq!(len.values, vec![Cell::Int(5), Cell::Int(3)]);
    }

    #[test]
    fn test_worklist_excludes_disabled_groups() {
        let only_intrinsic = worklist(false, true, &[1, 2, 3, 4]);
        assert_eq!(only_intrinsic.len(), 24);
        assert!(only_intrinsic.iter().all(|r| r.path[0] == PathKey::from(MetricKind::Ngrams)));

        let only_comparative = worklist(true, false, &[1, 2, 3, 4]);
        assert_eq!(only_comparative.len(), comparative_rows().len());

        assert!(worklist(false, false, &[1]).is_empty());
    }

    #[test]
    fn test_verbosity_from_level() {
        assert_eq!(Verbosity::try_from(0u8), Ok(Verbosity::Summary));
        assert_eq!(Verbosity::try_from(1u8), Ok(Verbosity::Detail));
        assert!(Verbosity::try_from(2u8).is_err());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Int(13).to_string(), "13");
        assert_eq!(Cell::Float(8.0 / 13.0).to_string(), "0.6154");
        assert_eq!(Cell::Missing.to_string(), "--");
    }
}
