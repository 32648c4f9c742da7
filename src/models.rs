//! Core data models for textmetrics
//!
//! Metric identifiers and the per-metric result records that candidate
//! corpora carry after evaluation. Every record serializes to a nested JSON
//! object so the reporters can address individual values by key path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metrics that can be computed for a candidate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// n-gram precision overlap against references (external perl script)
    Bleu,
    /// precision/recall/f1 overlap statistics (in-process)
    Rouge,
    /// alignment-based score with stemming (external jar)
    Meteor,
    /// intrinsic n-gram diversity statistics
    Ngrams,
}

impl MetricKind {
    /// Key used for this metric in serialized results and row paths
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Bleu => "bleu",
            MetricKind::Rouge => "rouge",
            MetricKind::Meteor => "meteor",
            MetricKind::Ngrams => "ngrams",
        }
    }

    /// Human-readable name for log messages
    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::Bleu => "BLEU",
            MetricKind::Rouge => "ROUGE",
            MetricKind::Meteor => "METEOR",
            MetricKind::Ngrams => "ngrams",
        }
    }

    /// Comparative metrics need reference corpora; intrinsic ones do not
    pub fn is_comparative(&self) -> bool {
        !matches!(self, MetricKind::Ngrams)
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Scores reported by the BLEU script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleuResults {
    pub overall: f64,
    pub bleu1: f64,
    pub bleu2: f64,
    pub bleu3: f64,
    pub bleu4: f64,
    pub brevity_penalty: f64,
    pub length_ratio: f64,
    pub candidate_length: u64,
    pub reference_length: u64,
}

/// Precision, recall and f1 triple
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Prf {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Prf {
    /// Build a triple from precision and recall, deriving f1.
    /// Both zero gives an all-zero triple.
    pub fn from_precision_recall(precision: f64, recall: f64) -> Self {
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
        }
    }
}

/// ROUGE overlap statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RougeResults {
    pub rouge1: Prf,
    pub rouge2: Prf,
    #[serde(rename = "rougeL")]
    pub rouge_l: Prf,
}

/// METEOR score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeteorResults {
    pub overall: f64,
}

/// N-gram statistics, each map keyed by the n-gram order.
///
/// The per-line maps hold averages over lines: unique n-grams per line,
/// total n-grams per line (average line length for n = 1) and the mean of
/// the per-line unique/total ratios (a repetition signal). The overall maps
/// hold whole-corpus counts: distinct n-grams (vocabulary for n = 1), total
/// n-gram instances, and their ratio (a diversity signal).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NgramResults {
    pub perline_avg_unique: BTreeMap<usize, f64>,
    pub perline_avg_total: BTreeMap<usize, f64>,
    pub perline_avg_ratio: BTreeMap<usize, f64>,
    pub overall_unique: BTreeMap<usize, u64>,
    pub overall_total: BTreeMap<usize, u64>,
    pub overall_ratio: BTreeMap<usize, f64>,
}

/// Result of one metric for one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricResult {
    Bleu(BleuResults),
    Rouge(RougeResults),
    Meteor(MeteorResults),
    Ngrams(NgramResults),
}

impl MetricResult {
    /// The metric this result belongs to
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricResult::Bleu(_) => MetricKind::Bleu,
            MetricResult::Rouge(_) => MetricKind::Rouge,
            MetricResult::Meteor(_) => MetricKind::Meteor,
            MetricResult::Ngrams(_) => MetricKind::Ngrams,
        }
    }
}
