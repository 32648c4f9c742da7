//! ROUGE overlap statistics
//!
//! Computed in-process from the staged candidate and reference files. Lines
//! are paired one to one, each pair is scored, and precision, recall and f1
//! are averaged over all pairs:
//! - ROUGE-1 / ROUGE-2: clipped n-gram overlap
//! - ROUGE-L: longest common subsequence of tokens
//!
//! A pair where either side has no n-grams scores zero. Only a single
//! reference is supported.

use super::{Metric, MetricError};
use crate::models::{MetricKind, MetricResult, Prf, RougeResults};
use std::collections::HashMap;
use std::path::Path;

/// Clipped n-gram overlap between a hypothesis and a reference line
pub fn rouge_n(hypothesis: &[&str], reference: &[&str], n: usize) -> Prf {
    let hyp = count_ngrams(hypothesis, n);
    let refs = count_ngrams(reference, n);

    let hyp_total: usize = hyp.values().sum();
    let ref_total: usize = refs.values().sum();
    if hyp_total == 0 || ref_total == 0 {
        return Prf::default();
    }

    let overlap: usize = hyp
        .iter()
        .map(|(gram, &count)| count.min(refs.get(gram).copied().unwrap_or(0)))
        .sum();

    Prf::from_precision_recall(
        overlap as f64 / hyp_total as f64,
        overlap as f64 / ref_total as f64,
    )
}

/// LCS-based precision/recall between a hypothesis and a reference line
pub fn rouge_l(hypothesis: &[&str], reference: &[&str]) -> Prf {
    if hypothesis.is_empty() || reference.is_empty() {
        return Prf::default();
    }
    let lcs = lcs_length(hypothesis, reference);
    Prf::from_precision_recall(
        lcs as f64 / hypothesis.len() as f64,
        lcs as f64 / reference.len() as f64,
    )
}

fn count_ngrams<'a>(tokens: &'a [&'a str], n: usize) -> HashMap<&'a [&'a str], usize> {
    let mut counts = HashMap::new();
    if n == 0 {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// Length of the longest common subsequence (two-row DP)
fn lcs_length(a: &[&str], b: &[&str]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Score two whole texts, pairing lines one to one.
pub fn score_texts(hypothesis: &str, reference: &str) -> Result<RougeResults, MetricError> {
    let hyp_lines: Vec<&str> = hypothesis.lines().collect();
    let ref_lines: Vec<&str> = reference.lines().collect();
    if hyp_lines.len() != ref_lines.len() {
        return Err(MetricError::LineMismatch {
            candidate: hyp_lines.len(),
            reference: ref_lines.len(),
        });
    }

    let mut sums = [Prf::default(); 3];
    for (hyp, reference) in hyp_lines.iter().zip(&ref_lines) {
        let hyp: Vec<&str> = hyp.split_whitespace().collect();
        let reference: Vec<&str> = reference.split_whitespace().collect();
        let scores = [
            rouge_n(&hyp, &reference, 1),
            rouge_n(&hyp, &reference, 2),
            rouge_l(&hyp, &reference),
        ];
        for (sum, score) in sums.iter_mut().zip(scores) {
            sum.precision += score.precision;
            sum.recall += score.recall;
            sum.f1 += score.f1;
        }
    }

    let pairs = hyp_lines.len().max(1) as f64;
    let avg = |s: Prf| Prf {
        precision: s.precision / pairs,
        recall: s.recall / pairs,
        f1: s.f1 / pairs,
    };
    Ok(RougeResults {
        rouge1: avg(sums[0]),
        rouge2: avg(sums[1]),
        rouge_l: avg(sums[2]),
    })
}

fn read(path: &Path) -> Result<String, MetricError> {
    std::fs::read_to_string(path).map_err(|source| MetricError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// ROUGE scorer over staged files
#[derive(Debug, Clone, Copy, Default)]
pub struct Rouge;

impl Metric for Rouge {
    fn kind(&self) -> MetricKind {
        MetricKind::Rouge
    }

    fn max_references(&self) -> Option<usize> {
        Some(1)
    }

    fn score(&self, references: &[&Path], candidate: &Path) -> Result<MetricResult, MetricError> {
        let reference = references.first().ok_or_else(|| MetricError::Tool {
            tool: "ROUGE".to_string(),
            message: "no reference file".to_string(),
        })?;
        let hypothesis = read(candidate)?;
        let reference = read(reference)?;
        score_texts(&hypothesis, &reference).map(MetricResult::Rouge)
    }
}
