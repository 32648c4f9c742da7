//! N-gram diversity statistics
//!
//! Intrinsic metrics computed straight from in-memory candidate text:
//! per-line and whole-corpus counts of unique and total n-grams.
//!
//! Tokenization is deliberately literal. Each line is trimmed and split on
//! single spaces, so consecutive spaces produce empty tokens exactly as the
//! input was written. A blank line has no tokens.

use crate::corpus::CandidateSet;
use crate::models::{MetricResult, NgramResults};
use std::collections::HashMap;
use tracing::debug;

/// Orders computed when nothing else is configured
pub const DEFAULT_ORDERS: [usize; 4] = [1, 2, 3, 4];

/// Statistics for one n-gram order over one text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NgramStats {
    /// Mean of per-line unique n-gram counts
    pub perline_avg_unique: f64,
    /// Mean of per-line total n-gram counts
    pub perline_avg_total: f64,
    /// Mean of per-line unique/total ratios (not the ratio of the means)
    pub perline_avg_ratio: f64,
    /// Distinct n-grams across the whole text
    pub overall_unique: u64,
    /// N-gram instances across the whole text
    pub overall_total: u64,
    /// `overall_unique / overall_total`, 0 when there are no n-grams
    pub overall_ratio: f64,
}

/// Tokens of one line
fn tokens(line: &str) -> Vec<&str> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    line.split(' ').collect()
}

/// Counts of every `n`-gram in `line`. Lines shorter than `n` give nothing.
pub fn line_ngrams(line: &str, n: usize) -> HashMap<String, u64> {
    let mut grams = HashMap::new();
    if n == 0 {
        return grams;
    }
    let tkns = tokens(line);
    for window in tkns.windows(n) {
        *grams.entry(window.join(" ")).or_insert(0) += 1;
    }
    grams
}

/// Compute the statistics for order `n` over `text`.
///
/// A line with no n-grams has a per-line ratio of 0 and still counts as a
/// line in every per-line mean. Text with no lines yields all zeros.
pub fn ngram_stats(text: &str, n: usize) -> NgramStats {
    let mut overall: HashMap<String, u64> = HashMap::new();

    let mut unique_sum = 0u64;
    let mut total_sum = 0u64;
    let mut ratio_sum = 0.0f64;
    let mut n_lines = 0u64;

    for line in text.lines() {
        let grams = line_ngrams(line, n);

        let unique = grams.len() as u64;
        let total: u64 = grams.values().sum();

        unique_sum += unique;
        total_sum += total;
        if total > 0 {
            ratio_sum += unique as f64 / total as f64;
        }
        n_lines += 1;

        for (gram, count) in grams {
            *overall.entry(gram).or_insert(0) += count;
        }
    }

    let overall_unique = overall.len() as u64;
    let overall_total: u64 = overall.values().sum();

    NgramStats {
        perline_avg_unique: mean(unique_sum as f64, n_lines),
        perline_avg_total: mean(total_sum as f64, n_lines),
        perline_avg_ratio: mean(ratio_sum, n_lines),
        overall_unique,
        overall_total,
        overall_ratio: mean(overall_unique as f64, overall_total),
    }
}

fn mean(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Compute statistics for each order in `orders` and assemble the result.
pub fn run_ngrams(text: &str, orders: &[usize]) -> NgramResults {
    let mut res = NgramResults::default();
    for &n in orders {
        let stats = ngram_stats(text, n);
        res.perline_avg_unique.insert(n, stats.perline_avg_unique);
        res.perline_avg_total.insert(n, stats.perline_avg_total);
        res.perline_avg_ratio.insert(n, stats.perline_avg_ratio);
        res.overall_unique.insert(n, stats.overall_unique);
        res.overall_total.insert(n, stats.overall_total);
        res.overall_ratio.insert(n, stats.overall_ratio);
    }
    res
}

/// Store n-gram results on every candidate
pub fn ngrams(candidates: &mut CandidateSet, orders: &[usize]) {
    for (name, corpus) in candidates.corpora.iter_mut() {
        let res = run_ngrams(corpus.contents(), orders);
        debug!("ngrams for {}: {:?}", name, res.overall_unique);
        corpus.set_result(MetricResult::Ngrams(res));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHEESE: &str = "i like to eat cheese . \n cheese is what i like to eat";

    #[test]
    fn test_uni() {
        let expected = 8;
        // sanity check against a plain whitespace vocabulary
        let vocab: std::collections::HashSet<_> = CHEESE.split_whitespace().collect();
        assert_eq!(vocab.len(), expected);
        assert_eq!(run_ngrams(CHEESE, &[1]).overall_unique[&1], expected as u64);
    }

    #[test]
    fn test_bi() {
        assert_eq!(run_ngrams(CHEESE, &[2]).overall_unique[&2], 8);
    }

    #[test]
    fn test_tri() {
        assert_eq!(run_ngrams(CHEESE, &[3]).overall_unique[&3], 7);
    }

    #[test]
    fn test_quad() {
        assert_eq!(run_ngrams(CHEESE, &[4]).overall_unique[&4], 6);
    }

    #[test]
    fn test_unigram_totals_and_ratios() {
        let stats = ngram_stats("i like to eat cheese .\ncheese is what i like to eat", 1);
        assert_eq!(stats.overall_total, 13);
        assert_eq!(stats.overall_unique, 8);
        assert!((stats.overall_ratio - 8.0 / 13.0).abs() < 1e-12);
        assert!((stats.perline_avg_unique - 6.5).abs() < 1e-12);
        assert!((stats.perline_avg_total - 6.5).abs() < 1e-12);
        assert!((stats.perline_avg_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_of_ratios_not_ratio_of_means() {
        // line 1: "a a" -> 1 unique / 2 total = 0.5
        // line 2: "b c d e" -> 4 / 4 = 1.0
        let stats = ngram_stats("a a\nb c d e", 1);
        assert!((stats.perline_avg_ratio - 0.75).abs() < 1e-12);
        // ratio of means would be 5/6
        assert!((stats.perline_avg_unique / stats.perline_avg_total - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_blank_line_has_no_ngrams() {
        let stats = ngram_stats("\n", 1);
        assert_eq!(stats.overall_total, 0);
        assert_eq!(stats.overall_unique, 0);
        assert_eq!(stats.overall_ratio, 0.0);
        assert_eq!(stats.perline_avg_ratio, 0.0);
        assert_eq!(stats.perline_avg_total, 0.0);
    }

    #[test]
    fn test_short_line_counts_toward_means() {
        // n = 3: first line has 1 trigram, second line none
        let stats = ngram_stats("a b c\nd e", 3);
        assert_eq!(stats.overall_total, 1);
        assert!((stats.perline_avg_total - 0.5).abs() < 1e-12);
        assert!((stats.perline_avg_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(ngram_stats("", 2), NgramStats::default());
    }

    #[test]
    fn test_consecutive_spaces_are_not_collapsed() {
        let grams = line_ngrams("a  b", 1);
        assert_eq!(grams.get(""), Some(&1));
        assert_eq!(grams.values().sum::<u64>(), 3);
    }

    #[test]
    fn test_ngrams_stores_results_on_candidates() {
        use crate::corpus::CorpusGroup;
        use crate::models::MetricKind;

        let mut group = CorpusGroup::new();
        group.insert("a.txt", "x y z").unwrap();
        group.insert("b.txt", "x x").unwrap();
        let mut cands = CandidateSet::new(group);
        ngrams(&mut cands, &DEFAULT_ORDERS);

        for corpus in cands.corpora.values() {
            let Some(MetricResult::Ngrams(res)) = corpus.result(MetricKind::Ngrams) else {
                panic!("missing ngram result");
            };
            assert_eq!(res.overall_total.len(), 4);
        }
    }
}
