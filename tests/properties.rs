//! Property-based tests for the n-gram engine, token cleaning, ROUGE and
//! staging.

use proptest::prelude::*;
use std::collections::HashSet;
use textmetrics::corpus::{clean, CandidateSet, CorpusGroup};
use textmetrics::metrics::ngrams::ngram_stats;
use textmetrics::metrics::rouge::score_texts;
use textmetrics::staging::StagingArea;

/// Space-separated tokens from a small vocabulary, a few lines
fn text_strategy() -> impl Strategy<Value = String> {
    let line = prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "."]), 0..12)
        .prop_map(|tokens| tokens.join(" "));
    prop::collection::vec(line, 0..8).prop_map(|lines| lines.join("\n"))
}

/// Like `text_strategy`, but every line has at least one token
fn nonblank_text_strategy() -> impl Strategy<Value = String> {
    let line = prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "."]), 1..12)
        .prop_map(|tokens| tokens.join(" "));
    prop::collection::vec(line, 1..8).prop_map(|lines| lines.join("\n"))
}

/// Like `text_strategy`, but lines carry stray leading and trailing spaces
/// or tabs and may end in `\r\n`
fn padded_text_strategy() -> impl Strategy<Value = String> {
    let pad = || prop::collection::vec(prop::sample::select(vec![" ", "\t"]), 0..3);
    let tokens = prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "."]), 0..12);
    let line = (pad(), tokens, pad()).prop_map(|(lead, tokens, trail)| {
        format!("{}{}{}", lead.concat(), tokens.join(" "), trail.concat())
    });
    let ending = prop::sample::select(vec!["\n", "\r\n"]);
    prop::collection::vec((line, ending), 0..8).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(line, ending)| line + ending)
            .collect::<String>()
    })
}

proptest! {
    // ========================
    // N-gram Statistics
    // ========================

    #[test]
    fn unique_never_exceeds_total(text in text_strategy(), n in 1usize..5) {
        let stats = ngram_stats(&text, n);
        prop_assert!(stats.overall_unique <= stats.overall_total);
        prop_assert!(stats.perline_avg_unique <= stats.perline_avg_total + 1e-9);
    }

    #[test]
    fn overall_ratio_is_unique_over_total(text in text_strategy(), n in 1usize..5) {
        let stats = ngram_stats(&text, n);
        if stats.overall_total == 0 {
            prop_assert_eq!(stats.overall_ratio, 0.0);
        } else {
            let expected = stats.overall_unique as f64 / stats.overall_total as f64;
            prop_assert!((stats.overall_ratio - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn ratios_are_bounded(text in text_strategy(), n in 1usize..5) {
        let stats = ngram_stats(&text, n);
        prop_assert!((0.0..=1.0).contains(&stats.overall_ratio));
        prop_assert!((0.0..=1.0).contains(&stats.perline_avg_ratio));
    }

    #[test]
    fn higher_orders_have_fewer_instances(text in text_strategy(), n in 1usize..4) {
        let lower = ngram_stats(&text, n);
        let higher = ngram_stats(&text, n + 1);
        prop_assert!(higher.overall_total <= lower.overall_total);
    }

    #[test]
    fn surrounding_whitespace_does_not_change_counts(text in padded_text_strategy(), n in 1usize..4) {
        let normalized: String = text
            .lines()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join("\n");
        prop_assume!(normalized != text);
        let a = ngram_stats(&text, n);
        let b = ngram_stats(&normalized, n);
        prop_assert_eq!(a.overall_unique, b.overall_unique);
        prop_assert_eq!(a.overall_total, b.overall_total);
    }

    // ========================
    // Token Cleaning
    // ========================

    #[test]
    fn clean_is_idempotent(text in text_strategy()) {
        let removal: HashSet<String> = [".".to_string(), "b".to_string()].into_iter().collect();
        let once = clean::clean(&text, &removal);
        let twice = clean::clean(&once, &removal);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clean_keeps_line_count(text in text_strategy()) {
        let removal: HashSet<String> = ["a".to_string()].into_iter().collect();
        let cleaned = clean::clean(&text, &removal);
        prop_assert_eq!(cleaned.split('\n').count(), text.split('\n').count());
        prop_assert!(cleaned.split(|c: char| c == ' ' || c == '\n').all(|t| t != "a"));
    }

    #[test]
    fn empty_removal_list_is_identity(text in text_strategy()) {
        prop_assert_eq!(clean::clean(&text, &HashSet::new()), text);
    }

    // ========================
    // ROUGE
    // ========================

    #[test]
    fn rouge_of_reordered_lines(text in nonblank_text_strategy()) {
        let reversed: String = text
            .lines()
            .map(|l| l.split(' ').rev().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n");
        let res = score_texts(&text, &reversed).unwrap();
        for prf in [res.rouge1, res.rouge2, res.rouge_l] {
            prop_assert!((0.0..=1.0 + 1e-9).contains(&prf.f1));
            prop_assert!((0.0..=1.0 + 1e-9).contains(&prf.precision));
        }
        // reversal keeps every unigram
        prop_assert!((res.rouge1.f1 - 1.0).abs() < 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // ========================
    // Staging
    // ========================

    #[test]
    fn staged_candidate_round_trips(content in "\\PC*") {
        let mut group = CorpusGroup::new();
        group.insert("c.txt", content.clone()).unwrap();
        let mut cands = CandidateSet::new(group);

        let area = StagingArea::stage(None, &mut cands).unwrap();
        let file = cands.corpora.get("c.txt").unwrap().tmpfile().unwrap().to_path_buf();
        let read_back = std::fs::read(&file).unwrap();
        prop_assert_eq!(read_back, content.as_bytes().to_vec());

        area.release(None, &mut cands).unwrap();
        prop_assert!(!file.exists());
    }
}
