//! textmetrics - automatic metrics for generated text
//!
//! Reads candidate and reference corpora, stages them for external scorers,
//! collects BLEU, ROUGE, METEOR and n-gram statistics per candidate, and
//! projects the results into a table.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod staging;
