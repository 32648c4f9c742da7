//! Metric computation and dispatch
//!
//! Comparative metrics score every candidate against the staged references:
//! - `bleu` - external perl script, any number of references
//! - `rouge` - in-process overlap statistics, single reference
//! - `meteor` - external jar, single reference
//!
//! The intrinsic `ngrams` metric works on in-memory text and needs no staging.
//!
//! [`dispatch`] applies the same policy to every comparative metric: skip
//! (with a warning) when the reference count is unsupported, then score each
//! candidate independently. A failed candidate leaves its slot empty; a
//! timed-out scorer aborts the whole run.

pub mod bleu;
pub mod external;
pub mod meteor;
pub mod ngrams;
pub mod rouge;

use crate::config::ToolsConfig;
use crate::corpus::{CandidateSet, ReferenceSet};
use crate::models::{MetricKind, MetricResult};
use external::ExternalToolResult;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

pub use bleu::Bleu;
pub use meteor::Meteor;
pub use rouge::Rouge;

/// Errors for a single candidate's metric computation
#[derive(Error, Debug)]
pub enum MetricError {
    #[error("{tool} failed to run: {message}")]
    Tool { tool: String, message: String },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("{tool} exited with code {code}: {stderr}")]
    ExitStatus {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("Unexpected {tool} output: {output:?}")]
    Parse { tool: String, output: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line count mismatch: candidate has {candidate} lines, reference has {reference}")]
    LineMismatch { candidate: usize, reference: usize },

    #[error("Candidate '{0}' has no staged file")]
    NotStaged(String),
}

impl MetricError {
    /// Errors that end the run instead of emptying one slot
    pub fn is_fatal(&self) -> bool {
        matches!(self, MetricError::Timeout { .. })
    }

    pub(crate) fn parse(tool: &str, output: &str) -> Self {
        MetricError::Parse {
            tool: tool.to_string(),
            output: output.to_string(),
        }
    }
}

/// Turn a finished tool run into its stdout, or the matching error.
pub(crate) fn tool_stdout(
    result: ExternalToolResult,
    tool: &str,
    timeout_secs: u64,
) -> Result<String, MetricError> {
    if result.timed_out {
        return Err(MetricError::Timeout {
            tool: tool.to_string(),
            secs: timeout_secs,
        });
    }
    if !result.success {
        return Err(MetricError::Tool {
            tool: tool.to_string(),
            message: result.error.unwrap_or_default(),
        });
    }
    if result.exited_cleanly() {
        return Ok(result.stdout);
    }
    Err(MetricError::ExitStatus {
        tool: tool.to_string(),
        code: result.return_code.unwrap_or(-1),
        stderr: result.stderr.trim().to_string(),
    })
}

/// A comparative metric computed from staged files
pub trait Metric {
    /// Which result slot this metric fills
    fn kind(&self) -> MetricKind;

    /// Most references the metric can combine, `None` for no limit
    fn max_references(&self) -> Option<usize> {
        None
    }

    /// Score one staged candidate file against the staged reference files
    fn score(&self, references: &[&Path], candidate: &Path) -> Result<MetricResult, MetricError>;
}

/// Outcome of dispatching one metric over all candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub kind: MetricKind,
    /// Candidates that received a result
    pub scored: usize,
    /// Candidates whose computation failed
    pub failed: usize,
    /// The metric did not run at all
    pub skipped: bool,
}

/// Run `metric` for every candidate and store results on success.
///
/// Skips the metric entirely when there are no staged references or more
/// references than it supports. Per-candidate failures are logged and leave
/// that candidate's slot absent. A scorer timeout stops dispatch and is
/// returned.
pub fn dispatch(
    metric: &dyn Metric,
    references: &ReferenceSet,
    candidates: &mut CandidateSet,
) -> Result<DispatchSummary, MetricError> {
    let kind = metric.kind();
    let mut summary = DispatchSummary {
        kind,
        scored: 0,
        failed: 0,
        skipped: false,
    };

    let ref_files = references.staged_files();
    if ref_files.is_empty() {
        warn!("{} needs staged references; skipping", kind);
        summary.skipped = true;
        return Ok(summary);
    }
    if let Some(max) = metric.max_references() {
        if ref_files.len() > max {
            warn!(
                "{} currently only supported for {} reference{} ({} given); skipping",
                kind,
                max,
                if max == 1 { "" } else { "s" },
                ref_files.len()
            );
            summary.skipped = true;
            return Ok(summary);
        }
    }

    info!("Computing {}...", kind);
    for (name, corpus) in candidates.corpora.iter_mut() {
        let outcome = match corpus.tmpfile() {
            Some(file) => metric.score(&ref_files, file),
            None => Err(MetricError::NotStaged(name.to_string())),
        };
        match outcome {
            Ok(result) => {
                corpus.set_result(result);
                summary.scored += 1;
            }
            Err(e) if e.is_fatal() => {
                error!("{} aborted on {}: {}", kind, name, e);
                return Err(e);
            }
            Err(e) => {
                warn!("{} failed for {}: {}", kind, name, e);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// The comparative metrics in display order
pub fn comparative_metrics(tools: &ToolsConfig) -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(Bleu::new(tools)),
        Box::new(Rouge),
        Box::new(Meteor::new(tools)),
    ]
}
