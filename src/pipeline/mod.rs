//! Evaluation pipeline
//!
//! Runs one batch evaluation, strictly in sequence:
//! 1. Reject reference sets the staging layout cannot address
//! 2. Apply the token removal list to every corpus
//! 3. Stage candidates and references to temp directories
//! 4. Dispatch each comparative metric over the staged files
//! 5. Compute n-gram statistics from in-memory text
//! 6. Release the staging area

use anyhow::{Context, Result};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::config::ToolsConfig;
use crate::corpus::{CandidateSet, ReferenceSet};
use crate::metrics::{self, DispatchSummary, Metric};
use crate::reporters::{self, RowSpec, Table, Verbosity};
use crate::staging::{StagingArea, StagingError, MAX_REFERENCES};

/// One configured evaluation run.
pub struct Pipeline {
    metrics: Vec<Box<dyn Metric>>,
    orders: Vec<usize>,
    removal: Option<HashSet<String>>,
    comparative: bool,
    intrinsic: bool,
}

impl Pipeline {
    /// Create a pipeline running BLEU, ROUGE and METEOR plus n-gram
    /// statistics of the default orders.
    pub fn new(tools: &ToolsConfig) -> Self {
        Self::with_metrics(metrics::comparative_metrics(tools))
    }

    /// Create a pipeline with an explicit set of comparative metrics.
    pub fn with_metrics(comparative: Vec<Box<dyn Metric>>) -> Self {
        Self {
            metrics: comparative,
            orders: metrics::ngrams::DEFAULT_ORDERS.to_vec(),
            removal: None,
            comparative: true,
            intrinsic: true,
        }
    }

    /// Set the n-gram orders to compute.
    pub fn with_orders(mut self, orders: Vec<usize>) -> Self {
        self.orders = orders;
        self
    }

    /// Remove these tokens from every corpus before scoring.
    pub fn with_removal_list(mut self, tokens: HashSet<String>) -> Self {
        self.removal = Some(tokens);
        self
    }

    /// Skip BLEU / ROUGE / METEOR.
    pub fn without_comparative(mut self) -> Self {
        self.comparative = false;
        self
    }

    /// Skip n-gram statistics.
    pub fn without_intrinsic(mut self) -> Self {
        self.intrinsic = false;
        self
    }

    /// Rows to project for the enabled metric groups.
    pub fn worklist(&self) -> Vec<RowSpec> {
        reporters::worklist(self.comparative, self.intrinsic, &self.orders)
    }

    /// Run the full evaluation.
    ///
    /// Fails before anything is staged when more than
    /// [`MAX_REFERENCES`] references are given. Staging errors, cleanup errors
    /// and scorer timeouts are fatal; other metric failures only leave result
    /// slots empty. Staged files are removed on every exit path past staging.
    pub fn run(
        &self,
        mut references: Option<ReferenceSet>,
        mut candidates: CandidateSet,
    ) -> Result<Evaluation> {
        if let Some(refs) = &references {
            if refs.corpora.len() > MAX_REFERENCES {
                return Err(StagingError::TooManyReferences {
                    count: refs.corpora.len(),
                    max: MAX_REFERENCES,
                }
                .into());
            }
        }

        if let Some(removal) = &self.removal {
            info!("Removing {} tokens from all corpora...", removal.len());
            candidates.corpora.clean_all(removal);
            if let Some(refs) = references.as_mut() {
                refs.corpora.clean_all(removal);
            }
        }

        let has_refs = references.as_ref().is_some_and(|r| !r.corpora.is_empty());
        let mut summaries = Vec::new();

        if self.comparative && has_refs {
            let area = StagingArea::stage(references.as_mut(), &mut candidates)
                .context("Failed to stage corpora")?;

            let dispatched = match &references {
                Some(refs) => self.dispatch_all(refs, &mut candidates),
                None => Ok(Vec::new()),
            };
            match dispatched {
                Ok(done) => summaries = done,
                Err(e) => {
                    info!("Removing temporary files...");
                    if let Err(cleanup) = area.release(references.as_mut(), &mut candidates) {
                        warn!("Failed to remove staged files: {}", cleanup);
                    }
                    return Err(e);
                }
            }

            if self.intrinsic {
                self.compute_ngrams(&mut candidates);
            }

            info!("Removing temporary files...");
            area.release(references.as_mut(), &mut candidates)
                .context("Failed to remove staged files")?;
        } else {
            if self.comparative {
                warn!("No references given; skipping comparative metrics");
            } else {
                info!("Skipping comparative metrics...");
            }
            if self.intrinsic {
                self.compute_ngrams(&mut candidates);
            }
        }

        if !self.intrinsic {
            info!("Skipping intrinsic metrics...");
        }

        Ok(Evaluation {
            references,
            candidates,
            summaries,
        })
    }

    /// Dispatch every comparative metric, stopping at the first fatal error.
    fn dispatch_all(
        &self,
        references: &ReferenceSet,
        candidates: &mut CandidateSet,
    ) -> Result<Vec<DispatchSummary>> {
        let mut summaries = Vec::with_capacity(self.metrics.len());
        for metric in &self.metrics {
            let kind = metric.kind();
            let summary = metrics::dispatch(metric.as_ref(), references, candidates)
                .with_context(|| format!("Aborting evaluation: {} did not finish", kind))?;
            summaries.push(summary);
        }
        Ok(summaries)
    }

    fn compute_ngrams(&self, candidates: &mut CandidateSet) {
        info!("Computing ngrams...");
        metrics::ngrams::ngrams(candidates, &self.orders);
    }
}

/// Outcome of a pipeline run
#[derive(Debug)]
pub struct Evaluation {
    pub references: Option<ReferenceSet>,
    pub candidates: CandidateSet,
    /// One entry per dispatched comparative metric, in run order
    pub summaries: Vec<DispatchSummary>,
}

impl Evaluation {
    /// Project candidate results into a table.
    pub fn table(&self, rows: &[RowSpec], verbosity: Verbosity) -> Table {
        reporters::project(&self.candidates, rows, verbosity)
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} candidates", self.candidates.corpora.len())];
        if let Some(refs) = &self.references {
            parts.push(format!("{} references", refs.corpora.len()));
        }
        for s in &self.summaries {
            if s.skipped {
                parts.push(format!("{}: skipped", s.kind));
            } else {
                parts.push(format!("{}: {} scored, {} failed", s.kind, s.scored, s.failed));
            }
        }
        parts.join(", ")
    }
}
