//! Staging of corpora to temporary files for external scorers
//!
//! BLEU and METEOR are flexible about where files live, but ROUGE-style
//! tooling is strict, so every run follows the ROUGE layout:
//!
//! ```text
//! <reference dir>/            (one, shared by all references)
//!     reference.A.001.txt
//!     reference.B.001.txt
//!     ...
//! <candidate dir 1>/          (one per candidate)
//!     candidate.001.txt
//! <candidate dir 2>/
//!     candidate.001.txt
//! ```
//!
//! Every directory is owned by a [`tempfile::TempDir`] inside the
//! [`StagingArea`]. Dropping the area (e.g. on an early `?` return) removes
//! the directories but leaves the staged paths recorded on the corpora, which
//! then point at nothing. [`StagingArea::release`] removes the directories
//! and clears those paths; it consumes the area, so explicit cleanup can only
//! happen once. Callers that keep using the corpora must release, not drop.

use crate::corpus::{CandidateSet, ReferenceSet};
use std::path::PathBuf;
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;

/// Single-letter labels for staged references, in input order
pub const REF_LABELS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Most references the labeling scheme can address
pub const MAX_REFERENCES: usize = REF_LABELS.len();

/// Filename of the single file in each candidate directory
pub const CANDIDATE_FILENAME: &str = "candidate.001.txt";

/// Filename of the reference labeled `label`
pub fn reference_filename(label: char) -> String {
    format!("reference.{}.001.txt", label)
}

/// Errors raised while staging or releasing temp files
#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Can only have at most {max} references, got {count}")]
    TooManyReferences { count: usize, max: usize },

    #[error("Failed to create staging directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("Failed to write staged file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove staging directory {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Owner of every temp directory created for one run
///
/// The area holds no borrow of the corpora, so `Drop` can only remove
/// directories. Use [`StagingArea::release`] to also clear the recorded paths.
#[derive(Debug, Default)]
pub struct StagingArea {
    candidate_dirs: Vec<TempDir>,
    reference_dir: Option<TempDir>,
}

impl StagingArea {
    /// Write every candidate (and every reference, if given) to disk and
    /// record the staged paths on each corpus.
    ///
    /// Fails with [`StagingError::TooManyReferences`] before touching the
    /// filesystem when more than [`MAX_REFERENCES`] references are supplied.
    pub fn stage(
        mut references: Option<&mut ReferenceSet>,
        candidates: &mut CandidateSet,
    ) -> Result<Self, StagingError> {
        if let Some(refs) = references.as_deref() {
            if refs.corpora.len() > MAX_REFERENCES {
                return Err(StagingError::TooManyReferences {
                    count: refs.corpora.len(),
                    max: MAX_REFERENCES,
                });
            }
        }

        let mut area = StagingArea::default();
        if let Err(e) = area.stage_all(references.as_deref_mut(), candidates) {
            // The area drops here and takes its directories with it, so no
            // corpus may keep pointing into them.
            forget_paths(references, candidates);
            return Err(e);
        }
        Ok(area)
    }

    fn stage_all(
        &mut self,
        references: Option<&mut ReferenceSet>,
        candidates: &mut CandidateSet,
    ) -> Result<(), StagingError> {
        // Each candidate lives in its own directory with a single file.
        for (name, corpus) in candidates.corpora.iter_mut() {
            let dir = tempfile::Builder::new()
                .prefix("textmetrics-candidate-")
                .tempdir()
                .map_err(StagingError::CreateDir)?;
            let file = dir.path().join(CANDIDATE_FILENAME);
            write_file(&file, corpus.contents())?;
            debug!("Staged candidate {} at {}", name, file.display());
            corpus.set_staged(file, Some(dir.path().to_path_buf()));
            self.candidate_dirs.push(dir);
        }

        let Some(references) = references else {
            return Ok(());
        };

        let dir = tempfile::Builder::new()
            .prefix("textmetrics-references-")
            .tempdir()
            .map_err(StagingError::CreateDir)?;
        references.tmpdir = Some(dir.path().to_path_buf());
        let dir_path = dir.path().to_path_buf();
        self.reference_dir = Some(dir);

        for ((name, corpus), label) in references.corpora.iter_mut().zip(REF_LABELS) {
            let file = dir_path.join(reference_filename(label));
            write_file(&file, corpus.contents())?;
            debug!("Staged reference {} as {}", name, file.display());
            corpus.set_staged(file, None);
        }
        Ok(())
    }

    /// Remove every staged directory and clear the paths recorded on the
    /// corpora. Safe when references are absent or were never staged.
    ///
    /// All directories are attempted even if one fails; the first failure
    /// is returned.
    pub fn release(
        self,
        references: Option<&mut ReferenceSet>,
        candidates: &mut CandidateSet,
    ) -> Result<(), StagingError> {
        forget_paths(references, candidates);

        let mut first_err = None;
        let dirs = self.candidate_dirs.into_iter().chain(self.reference_dir);
        for dir in dirs {
            let path = dir.path().to_path_buf();
            debug!("Removing {}", path.display());
            if let Err(source) = dir.close() {
                first_err.get_or_insert(StagingError::Remove { path, source });
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn write_file(path: &std::path::Path, contents: &str) -> Result<(), StagingError> {
    std::fs::write(path, contents.as_bytes()).map_err(|source| StagingError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn forget_paths(references: Option<&mut ReferenceSet>, candidates: &mut CandidateSet) {
    for corpus in candidates.corpora.values_mut() {
        corpus.clear_staged();
    }
    if let Some(refs) = references {
        refs.tmpdir = None;
        for corpus in refs.corpora.values_mut() {
            corpus.clear_staged();
        }
    }
}
