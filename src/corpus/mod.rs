//! Corpus store
//!
//! In-memory text bodies for references and candidates, plus the artifacts
//! derived from them while a run progresses:
//! - staged file locations (set by [`crate::staging`])
//! - per-metric results (set by [`crate::metrics`], candidates only)
//!
//! Corpora are keyed by their source filename and keep insertion order,
//! which drives both reference labeling and table column order.

pub mod clean;

use crate::models::{MetricKind, MetricResult};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while building the corpus store
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Duplicate corpus name '{0}': each input file may only be given once per group")]
    Duplicate(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One text body plus its staged paths and metric results
#[derive(Debug, Clone, Default, Serialize)]
pub struct Corpus {
    contents: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tmpfile: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tmpdir: Option<PathBuf>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    results: BTreeMap<MetricKind, MetricResult>,
}

impl Corpus {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            ..Default::default()
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Replace the text body (used by preprocessing, before staging)
    pub fn set_contents(&mut self, contents: String) {
        self.contents = contents;
    }

    /// Staged file, `None` until staged and after release
    pub fn tmpfile(&self) -> Option<&Path> {
        self.tmpfile.as_deref()
    }

    /// Private staging directory (candidates only)
    pub fn tmpdir(&self) -> Option<&Path> {
        self.tmpdir.as_deref()
    }

    pub(crate) fn set_staged(&mut self, tmpfile: PathBuf, tmpdir: Option<PathBuf>) {
        self.tmpfile = Some(tmpfile);
        self.tmpdir = tmpdir;
    }

    pub(crate) fn clear_staged(&mut self) {
        self.tmpfile = None;
        self.tmpdir = None;
    }

    /// Result for `kind`, present only if that metric ran successfully
    pub fn result(&self, kind: MetricKind) -> Option<&MetricResult> {
        self.results.get(&kind)
    }

    /// Store a metric result, keyed by the result's own metric
    pub fn set_result(&mut self, result: MetricResult) {
        self.results.insert(result.kind(), result);
    }

    pub fn results(&self) -> &BTreeMap<MetricKind, MetricResult> {
        &self.results
    }

    /// Results as a nested JSON object (`{"bleu": {...}, "ngrams": {...}}`)
    pub fn results_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.results).unwrap_or(serde_json::Value::Null)
    }
}

/// Ordered mapping of corpus name to corpus
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CorpusGroup {
    corpora: IndexMap<String, Corpus>,
}

impl CorpusGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file into a new group, named by the path as given.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, CorpusError> {
        let mut group = Self::new();
        for path in paths {
            let path = path.as_ref();
            let contents = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Read {} ({} bytes)", path.display(), contents.len());
            group.insert(path.display().to_string(), contents)?;
        }
        Ok(group)
    }

    /// Add a corpus. Names must be unique within the group.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        contents: impl Into<String>,
    ) -> Result<(), CorpusError> {
        let name = name.into();
        if self.corpora.contains_key(&name) {
            return Err(CorpusError::Duplicate(name));
        }
        self.corpora.insert(name, Corpus::new(contents));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Corpus> {
        self.corpora.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Corpus> {
        self.corpora.get_mut(name)
    }

    /// Names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.corpora.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Corpus)> {
        self.corpora.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Corpus)> {
        self.corpora.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &Corpus> {
        self.corpora.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Corpus> {
        self.corpora.values_mut()
    }

    pub fn len(&self) -> usize {
        self.corpora.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }

    /// Remove `removal` tokens from every corpus in the group
    pub fn clean_all(&mut self, removal: &HashSet<String>) {
        if removal.is_empty() {
            return;
        }
        for corpus in self.corpora.values_mut() {
            let cleaned = clean::clean(corpus.contents(), removal);
            corpus.set_contents(cleaned);
        }
    }
}

/// Reference corpora, staged together in one shared directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceSet {
    pub corpora: CorpusGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmpdir: Option<PathBuf>,
}

impl ReferenceSet {
    pub fn new(corpora: CorpusGroup) -> Self {
        Self {
            corpora,
            tmpdir: None,
        }
    }

    /// Staged reference files in insertion order. Unstaged corpora are skipped.
    pub fn staged_files(&self) -> Vec<&Path> {
        self.corpora.values().filter_map(Corpus::tmpfile).collect()
    }
}

/// Candidate corpora, each staged in a private directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateSet {
    pub corpora: CorpusGroup,
}

impl CandidateSet {
    pub fn new(corpora: CorpusGroup) -> Self {
        Self { corpora }
    }
}
