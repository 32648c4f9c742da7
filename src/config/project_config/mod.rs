//! Project-level configuration support
//!
//! Loads configuration from `textmetrics.toml` in the working directory, or
//! from an explicit `--config` path.
//!
//! # Configuration Format
//!
//! ```toml
//! # textmetrics.toml
//!
//! [tools]
//! perl = "perl"
//! bleu_script = "scripts/multi-bleu.perl"
//! java = "java"
//! meteor_jar = "lib/meteor-1.5.jar"
//! java_heap = "2G"
//! meteor_language = "en"
//! timeout_secs = 600   # 0 = wait forever
//!
//! [ngrams]
//! orders = [1, 2, 3, 4]
//!
//! [defaults]
//! clean_tokens = "clean_tokens.txt"
//! verbosity = 1
//! format = "text"
//! ```
//!
//! Environment variables override tool locations from the file:
//! `TEXTMETRICS_PERL`, `TEXTMETRICS_BLEU_SCRIPT`, `TEXTMETRICS_JAVA`,
//! `TEXTMETRICS_METEOR_JAR`.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Config filename looked up in the working directory
pub const CONFIG_FILENAME: &str = "textmetrics.toml";

/// Errors loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Project-level configuration loaded from textmetrics.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// External scorer locations and limits
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Intrinsic metric settings
    #[serde(default)]
    pub ngrams: NgramConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// External scorer settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Perl interpreter used to run the BLEU script
    pub perl: String,
    /// Path to multi-bleu.perl
    pub bleu_script: PathBuf,
    /// Java runtime used to run METEOR
    pub java: String,
    /// Path to the METEOR jar
    pub meteor_jar: PathBuf,
    /// Max heap passed as `-Xmx`
    pub java_heap: String,
    /// METEOR language code
    pub meteor_language: String,
    /// Per-invocation timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            perl: "perl".to_string(),
            bleu_script: PathBuf::from("multi-bleu.perl"),
            java: "java".to_string(),
            meteor_jar: PathBuf::from("meteor-1.5.jar"),
            java_heap: "2G".to_string(),
            meteor_language: "en".to_string(),
            timeout_secs: 600,
        }
    }
}

/// N-gram statistics settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NgramConfig {
    /// Orders to compute, in display order
    pub orders: Vec<usize>,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            orders: crate::metrics::ngrams::DEFAULT_ORDERS.to_vec(),
        }
    }
}

/// CLI defaults (flags given on the command line win)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Token removal list
    #[serde(default)]
    pub clean_tokens: Option<PathBuf>,

    /// Default verbosity (0 or 1)
    #[serde(default)]
    pub verbosity: Option<u8>,

    /// Default output format (text, markdown, csv, json)
    #[serde(default)]
    pub format: Option<String>,
}

impl ProjectConfig {
    /// Apply overrides from a variable lookup (normally the environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TEXTMETRICS_PERL") {
            self.tools.perl = v;
        }
        if let Some(v) = lookup("TEXTMETRICS_BLEU_SCRIPT") {
            self.tools.bleu_script = PathBuf::from(v);
        }
        if let Some(v) = lookup("TEXTMETRICS_JAVA") {
            self.tools.java = v;
        }
        if let Some(v) = lookup("TEXTMETRICS_METEOR_JAR") {
            self.tools.meteor_jar = PathBuf::from(v);
        }
    }

    /// Reject settings no run could use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ngrams.orders.iter().any(|&n| n == 0) {
            return Err(ConfigError::Invalid(
                "ngrams.orders must only contain values >= 1".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(n) = self.ngrams.orders.iter().find(|&&n| !seen.insert(n)) {
            return Err(ConfigError::Invalid(format!(
                "ngrams.orders lists order {} more than once",
                n
            )));
        }
        if let Some(v) = self.defaults.verbosity {
            if v > 1 {
                return Err(ConfigError::Invalid(format!(
                    "defaults.verbosity must be 0 or 1, got {}",
                    v
                )));
            }
        }
        Ok(())
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `textmetrics.toml` in `dir` is
/// used if present, else defaults. Environment overrides are applied last.
pub fn load_project_config(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<ProjectConfig, ConfigError> {
    let mut config = match explicit {
        Some(path) => load_toml_config(path)?,
        None => {
            let path = dir.join(CONFIG_FILENAME);
            if path.exists() {
                load_toml_config(&path)?
            } else {
                debug!("No project config found, using defaults");
                ProjectConfig::default()
            }
        }
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ProjectConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded project config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests;
