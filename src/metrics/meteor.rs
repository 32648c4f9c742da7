//! METEOR via the meteor jar
//!
//! Runs `java -Xmx<heap> -jar <jar> <candidate> <reference> -l <lang> -norm -q`.
//! In quiet mode the jar prints only the final score. The parse contract is:
//! the last non-empty line of stdout, last whitespace-separated token, read
//! as a float. Anything else is a parse error for that candidate.

use super::external::run_external_tool;
use super::{tool_stdout, Metric, MetricError};
use crate::config::ToolsConfig;
use crate::models::{MeteorResults, MetricKind, MetricResult};
use std::path::{Path, PathBuf};

const TOOL: &str = "METEOR";

/// Parse the final score from the jar's output.
pub fn parse_output(output: &str) -> Result<MeteorResults, MetricError> {
    let overall = output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.split_whitespace().last())
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| MetricError::parse(TOOL, output.trim()))?;
    Ok(MeteorResults { overall })
}

/// METEOR scorer, single reference only
#[derive(Debug, Clone)]
pub struct Meteor {
    java: String,
    jar: PathBuf,
    heap: String,
    language: String,
    timeout_secs: u64,
}

impl Meteor {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            java: tools.java.clone(),
            jar: tools.meteor_jar.clone(),
            heap: tools.java_heap.clone(),
            language: tools.meteor_language.clone(),
            timeout_secs: tools.timeout_secs,
        }
    }

    fn command(&self, reference: &Path, candidate: &Path) -> Vec<String> {
        vec![
            self.java.clone(),
            format!("-Xmx{}", self.heap),
            "-jar".to_string(),
            self.jar.display().to_string(),
            candidate.display().to_string(),
            reference.display().to_string(),
            "-l".to_string(),
            self.language.clone(),
            "-norm".to_string(),
            "-q".to_string(),
        ]
    }
}

impl Metric for Meteor {
    fn kind(&self) -> MetricKind {
        MetricKind::Meteor
    }

    fn max_references(&self) -> Option<usize> {
        Some(1)
    }

    fn score(&self, references: &[&Path], candidate: &Path) -> Result<MetricResult, MetricError> {
        let reference = references
            .first()
            .ok_or_else(|| MetricError::Tool {
                tool: TOOL.to_string(),
                message: "no reference file".to_string(),
            })?;
        let result = run_external_tool(
            &self.command(reference, candidate),
            TOOL,
            self.timeout_secs,
            None,
        );
        let stdout = tool_stdout(result, TOOL, self.timeout_secs)?;
        parse_output(&stdout).map(MetricResult::Meteor)
    }
}
