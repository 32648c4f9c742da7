//! BLEU via the multi-bleu perl script
//!
//! The script takes reference files as arguments, reads the candidate on
//! stdin and prints one summary line:
//!
//! ```text
//! BLEU = 100.00, 100.0/100.0/100.0/100.0 (BP=1.000, ratio=1.000, hyp_len=11, ref_len=11)
//! ```

use super::external::run_external_tool;
use super::{tool_stdout, Metric, MetricError};
use crate::config::ToolsConfig;
use crate::models::{BleuResults, MetricKind, MetricResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const TOOL: &str = "multi-bleu.perl";

static SUMMARY_LINE: OnceLock<Regex> = OnceLock::new();

fn summary_line() -> &'static Regex {
    SUMMARY_LINE.get_or_init(|| {
        let num = r"(-?\d+(?:\.\d+)?)";
        let int = r"(\d+)";
        let pattern = format!(
            r"(?m)^\s*\w+ = {num}, {num}/{num}/{num}/{num} \(BP={num}, ratio={num}, hyp_len={int}, ref_len={int}\)",
        );
        Regex::new(&pattern).expect("valid BLEU output pattern")
    })
}

/// Parse the script's summary line into results.
pub fn parse_output(output: &str) -> Result<BleuResults, MetricError> {
    let caps = summary_line()
        .captures(output)
        .ok_or_else(|| MetricError::parse(TOOL, output.trim()))?;

    let float = |i: usize| -> Result<f64, MetricError> {
        caps[i]
            .parse::<f64>()
            .map_err(|_| MetricError::parse(TOOL, output.trim()))
    };
    let int = |i: usize| -> Result<u64, MetricError> {
        caps[i]
            .parse::<u64>()
            .map_err(|_| MetricError::parse(TOOL, output.trim()))
    };

    Ok(BleuResults {
        overall: float(1)?,
        bleu1: float(2)?,
        bleu2: float(3)?,
        bleu3: float(4)?,
        bleu4: float(5)?,
        brevity_penalty: float(6)?,
        length_ratio: float(7)?,
        candidate_length: int(8)?,
        reference_length: int(9)?,
    })
}

/// BLEU scorer, combining any number of references
#[derive(Debug, Clone)]
pub struct Bleu {
    perl: String,
    script: PathBuf,
    timeout_secs: u64,
}

impl Bleu {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            perl: tools.perl.clone(),
            script: tools.bleu_script.clone(),
            timeout_secs: tools.timeout_secs,
        }
    }

    fn command(&self, references: &[&Path]) -> Vec<String> {
        let mut cmd = vec![self.perl.clone(), self.script.display().to_string()];
        cmd.extend(references.iter().map(|p| p.display().to_string()));
        cmd
    }
}

impl Metric for Bleu {
    fn kind(&self) -> MetricKind {
        MetricKind::Bleu
    }

    fn score(&self, references: &[&Path], candidate: &Path) -> Result<MetricResult, MetricError> {
        let result = run_external_tool(
            &self.command(references),
            TOOL,
            self.timeout_secs,
            Some(candidate),
        );
        let stdout = tool_stdout(result, TOOL, self.timeout_secs)?;
        parse_output(&stdout).map(MetricResult::Bleu)
    }
}
