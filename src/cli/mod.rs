//! CLI definition and the batch run behind it

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{load_project_config, ProjectConfig};
use crate::corpus::{clean, CandidateSet, CorpusGroup, ReferenceSet};
use crate::pipeline::Pipeline;
use crate::reporters::{self, OutputFormat, Verbosity};
use crate::staging::MAX_REFERENCES;

/// textmetrics - automatic metrics for generated text
#[derive(Parser, Debug)]
#[command(name = "textmetrics")]
#[command(
    version,
    about = "Score generated text with BLEU, ROUGE and METEOR against references, plus n-gram diversity statistics",
    after_help = "\
Examples:
  textmetrics out.txt                                    N-gram statistics only
  textmetrics a.txt b.txt --references ref.txt           Compare two systems
  textmetrics a.txt --references r1.txt r2.txt -f csv    CSV output, two references
  textmetrics a.txt --no-comparative --verbosity 0       Summary rows only

Candidates must come before --references, or be separated from it with --."
)]
pub struct Cli {
    /// Candidate files to score
    #[arg(required = true)]
    pub candidates: Vec<PathBuf>,

    /// Reference files (at most 26)
    #[arg(long, short = 'r', num_args = 1..)]
    pub references: Vec<PathBuf>,

    /// File of tokens to remove before scoring, one per line
    #[arg(long)]
    pub clean_tokens: Option<PathBuf>,

    /// Skip BLEU / ROUGE / METEOR
    #[arg(long)]
    pub no_comparative: bool,

    /// Skip n-gram statistics
    #[arg(long)]
    pub no_intrinsic: bool,

    /// 0 = summary rows, 1 = all rows (default 1)
    #[arg(long, short = 'v', value_parser = clap::value_parser!(u8).range(0..=1))]
    pub verbosity: Option<u8>,

    /// Output format: text, markdown (or md), csv, json (default text)
    #[arg(long, short = 'f', value_parser = ["text", "markdown", "md", "csv", "json"])]
    pub format: Option<String>,

    /// Write the table to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Config file (default: ./textmetrics.toml if present)
    #[arg(long, env = "TEXTMETRICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    // The staging layout labels references A..Z; refuse before reading anything.
    if cli.references.len() > MAX_REFERENCES {
        bail!(
            "Too many references: {} given, at most {} are supported",
            cli.references.len(),
            MAX_REFERENCES
        );
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = load_project_config(cli.config.as_deref(), &cwd)?;

    let verbosity = resolve_verbosity(cli.verbosity, &config)?;
    let format = resolve_format(cli.format.as_deref(), &config)?;
    let comparative = !cli.no_comparative;
    debug!(
        "verbosity={:?} format={} comparative={} intrinsic={}",
        verbosity, format, comparative, !cli.no_intrinsic
    );

    info!("Reading files...");
    let candidates = CandidateSet::new(
        CorpusGroup::from_files(&cli.candidates).context("Failed to load candidates")?,
    );
    let references = if comparative && !cli.references.is_empty() {
        Some(ReferenceSet::new(
            CorpusGroup::from_files(&cli.references).context("Failed to load references")?,
        ))
    } else {
        None
    };

    let mut pipeline = Pipeline::new(&config.tools).with_orders(config.ngrams.orders.clone());
    let clean_tokens = cli
        .clean_tokens
        .as_deref()
        .or(config.defaults.clean_tokens.as_deref());
    if let Some(path) = clean_tokens {
        pipeline = pipeline.with_removal_list(clean::load(path)?);
    }
    if !comparative {
        pipeline = pipeline.without_comparative();
    }
    if cli.no_intrinsic {
        pipeline = pipeline.without_intrinsic();
    }

    let evaluation = pipeline.run(references, candidates)?;
    debug!("Run finished: {}", evaluation.summary());

    let table = evaluation.table(&pipeline.worklist(), verbosity);
    let mut output = reporters::render(&table, format)?;
    if !output.ends_with('\n') {
        output.push('\n');
    }

    match cli.output {
        Some(path) => write_output(&path, &output)?,
        None => print!("{}", output),
    }
    Ok(())
}

/// Command line wins, then the config file, then 1
fn resolve_verbosity(flag: Option<u8>, config: &ProjectConfig) -> Result<Verbosity> {
    let level = flag.or(config.defaults.verbosity).unwrap_or(1);
    Verbosity::try_from(level).map_err(anyhow::Error::msg)
}

/// Command line wins, then the config file, then text
fn resolve_format(flag: Option<&str>, config: &ProjectConfig) -> Result<OutputFormat> {
    match flag.or(config.defaults.format.as_deref()) {
        Some(name) => name.parse(),
        None => Ok(OutputFormat::Text),
    }
}

fn write_output(path: &Path, output: &str) -> Result<()> {
    std::fs::write(path, output)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Table written to {}", path.display());
    Ok(())
}
