//! Docgraph CLI
//!
//! Converts annotation documents (JSON/YAML) into offset-addressed graphs,
//! one graph file per document plus a corpus manifest.
//!
//! # Usage
//!
//! ```bash
//! # Convert a directory of documents
//! docgraph -r -e folia.json -p mycorpus -o out/ corpus/
//!
//! # Per-token span relations, simplified labels, 4 workers
//! docgraph --span-mode token-reference -s -j 4 doc1.json doc2.json
//! ```
//!
//! Exit codes: 0 success, 1 a document failed or nothing was converted,
//! 2 no input given, 3 an input path does not exist.

use clap::{ArgAction, Parser};
use docgraph_ir::features::span_conversion::SpanMode;
use docgraph_ir::features::text_linearizer::SpacingPolicy;
use docgraph_ir::{collect_inputs, BatchConverter, ExportConfig, ExportError, Validatable};
use docgraph_storage::JsonGraphStore;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: u8 = 1;
const EXIT_NO_INPUT: u8 = 2;
const EXIT_NOT_FOUND: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "docgraph")]
#[command(version, about = "Annotation document → graph exporter", long_about = None)]
struct Cli {
    /// Input documents or directories
    files: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recurse: bool,

    /// Extension of documents picked up from directories
    #[arg(short, long)]
    extension: Option<String>,

    /// Corpus name (output subdirectory)
    #[arg(short = 'p', long)]
    corpus_prefix: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How span annotations reference tokens (text-range, token-reference)
    #[arg(long)]
    span_mode: Option<SpanMode>,

    /// Inter-token spacing (container-boundary, space-flag, never)
    #[arg(long)]
    spacing: Option<SpacingPolicy>,

    /// Add simplified annotation labels
    #[arg(short, long)]
    simplified: bool,

    /// Only simplified labels for inline annotations
    #[arg(short = 'S', long)]
    simplified_only: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied
    fn export_config(&self) -> Result<ExportConfig, ExportError> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_yaml(path)?,
            None => ExportConfig::default(),
        };

        if self.recurse {
            config.batch.recurse = true;
        }
        if let Some(extension) = &self.extension {
            config.batch.extension = extension.clone();
        }
        if let Some(prefix) = &self.corpus_prefix {
            config.batch.corpus_prefix = prefix.clone();
        }
        if let Some(jobs) = self.jobs {
            config.batch.jobs = jobs;
        }
        if let Some(span_mode) = self.span_mode {
            config = config.with_span_mode(span_mode);
        }
        if let Some(spacing) = self.spacing {
            config = config.with_spacing(spacing);
        }
        if self.simplified || self.simplified_only {
            config = config.simplified(self.simplified_only);
        }

        config.validate()?;
        debug!("{} resolved: {:?}", config.config_name(), config);
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "docgraph={level},docgraph_ir={level},docgraph_storage={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode, ExportError> {
    let config = cli.export_config()?;
    let inputs = collect_inputs(&cli.files, &config.batch)?;
    if inputs.is_empty() {
        error!("No documents with extension '{}' found", config.batch.extension);
        return Ok(ExitCode::from(EXIT_FAILURE));
    }

    let store = JsonGraphStore::new(&cli.output_dir, config.batch.corpus_prefix.clone())?;
    let converter = BatchConverter::new(config);
    info!(
        "Converting {} document(s) with {} worker(s)",
        inputs.len(),
        converter.batch_config().worker_count()
    );
    let report = converter.run(&inputs, &store)?;

    info!(
        "{} converted, {} failed, {} warning(s)",
        report.converted(),
        report.failed(),
        report.warnings
    );
    for failure in &report.manifest.failures {
        error!("{}: {}", failure.source, failure.error);
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FAILURE))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.files.is_empty() {
        error!("No input files given");
        return ExitCode::from(EXIT_NO_INPUT);
    }

    match run(&cli) {
        Ok(code) => code,
        Err(ExportError::NotFound(path)) => {
            error!("File or directory not found: {}", path.display());
            ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
