use crate::io::{open_input, open_output, read_records, write_records};
use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, ValueEnum};
use deid_pipeline::{
    Classifier, ConsolidationMode, Orchestrator, PatternClassifier, PipelineConfig,
    PrecomputedClassifier,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassifierKind {
    /// Built-in regex patterns (contact details, URLs, numbers, dates)
    Pattern,
    /// Replay the `entities` array attached to each input record
    Precomputed,
}

#[derive(Args)]
pub struct MaskArgs {
    /// JSON Lines input (`-` for stdin)
    #[arg(long, short, default_value = "-")]
    pub input: PathBuf,

    /// JSON Lines output (`-` for stdout)
    #[arg(long, short, default_value = "-")]
    pub output: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Entity source
    #[arg(long, value_enum, default_value = "pattern")]
    pub classifier: ClassifierKind,

    /// Override the match threshold (normalized distance, 0-1)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Override the minimum classifier confidence (0-1)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Exact-match labeling per record instead of fuzzy consolidation
    #[arg(long)]
    pub exact: bool,

    /// Pretty-print each output record
    #[arg(long)]
    pub pretty: bool,
}

impl MaskArgs {
    fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(threshold) = self.threshold {
            config.match_threshold = threshold;
        }
        if let Some(min_confidence) = self.min_confidence {
            config.confidence_threshold = min_confidence;
        }
        if self.exact {
            config.consolidation = ConsolidationMode::Exact;
        }
        Ok(config)
    }
}

pub fn run_mask(args: &MaskArgs) -> Result<()> {
    let config = args.load_config()?;
    let records = read_records(open_input(&args.input)?)?;
    log::debug!("Read {} records from {}", records.len(), args.input.display());

    let classifier: Box<dyn Classifier> = match args.classifier {
        ClassifierKind::Pattern => Box::new(PatternClassifier::new()?),
        ClassifierKind::Precomputed => Box::new(PrecomputedClassifier::new()),
    };
    log::debug!("Using {} classifier", classifier.name());

    let orchestrator = Orchestrator::new(classifier, config)?;
    let masked = orchestrator.process(&records);

    write_records(open_output(&args.output)?, &masked, args.pretty)
        .with_context(|| format!("Failed to write {}", args.output.display()))
}
