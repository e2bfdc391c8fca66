//! Training data tool for the obek chunker.
//!
//! `annotate` turns a hand-annotated corpus into a gold analysis file,
//! `features` writes single-feature training files, `expand` applies a
//! template file (CRF++ columns or CRFsuite attributes), `evaluate` measures a trained model.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use obek_core::corpus::{read_analysis_file, write_analysis_file};
use obek_core::{Backend, Chunker, ChunkerConfig, MalformedLabelPolicy, TemplateSet, load_predictor};
use obek_trainer::{
    AnnotationMode, AnnotationReader, evaluate, write_crfsuite_features, write_single_features,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "obek-train")]
#[command(about = "Prepare training data for and evaluate the obek chunker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Field delimiter of feature files
    #[arg(short, long, global = true, default_value = "\t")]
    delimiter: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotated corpus to gold analysis file
    Annotate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Decline lines with any bad chunk
        #[arg(long)]
        strict: bool,
        /// Drop `. , ? : ; !` from chunks
        #[arg(long)]
        eliminate_punctuation: bool,
    },
    /// Gold analysis file to single-feature file
    Features {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Single-feature file to full-feature file
    Expand {
        #[arg(short, long, env = "OBEK_TEMPLATES")]
        templates: PathBuf,
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Delimiter joining the pieces of one template
        #[arg(long, default_value = "/")]
        compound_delimiter: String,
        /// crfpp writes feature columns, crfsuite writes `j=value` attributes
        #[arg(short, long, default_value_t = Backend::CrfPlusPlus)]
        backend: Backend,
    },
    /// Token-level accuracy on a gold analysis file
    Evaluate {
        #[arg(short, long, env = "OBEK_TEMPLATES")]
        templates: PathBuf,
        #[arg(short, long, env = "OBEK_MODEL")]
        model: PathBuf,
        #[arg(short, long)]
        input: PathBuf,
        /// crfpp or crfsuite
        #[arg(short, long, default_value_t = Backend::CrfPlusPlus)]
        backend: Backend,
        /// crf_test executable
        #[arg(long, env = "OBEK_CRF_TEST")]
        crf_test: Option<PathBuf>,
        /// Seconds allowed per crf_test run
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// drop or attach
        #[arg(long, default_value = "drop")]
        malformed: MalformedLabelPolicy,
    },
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Annotate {
            input,
            output,
            strict,
            eliminate_punctuation,
        } => {
            let mode = if strict {
                AnnotationMode::Strict
            } else {
                AnnotationMode::Lenient
            };
            let reader = AnnotationReader::default()
                .with_mode(mode)
                .with_punctuation_elimination(eliminate_punctuation);
            let corpus = reader.read(open(&input)?)?;
            let sentences = corpus
                .sentences
                .iter()
                .map(|s| s.to_analyzed(reader.tags()))
                .collect::<obek_core::Result<Vec<_>>>()?;
            let mut out = create(&output)?;
            write_analysis_file(&mut out, &sentences)?;
            out.flush()?;
            println!("{}", serde_json::to_string(&corpus.stats)?);
        }
        Commands::Features { input, output } => {
            let sentences = read_analysis_file(open(&input)?)
                .with_context(|| format!("cannot read analysis file {}", input.display()))?;
            let mut out = create(&output)?;
            let stats = write_single_features(&mut out, &sentences, &cli.delimiter)?;
            info!(sentences = stats.sentences, output = %output.display(), "features written");
        }
        Commands::Expand {
            templates,
            input,
            output,
            compound_delimiter,
            backend,
        } => {
            let templates = TemplateSet::from_file(&templates)
                .with_context(|| format!("cannot load templates {}", templates.display()))?
                .with_compound_delimiter(compound_delimiter);
            let mut out = create(&output)?;
            let count = match backend {
                Backend::CrfPlusPlus => {
                    templates.generate_full_features(open(&input)?, &mut out, &cli.delimiter)?
                }
                Backend::CrfSuite => {
                    write_crfsuite_features(&templates, open(&input)?, &mut out, &cli.delimiter)?
                }
            };
            info!(sentences = count, output = %output.display(), "full features written");
        }
        Commands::Evaluate {
            templates,
            model,
            input,
            backend,
            crf_test,
            timeout_secs,
            malformed,
        } => {
            let config = ChunkerConfig::new()
                .with_field_delimiter(cli.delimiter.clone())
                .with_malformed_policy(malformed)
                .with_predictor_timeout(Duration::from_secs(timeout_secs));
            let templates = TemplateSet::from_file(&templates)
                .with_context(|| format!("cannot load templates {}", templates.display()))?;
            let predictor = load_predictor(
                backend,
                &model,
                crf_test.as_deref(),
                &config,
            )
            .with_context(|| format!("cannot load model {}", model.display()))?;
            let chunker = Chunker::new(templates, predictor).with_config(config);

            let sentences = read_analysis_file(open(&input)?)
                .with_context(|| format!("cannot read analysis file {}", input.display()))?;
            let eval = evaluate(&chunker, &sentences);
            println!("{}", serde_json::to_string(&eval)?);
        }
    }

    Ok(())
}
