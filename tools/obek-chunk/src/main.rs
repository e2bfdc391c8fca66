use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use obek_core::corpus::{AnalyzedSentence, AnalyzedToken, read_analysis_file};
use obek_core::{
    Backend, Chunk, ChunkToken, ChunkType, Chunker, ChunkerConfig, MalformedLabelPolicy,
    TemplateSet, Token, Tokenizer, load_predictor,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk_type: ChunkType,
    pub start: usize,
    pub indices: Vec<usize>,
    pub words: Vec<String>,
    pub explain: String,
    /// Byte range in the input line, text input only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<(usize, usize)>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkOutput {
    pub input: String,
    pub chunks: Vec<ChunkRecord>,
    pub error: Option<String>,
}

impl From<&Chunk<ChunkToken>> for ChunkRecord {
    fn from(chunk: &Chunk<ChunkToken>) -> Self {
        Self {
            chunk_type: chunk.chunk_type,
            start: chunk.start,
            indices: chunk.indices.clone(),
            words: chunk.words().into_iter().map(str::to_string).collect(),
            explain: chunk.explain(),
            span: None,
        }
    }
}

impl ChunkRecord {
    /// Locates the chunk in the raw line from its first to its last token.
    fn with_span(mut self, tokenizer: &Tokenizer, tokens: &[Token]) -> Self {
        if let (Some(&first), Some(&last)) = (self.indices.first(), self.indices.last()) {
            self.span = tokenizer.get_spans(tokens, first, last + 1);
        }
        self
    }
}

/// One input sentence; raw text input also keeps its tokens.
struct InputSentence {
    sentence: AnalyzedSentence,
    tokens: Option<Vec<Token>>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    /// Tab-separated analysis file, blank line between sentences
    Analysis,
    /// One raw sentence per line, tokenized without morphology
    Text,
}

/// Chunk Turkish sentences read from stdin, one JSON line per sentence.
#[derive(Parser)]
#[command(name = "obek-chunk")]
#[command(version)]
struct Cli {
    /// CRF++ feature template file
    #[arg(short, long, env = "OBEK_TEMPLATES")]
    templates: PathBuf,

    /// Trained model
    #[arg(short, long, env = "OBEK_MODEL")]
    model: PathBuf,

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

    #[arg(short, long, value_enum, default_value_t = InputFormat::Analysis)]
    format: InputFormat,
}

fn read_input(format: InputFormat, tokenizer: &Tokenizer) -> Result<Vec<InputSentence>> {
    let stdin = io::stdin();
    match format {
        InputFormat::Analysis => {
            let sentences =
                read_analysis_file(stdin.lock()).context("cannot parse analysis input")?;
            Ok(sentences
                .into_iter()
                .map(|sentence| InputSentence {
                    sentence,
                    tokens: None,
                })
                .collect())
        }
        InputFormat::Text => {
            let mut sentences = Vec::new();
            for line in stdin.lock().lines() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let tokens = tokenizer.tokenize(line);
                let analyzed = tokens
                    .iter()
                    .map(|t| AnalyzedToken::new(t.text.clone(), None))
                    .collect();
                sentences.push(InputSentence {
                    sentence: AnalyzedSentence::new(analyzed),
                    tokens: Some(tokens),
                });
            }
            Ok(sentences)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ChunkerConfig::new()
        .with_malformed_policy(cli.malformed)
        .with_predictor_timeout(Duration::from_secs(cli.timeout_secs));
    let templates = TemplateSet::from_file(&cli.templates)
        .with_context(|| format!("cannot load templates {}", cli.templates.display()))?;
    let predictor = load_predictor(
        cli.backend,
        &cli.model,
        cli.crf_test.as_deref(),
        &config,
    )
    .with_context(|| format!("cannot load model {}", cli.model.display()))?;
    let chunker = Chunker::new(templates, predictor).with_config(config);

    let tokenizer = Tokenizer::new();
    let inputs = read_input(cli.format, &tokenizer)?;
    let sentences: Vec<AnalyzedSentence> = inputs.iter().map(|i| i.sentence.clone()).collect();
    info!(sentences = sentences.len(), backend = %cli.backend, "chunking");
    let results = chunker.chunk_corpus(&sentences);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (input, result) in inputs.iter().zip(results) {
        let sentence = &input.sentence;
        let output = match result {
            Ok(chunks) => ChunkOutput {
                input: sentence.text(),
                chunks: chunks
                    .iter()
                    .map(|chunk| {
                        let record = ChunkRecord::from(chunk);
                        match &input.tokens {
                            Some(tokens) => record.with_span(&tokenizer, tokens),
                            None => record,
                        }
                    })
                    .collect(),
                error: None,
            },
            Err(e) => ChunkOutput {
                input: sentence.text(),
                chunks: Vec::new(),
                error: Some(e.to_string()),
            },
        };
        writeln!(out, "{}", serde_json::to_string(&output)?)?;
    }
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use obek_core::MorphAnalysis;

    #[test]
    fn record_from_chunk() {
        let chunk = Chunk {
            start: 1,
            chunk_type: ChunkType::Object,
            indices: vec![1, 2],
            tokens: vec![
                ChunkToken::new("sıcak", None),
                ChunkToken::new("çayı", Some(MorphAnalysis::new("çay", "Noun"))),
            ],
        };
        let record = ChunkRecord::from(&chunk);
        assert_eq!(record.words, vec!["sıcak", "çayı"]);
        assert_eq!(record.explain, "[sıcak çay:OBJECT-1]");

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"chunk_type\":\"OBJECT\""));
        assert!(!json.contains("span"));
    }

    #[test]
    fn span_points_into_the_line() {
        let line = "Ayşe sıcak çayı içti.";
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize(line);
        let chunk = Chunk {
            start: 1,
            chunk_type: ChunkType::Object,
            indices: vec![1, 2],
            tokens: vec![ChunkToken::new("sıcak", None), ChunkToken::new("çayı", None)],
        };
        let record = ChunkRecord::from(&chunk).with_span(&tokenizer, &tokens);
        let (start, end) = record.span.unwrap();
        assert_eq!(&line[start..end], "sıcak çayı");
    }
}
