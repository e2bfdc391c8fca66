//! # Chunker
//!
//! Composes the stages: atomic features, template expansion, label
//! prediction and decoding. One call handles one sentence; the corpus driver
//! fans sentences out over the rayon pool.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::ChunkerConfig;
use crate::corpus::AnalyzedSentence;
use crate::decoder::{Chunk, ChunkToken, LabelDecoder, TagTable};
use crate::error::{ObekError, Result};
use crate::features::{AtomicFeatureSet, MorphAnalysis};
use crate::predictor::LabelPredictor;
use crate::template::TemplateSet;

/// A token paired with the raw label the predictor gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAndLabel {
    pub token: String,
    pub label: String,
}

/// Sentence chunker over a label predictor.
pub struct Chunker<P> {
    templates: Arc<TemplateSet>,
    predictor: P,
    tags: TagTable,
    config: ChunkerConfig,
}

impl<P: LabelPredictor> Chunker<P> {
    /// Creates a chunker with the default tag table. The configuration
    /// starts from defaults, keeping the template set's compound delimiter.
    pub fn new(templates: impl Into<Arc<TemplateSet>>, predictor: P) -> Self {
        let templates = templates.into();
        let config =
            ChunkerConfig::default().with_compound_delimiter(templates.compound_delimiter());
        Self {
            templates,
            predictor,
            tags: TagTable::default(),
            config,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ChunkerConfig) -> Self {
        if config.compound_delimiter != self.templates.compound_delimiter() {
            let templates = (*self.templates)
                .clone()
                .with_compound_delimiter(config.compound_delimiter.clone());
            self.templates = Arc::new(templates);
        }
        self.config = config;
        self
    }

    /// Replaces the tag table.
    pub fn with_tag_table(mut self, tags: TagTable) -> Self {
        self.tags = tags;
        self
    }

    pub fn templates(&self) -> &Arc<TemplateSet> {
        &self.templates
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn tag_table(&self) -> &TagTable {
        &self.tags
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Composite feature vectors for one sentence.
    pub fn features<S: AsRef<str>>(
        &self,
        tokens: &[S],
        analyses: &[Option<MorphAnalysis>],
    ) -> Result<Vec<Vec<String>>> {
        if tokens.len() != analyses.len() {
            return Err(ObekError::LengthMismatch {
                what: "analyses per token",
                expected: tokens.len(),
                actual: analyses.len(),
            });
        }
        let rows: Vec<AtomicFeatureSet> = tokens
            .iter()
            .zip(analyses)
            .map(|(token, analysis)| AtomicFeatureSet::extract(token.as_ref(), analysis.as_ref()))
            .collect();
        self.templates.expand(&rows)
    }

    fn predict_labels<S: AsRef<str>>(
        &self,
        tokens: &[S],
        analyses: &[Option<MorphAnalysis>],
    ) -> Result<Vec<String>> {
        let features = self.features(tokens, analyses)?;
        let labels = self.predictor.predict(&features)?;
        if labels.len() != tokens.len() {
            return Err(ObekError::PredictorFailure(format!(
                "{} returned {} labels for {} tokens",
                self.predictor.name(),
                labels.len(),
                tokens.len()
            )));
        }
        Ok(labels)
    }

    /// Raw predicted label of every token.
    pub fn hypothesis_labels<S: AsRef<str>>(
        &self,
        tokens: &[S],
        analyses: &[Option<MorphAnalysis>],
    ) -> Result<Vec<TokenAndLabel>> {
        let labels = self.predict_labels(tokens, analyses)?;
        Ok(tokens
            .iter()
            .zip(labels)
            .map(|(token, label)| TokenAndLabel {
                token: token.as_ref().to_string(),
                label,
            })
            .collect())
    }

    /// Chunks one sentence.
    ///
    /// # Errors
    ///
    /// Mismatched input lengths, expansion errors and predictor failures.
    /// Nothing is retried.
    pub fn chunk<S: AsRef<str>>(
        &self,
        tokens: &[S],
        analyses: &[Option<MorphAnalysis>],
    ) -> Result<Vec<Chunk<ChunkToken>>> {
        if tokens.is_empty() && analyses.is_empty() {
            return Ok(Vec::new());
        }
        let labels = self.predict_labels(tokens, analyses)?;
        let payload: Vec<ChunkToken> = tokens
            .iter()
            .zip(analyses)
            .map(|(token, analysis)| ChunkToken::new(token.as_ref(), analysis.clone()))
            .collect();
        let chunks = LabelDecoder::new(&self.tags)
            .with_policy(self.config.malformed_policy)
            .decode(&labels, &payload)?;
        debug!(tokens = tokens.len(), chunks = chunks.len(), "sentence chunked");
        Ok(chunks)
    }

    /// Chunks an analyzed sentence.
    pub fn chunk_sentence(&self, sentence: &AnalyzedSentence) -> Result<Vec<Chunk<ChunkToken>>> {
        self.chunk(&sentence.words(), &sentence.analyses())
    }

    /// Chunks every sentence in parallel. Results keep the input order and a
    /// failed sentence does not affect the others.
    pub fn chunk_corpus(
        &self,
        sentences: &[AnalyzedSentence],
    ) -> Vec<Result<Vec<Chunk<ChunkToken>>>> {
        let results: Vec<_> = sentences
            .par_iter()
            .map(|sentence| self.chunk_sentence(sentence))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = sentences.len(), "some sentences could not be chunked");
        }
        info!(
            sentences = sentences.len(),
            failed,
            predictor = self.predictor.name(),
            "corpus chunked"
        );
        results
    }
}
