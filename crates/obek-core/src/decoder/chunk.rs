use std::fmt;

use serde::{Deserialize, Serialize};

use super::label::ChunkType;
use crate::features::MorphAnalysis;

/// A contiguous, typed group of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk<T> {
    /// Sentence index where the chunk starts.
    pub start: usize,

    /// Grammatical role.
    pub chunk_type: ChunkType,

    /// Sentence index of every token placed in the chunk.
    pub indices: Vec<usize>,

    /// Token payloads, aligned with `indices`.
    pub tokens: Vec<T>,
}

impl<T> Chunk<T> {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether the chunk holds the token at sentence index `idx`.
    pub fn contains(&self, idx: usize) -> bool {
        self.indices.contains(&idx)
    }
}

/// Token payload used by the chunking pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkToken {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<MorphAnalysis>,
}

impl ChunkToken {
    pub fn new(word: impl Into<String>, analysis: Option<MorphAnalysis>) -> Self {
        Self {
            word: word.into(),
            analysis,
        }
    }

    /// Lemma, falling back to the surface form.
    pub fn lemma(&self) -> &str {
        self.analysis
            .as_ref()
            .map_or(self.word.as_str(), |a| a.lemma.as_str())
    }
}

impl Chunk<ChunkToken> {
    /// Surface forms of the chunk's tokens.
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.word.as_str()).collect()
    }

    /// Lemma rendering with the start index, e.g. `[çay demle:VERB-2]`.
    pub fn explain(&self) -> String {
        let lemmas: Vec<&str> = self.tokens.iter().map(ChunkToken::lemma).collect();
        format!("[{}:{}-{}]", lemmas.join(" "), self.chunk_type, self.start)
    }
}

impl fmt::Display for Chunk<ChunkToken> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.words().join(" "), self.chunk_type)
    }
}
