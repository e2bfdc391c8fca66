//! # Label Sequence Decoding
//!
//! A single left-to-right walk that turns per-token boundary labels into
//! typed chunks. A tag change or an explicit `B` marker closes the open chunk.

use std::str::FromStr;

use tracing::warn;

use super::chunk::Chunk;
use super::label::{ChunkType, Label, TagTable};
use crate::error::{ObekError, Result};

/// What to do with a token whose label is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLabelPolicy {
    /// Skip the token. Its index ends up in no chunk.
    #[default]
    Drop,
    /// Keep the token in the currently open chunk (or the next one, before
    /// the first valid label) so every index is covered.
    Attach,
}

impl FromStr for MalformedLabelPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "attach" => Ok(Self::Attach),
            other => Err(format!("unknown malformed label policy `{other}` (expected drop or attach)")),
        }
    }
}

/// Decodes label sequences against a [`TagTable`].
#[derive(Debug, Clone, Copy)]
pub struct LabelDecoder<'a> {
    tags: &'a TagTable,
    policy: MalformedLabelPolicy,
}

/// Chunk under construction.
struct OpenChunk<T> {
    start: usize,
    tag: Option<ChunkType>,
    indices: Vec<usize>,
    tokens: Vec<T>,
}

impl<T> OpenChunk<T> {
    fn new() -> Self {
        Self {
            start: 0,
            tag: None,
            indices: Vec::with_capacity(2),
            tokens: Vec::with_capacity(2),
        }
    }

    fn push(&mut self, idx: usize, token: T) {
        if self.tokens.is_empty() {
            self.start = idx;
        }
        self.indices.push(idx);
        self.tokens.push(token);
    }

    /// Emits the buffered tokens as a chunk, leaving the buffer empty.
    fn flush(&mut self, chunks: &mut Vec<Chunk<T>>) {
        if self.tokens.is_empty() {
            return;
        }
        let indices = std::mem::take(&mut self.indices);
        let tokens = std::mem::take(&mut self.tokens);
        match self.tag {
            Some(chunk_type) => chunks.push(Chunk {
                start: self.start,
                chunk_type,
                indices,
                tokens,
            }),
            None => warn!(?indices, "tokens without a valid label were not chunked"),
        }
    }
}

impl<'a> LabelDecoder<'a> {
    /// Creates a decoder using the default malformed label policy.
    pub fn new(tags: &'a TagTable) -> Self {
        Self {
            tags,
            policy: MalformedLabelPolicy::default(),
        }
    }

    /// Sets the malformed label policy.
    pub fn with_policy(mut self, policy: MalformedLabelPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MalformedLabelPolicy {
        self.policy
    }

    /// Validates a label: two characters and a tag known to the table.
    pub fn parse_label(&self, label: &str) -> Result<(Label, ChunkType)> {
        let parsed = Label::parse(label)?;
        let chunk_type = self
            .tags
            .chunk_type(parsed.tag)
            .ok_or_else(|| ObekError::MalformedLabel {
                label: label.to_string(),
            })?;
        Ok((parsed, chunk_type))
    }

    /// Groups `tokens` into chunks following `labels`.
    ///
    /// # Errors
    ///
    /// `ObekError::LengthMismatch` when `labels` and `tokens` differ in length.
    /// Malformed labels are logged and handled per the policy, never returned.
    ///
    /// # Examples
    /// ```
    /// use obek_core::decoder::{ChunkType, LabelDecoder, TagTable};
    ///
    /// let tags = TagTable::default();
    /// let chunks = LabelDecoder::new(&tags)
    ///     .decode(&["SB", "SI", "OB", "VB"], &["Ahmet", "Bey", "çay", "demledi"])
    ///     .unwrap();
    /// assert_eq!(chunks.len(), 3);
    /// assert_eq!(chunks[0].chunk_type, ChunkType::Subject);
    /// assert_eq!(chunks[0].indices, vec![0, 1]);
    /// ```
    pub fn decode<L, T>(&self, labels: &[L], tokens: &[T]) -> Result<Vec<Chunk<T>>>
    where
        L: AsRef<str>,
        T: Clone,
    {
        if labels.len() != tokens.len() {
            return Err(ObekError::LengthMismatch {
                what: "labels per token",
                expected: tokens.len(),
                actual: labels.len(),
            });
        }

        let mut chunks = Vec::new();
        let mut open = OpenChunk::new();
        let mut pending: Vec<usize> = Vec::new();

        for (i, (label, token)) in labels.iter().zip(tokens).enumerate() {
            let (label, chunk_type) = match self.parse_label(label.as_ref()) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(index = i, "{err}");
                    if self.policy == MalformedLabelPolicy::Attach {
                        if open.tokens.is_empty() {
                            pending.push(i);
                        } else {
                            open.push(i, token.clone());
                        }
                    }
                    continue;
                }
            };

            let boundary = open.tag != Some(chunk_type) || label.is_begin();
            if boundary {
                open.flush(&mut chunks);
            }
            for idx in pending.drain(..) {
                open.push(idx, tokens[idx].clone());
            }
            open.push(i, token.clone());
            open.tag = Some(chunk_type);
        }

        open.flush(&mut chunks);
        if !pending.is_empty() {
            warn!(indices = ?pending, "no valid label in sentence, tokens were not chunked");
        }
        Ok(chunks)
    }
}
