//! Hand-annotated chunk corpora.
//!
//! One sentence per line; chunks are separated by `/` and end in a role
//! marker:
//!
//! ```text
//! Ahmet [Özne] / dün akşam [Tümleç] / çayı [Nesne] / demledi . [Yüklem]
//! ```

use std::collections::HashSet;
use std::io::BufRead;

use obek_core::corpus::{AnalyzedSentence, AnalyzedToken};
use obek_core::decoder::{ChunkType, Marker, TagTable};
use obek_core::tokenizer::Tokenizer;
use obek_core::{ObekError, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Punctuation removed when elimination is enabled.
pub const ELIMINATED_PUNCTUATION: &[&str] = &[".", ",", "?", ":", ";", "!"];

/// Treatment of lines where only some chunks are well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationMode {
    /// Keep the good chunks.
    #[default]
    Lenient,
    /// Decline the whole line.
    Strict,
}

/// One annotated chunk: its words and role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedChunk {
    pub words: Vec<String>,
    pub chunk_type: ChunkType,
}

/// An accepted annotated sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSentence {
    pub chunks: Vec<AnnotatedChunk>,
}

impl AnnotatedSentence {
    /// Every word with its gold label: `<tag>B` for the first word of a
    /// chunk, `<tag>I` for the rest.
    pub fn labeled_words(&self, tags: &TagTable) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for chunk in &self.chunks {
            for (i, word) in chunk.words.iter().enumerate() {
                let marker = if i == 0 { Marker::Begin } else { Marker::Inside };
                let label = tags.label(chunk.chunk_type, marker).ok_or_else(|| {
                    ObekError::MalformedLabel {
                        label: format!("{}{}", chunk.chunk_type, marker.as_char()),
                    }
                })?;
                out.push((word.clone(), label.to_string()));
            }
        }
        Ok(out)
    }

    /// Words of all chunks in order.
    pub fn words(&self) -> Vec<&str> {
        self.chunks
            .iter()
            .flat_map(|c| c.words.iter().map(String::as_str))
            .collect()
    }

    /// Plain sentence text.
    pub fn text(&self) -> String {
        self.words().join(" ")
    }

    /// Gold sentence with unanalyzed tokens, ready for a morphological
    /// analyzer to fill in.
    pub fn to_analyzed(&self, tags: &TagTable) -> Result<AnalyzedSentence> {
        let tokens = self
            .labeled_words(tags)?
            .into_iter()
            .map(|(word, label)| AnalyzedToken::new(word, None).with_label(label))
            .collect();
        Ok(AnalyzedSentence::new(tokens))
    }
}

/// Outcome counts of one corpus load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationStats {
    /// Non-blank input lines
    pub total: usize,
    /// Lines skipped because an identical line came earlier
    pub duplicates: usize,
    /// Lines kept (including those that lost chunks)
    pub accepted: usize,
    /// Kept lines that had at least one bad chunk
    pub accepted_with_loss: usize,
    /// Lines dropped
    pub declined: usize,
}

/// Sentences accepted from an annotation file plus load statistics.
#[derive(Debug, Clone, Default)]
pub struct AnnotationCorpus {
    pub sentences: Vec<AnnotatedSentence>,
    pub stats: AnnotationStats,
}

/// Result of parsing one annotated line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Accepted(AnnotatedSentence),
    AcceptedWithLoss {
        sentence: AnnotatedSentence,
        bad_chunks: Vec<String>,
    },
    Declined {
        bad_chunks: Vec<String>,
    },
}

/// Reads annotated lines into labelled sentences.
#[derive(Debug, Clone)]
pub struct AnnotationReader {
    tags: TagTable,
    tokenizer: Tokenizer,
    mode: AnnotationMode,
    eliminate_punctuation: bool,
}

impl Default for AnnotationReader {
    fn default() -> Self {
        Self::new(TagTable::default())
    }
}

impl AnnotationReader {
    pub fn new(tags: TagTable) -> Self {
        Self {
            tags,
            tokenizer: Tokenizer::new(),
            mode: AnnotationMode::default(),
            eliminate_punctuation: false,
        }
    }

    pub fn with_mode(mut self, mode: AnnotationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Drop `. , ? : ; !` tokens from chunk words.
    pub fn with_punctuation_elimination(mut self, enabled: bool) -> Self {
        self.eliminate_punctuation = enabled;
        self
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// Parses one chunk such as `dün akşam [Tümleç]`.
    ///
    /// Returns `None` when no marker ends the chunk or no word remains.
    pub fn parse_chunk(&self, chunk: &str) -> Option<AnnotatedChunk> {
        let (block, chunk_type) = self.tags.split_annotation(chunk)?;
        let words: Vec<String> = self
            .tokenizer
            .words(block)
            .into_iter()
            .filter(|w| !(self.eliminate_punctuation && ELIMINATED_PUNCTUATION.contains(&w.as_str())))
            .collect();
        if words.is_empty() {
            return None;
        }
        Some(AnnotatedChunk { words, chunk_type })
    }

    /// Parses one line after `*` removal.
    pub fn parse_line(&self, line: &str) -> LineOutcome {
        let mut chunks = Vec::new();
        let mut bad_chunks = Vec::new();
        for piece in line.split('/').map(str::trim).filter(|p| !p.is_empty()) {
            match self.parse_chunk(piece) {
                Some(chunk) => chunks.push(chunk),
                None => bad_chunks.push(piece.to_string()),
            }
        }

        if chunks.is_empty() || (self.mode == AnnotationMode::Strict && !bad_chunks.is_empty()) {
            return LineOutcome::Declined { bad_chunks };
        }
        let sentence = AnnotatedSentence { chunks };
        if bad_chunks.is_empty() {
            LineOutcome::Accepted(sentence)
        } else {
            LineOutcome::AcceptedWithLoss {
                sentence,
                bad_chunks,
            }
        }
    }

    /// Reads a whole annotation file.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<AnnotationCorpus> {
        let mut corpus = AnnotationCorpus::default();
        let mut seen = HashSet::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.replace('*', "");
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            corpus.stats.total += 1;

            if !seen.insert(line.to_string()) {
                debug!(line, "duplicated line");
                corpus.stats.duplicates += 1;
                continue;
            }

            match self.parse_line(line) {
                LineOutcome::Accepted(sentence) => {
                    corpus.stats.accepted += 1;
                    corpus.sentences.push(sentence);
                }
                LineOutcome::AcceptedWithLoss {
                    sentence,
                    bad_chunks,
                } => {
                    warn!(?bad_chunks, line, "accepted with ignored chunks");
                    corpus.stats.accepted += 1;
                    corpus.stats.accepted_with_loss += 1;
                    corpus.sentences.push(sentence);
                }
                LineOutcome::Declined { bad_chunks } => {
                    warn!(?bad_chunks, line, "declined sentence");
                    corpus.stats.declined += 1;
                }
            }
        }

        let stats = &corpus.stats;
        info!(
            total = stats.total,
            duplicates = stats.duplicates,
            accepted = stats.accepted,
            accepted_with_loss = stats.accepted_with_loss,
            declined = stats.declined,
            "annotation corpus loaded"
        );
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CORPUS: &str = "\
Ahmet [Özne] / dün akşam [Tümleç] / çayı [Nesne] / demledi . [Yüklem]
Ahmet [Özne] / dün akşam [Tümleç] / çayı [Nesne] / demledi . [Yüklem]
*Kitap* [Nesne] / okundu [Yüklem] / fazladan

bozuk satır / yine bozuk
Ayşe [Özne] / güldü [Yüklem]
";

    #[test]
    fn parses_chunk_with_marker() {
        let reader = AnnotationReader::default();
        let chunk = reader.parse_chunk(" dün akşam [Tümleç] ").unwrap();
        assert_eq!(chunk.words, vec!["dün", "akşam"]);
        assert_eq!(chunk.chunk_type, ChunkType::Adjunct);
        assert!(reader.parse_chunk("dün akşam").is_none());
        assert!(reader.parse_chunk("[Özne]").is_none());
    }

    #[test]
    fn lenient_read_statistics() {
        let corpus = AnnotationReader::default().read(Cursor::new(CORPUS)).unwrap();
        assert_eq!(
            corpus.stats,
            AnnotationStats {
                total: 5,
                duplicates: 1,
                accepted: 3,
                accepted_with_loss: 1,
                declined: 1,
            }
        );
        assert_eq!(corpus.sentences.len(), 3);
        assert_eq!(corpus.sentences[1].text(), "Kitap okundu");
    }

    #[test]
    fn strict_mode_declines_lossy_lines() {
        let corpus = AnnotationReader::default()
            .with_mode(AnnotationMode::Strict)
            .read(Cursor::new(CORPUS))
            .unwrap();
        assert_eq!(corpus.stats.accepted, 2);
        assert_eq!(corpus.stats.accepted_with_loss, 0);
        assert_eq!(corpus.stats.declined, 2);
    }

    #[test]
    fn labels_begin_then_inside() {
        let reader = AnnotationReader::default();
        let LineOutcome::Accepted(sentence) =
            reader.parse_line("Ahmet Bey [Özne] / çayı [Nesne] / demledi . [Yüklem]")
        else {
            panic!("expected an accepted line");
        };
        let labels: Vec<String> = sentence
            .labeled_words(reader.tags())
            .unwrap()
            .into_iter()
            .map(|(w, l)| format!("{w}/{l}"))
            .collect();
        assert_eq!(
            labels,
            vec!["Ahmet/SB", "Bey/SI", "çayı/OB", "demledi/VB", "./VI"]
        );
    }

    #[test]
    fn punctuation_elimination() {
        let reader = AnnotationReader::default().with_punctuation_elimination(true);
        let LineOutcome::Accepted(sentence) = reader.parse_line("Evet, geldi ! [Yüklem]") else {
            panic!("expected an accepted line");
        };
        assert_eq!(sentence.words(), vec!["Evet", "geldi"]);

        // A chunk made only of punctuation is bad once it is eliminated.
        assert!(matches!(
            reader.parse_line(". [Yüklem]"),
            LineOutcome::Declined { .. }
        ));
    }

    #[test]
    fn to_analyzed_carries_labels() {
        let reader = AnnotationReader::default();
        let LineOutcome::Accepted(sentence) = reader.parse_line("Ayşe [Özne] / güldü [Yüklem]")
        else {
            panic!("expected an accepted line");
        };
        let analyzed = sentence.to_analyzed(reader.tags()).unwrap();
        assert_eq!(analyzed.labels().unwrap(), vec!["SB", "VB"]);
        assert!(analyzed.tokens.iter().all(|t| t.analysis.is_none()));
    }
}
