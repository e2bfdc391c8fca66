//! Tab-separated analysis files produced by the external morphological
//! analyzer.
//!
//! One token per line, blank line between sentences:
//!
//! ```text
//! surface
//! surface <TAB> label
//! surface <TAB> lemma <TAB> pos <TAB> secondary_pos <TAB> chain
//! surface <TAB> lemma <TAB> pos <TAB> secondary_pos <TAB> chain <TAB> label
//! ```
//!
//! `_` (or an empty field) stands for a missing secondary POS or chain.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::{ObekError, Result};
use crate::features::{AtomicFeatureSet, MorphAnalysis, PLACEHOLDER};

const ANALYZED_FIELDS: usize = 5;

/// A token with its optional analysis and optional gold label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedToken {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<MorphAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AnalyzedToken {
    pub fn new(word: impl Into<String>, analysis: Option<MorphAnalysis>) -> Self {
        Self {
            word: word.into(),
            analysis,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Atomic features of this token.
    pub fn features(&self) -> AtomicFeatureSet {
        AtomicFeatureSet::extract(&self.word, self.analysis.as_ref())
    }

    fn to_line(&self) -> String {
        let mut fields = vec![self.word.clone()];
        if let Some(analysis) = &self.analysis {
            fields.push(analysis.lemma.clone());
            fields.push(analysis.pos.clone());
            fields.push(
                analysis
                    .secondary_pos
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            );
            fields.push(analysis.chain().unwrap_or_else(|| PLACEHOLDER.to_string()));
        }
        if let Some(label) = &self.label {
            fields.push(label.clone());
        }
        fields.join("\t")
    }
}

/// One sentence of analyzed tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedSentence {
    pub tokens: Vec<AnalyzedToken>,
}

impl AnalyzedSentence {
    pub fn new(tokens: Vec<AnalyzedToken>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Surface forms.
    pub fn words(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.word.clone()).collect()
    }

    /// Analyses, aligned with [`AnalyzedSentence::words`].
    pub fn analyses(&self) -> Vec<Option<MorphAnalysis>> {
        self.tokens.iter().map(|t| t.analysis.clone()).collect()
    }

    /// Gold labels, or `None` if any token is unlabelled.
    pub fn labels(&self) -> Option<Vec<String>> {
        self.tokens.iter().map(|t| t.label.clone()).collect()
    }

    /// Surface forms joined with single spaces.
    pub fn text(&self) -> String {
        self.words().join(" ")
    }
}

fn optional_field(value: &str) -> Option<&str> {
    match value.trim() {
        "" | PLACEHOLDER => None,
        v => Some(v),
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<AnalyzedToken> {
    let fields: Vec<&str> = line.split('\t').collect();
    let token = match fields.as_slice() {
        [word] => AnalyzedToken::new(*word, None),
        [word, label] => AnalyzedToken::new(*word, None).with_label(label.trim()),
        [word, lemma, pos, secondary_pos, chain, rest @ ..] if rest.len() <= 1 => {
            let mut analysis = MorphAnalysis::new(*lemma, *pos);
            if let Some(secondary_pos) = optional_field(secondary_pos) {
                analysis = analysis.with_secondary_pos(secondary_pos);
            }
            if let Some(chain) = optional_field(chain) {
                analysis = analysis.with_chain(chain);
            }
            let token = AnalyzedToken::new(*word, Some(analysis));
            match rest.first() {
                Some(label) => token.with_label(label.trim()),
                None => token,
            }
        }
        _ => {
            return Err(ObekError::InvalidFeatureLine {
                line: line_no,
                found: fields.len(),
                expected: ANALYZED_FIELDS,
                content: line.to_string(),
            });
        }
    };
    Ok(token)
}

/// Reads an analysis file.
///
/// # Errors
///
/// `ObekError::InvalidFeatureLine` for lines with 3, 4 or more than 6 fields.
pub fn read_analysis_file<R: BufRead>(reader: R) -> Result<Vec<AnalyzedSentence>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !current.is_empty() {
                sentences.push(AnalyzedSentence::new(std::mem::take(&mut current)));
            }
            continue;
        }
        current.push(parse_line(line, idx + 1)?);
    }
    if !current.is_empty() {
        sentences.push(AnalyzedSentence::new(current));
    }

    Ok(sentences)
}

/// Writes sentences in the analysis file format.
pub fn write_analysis_file<W: Write>(writer: &mut W, sentences: &[AnalyzedSentence]) -> Result<()> {
    for (i, sentence) in sentences.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        for token in &sentence.tokens {
            writeln!(writer, "{}", token.to_line())?;
        }
    }
    Ok(())
}
