//! Single-feature and full-feature files: one token per line, fields joined by
//! a delimiter with the gold label last, sentences separated by blank lines.

use std::io::{BufRead, Write};

use crate::error::{ObekError, Result};

/// Minimum fields on a single-feature line: two atomic features and a label.
pub const MIN_SINGLE_FEATURE_FIELDS: usize = 3;

/// Minimum fields on a full-feature line: one composite feature and a label.
pub const MIN_FULL_FEATURE_FIELDS: usize = 2;

/// A token's feature fields plus its gold label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRow {
    pub features: Vec<String>,
    pub label: String,
}

impl LabeledRow {
    pub fn new(features: Vec<String>, label: impl Into<String>) -> Self {
        Self {
            features,
            label: label.into(),
        }
    }

    /// Splits off the last field as the label. `None` for an empty list.
    pub fn from_fields(mut fields: Vec<String>) -> Option<Self> {
        let label = fields.pop()?;
        Some(Self {
            features: fields,
            label,
        })
    }

    /// Features then label, joined with `delimiter`.
    pub fn to_line(&self, delimiter: &str) -> String {
        let mut line = self.features.join(delimiter);
        if !self.features.is_empty() {
            line.push_str(delimiter);
        }
        line.push_str(&self.label);
        line
    }
}

impl AsRef<[String]> for LabeledRow {
    fn as_ref(&self) -> &[String] {
        &self.features
    }
}

/// Reads labelled sentences, requiring at least `min_fields` fields per line.
///
/// # Errors
///
/// `ObekError::InvalidFeatureLine` for a short line, `ObekError::Io` on read
/// failure. A short line fails the whole load.
pub fn read_sentences<R: BufRead>(
    reader: R,
    delimiter: &str,
    min_fields: usize,
) -> Result<Vec<Vec<LabeledRow>>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }

        let fields: Vec<String> = line.split(delimiter).map(str::to_string).collect();
        if fields.len() < min_fields {
            return Err(ObekError::InvalidFeatureLine {
                line: idx + 1,
                found: fields.len(),
                expected: min_fields,
                content: line.to_string(),
            });
        }
        if let Some(row) = LabeledRow::from_fields(fields) {
            current.push(row);
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}

/// Reads a single-feature file.
pub fn read_single_features<R: BufRead>(reader: R, delimiter: &str) -> Result<Vec<Vec<LabeledRow>>> {
    read_sentences(reader, delimiter, MIN_SINGLE_FEATURE_FIELDS)
}

/// Reads a full-feature file.
pub fn read_full_features<R: BufRead>(reader: R, delimiter: &str) -> Result<Vec<Vec<LabeledRow>>> {
    read_sentences(reader, delimiter, MIN_FULL_FEATURE_FIELDS)
}

/// Writes one sentence, one row per line.
pub fn write_sentence<W: Write>(writer: &mut W, sentence: &[LabeledRow], delimiter: &str) -> Result<()> {
    for row in sentence {
        writeln!(writer, "{}", row.to_line(delimiter))?;
    }
    Ok(())
}

/// Writes sentences with one blank line between them and none after the last.
pub fn write_sentences<W: Write>(
    writer: &mut W,
    sentences: &[Vec<LabeledRow>],
    delimiter: &str,
) -> Result<()> {
    for (i, sentence) in sentences.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        write_sentence(writer, sentence, delimiter)?;
    }
    Ok(())
}
