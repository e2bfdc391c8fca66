//! CRFsuite training files.
//!
//! One token per line: the gold label, then one `j=value` attribute per
//! composite feature, tab separated and escaped. Sentences are separated by
//! one blank line.

use std::io::{BufRead, Write};

use obek_core::Result;
use obek_core::TemplateSet;
use obek_core::corpus::{LabeledRow, read_single_features};
use obek_core::predictor::crfsuite::{attribute_name, escape_attribute};
use tracing::info;

/// CRFsuite line for one expanded row.
pub fn crfsuite_line(row: &LabeledRow) -> String {
    let mut line = escape_attribute(&row.label);
    for (j, value) in row.features.iter().enumerate() {
        line.push('\t');
        line.push_str(&escape_attribute(&attribute_name(j, value)));
    }
    line
}

/// Expands a single-feature file with `templates` and writes it as CRFsuite
/// training data. Returns the number of sentences written.
pub fn write_crfsuite_features<R: BufRead, W: Write>(
    templates: &TemplateSet,
    reader: R,
    writer: &mut W,
    field_delimiter: &str,
) -> Result<usize> {
    let sentences = read_single_features(reader, field_delimiter)?;
    for (i, sentence) in sentences.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        for row in templates.expand_labeled(sentence)? {
            writeln!(writer, "{}", crfsuite_line(&row))?;
        }
    }
    writer.flush()?;
    info!(sentences = sentences.len(), "crfsuite training file written");
    Ok(sentences.len())
}
