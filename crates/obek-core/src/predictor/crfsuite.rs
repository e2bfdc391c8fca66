//! In-process tagging with a CRFsuite model.

use std::fs;
use std::path::Path;

use crfs::{Attribute, Model};
use tracing::info;

use super::LabelPredictor;
use crate::error::{ObekError, Result};

/// Loads a CRFsuite model once and tags sentences without leaving the process.
///
/// Column `j` of a feature row with value `v` becomes the attribute `j=v`
/// with weight 1. Training files carry the same names in escaped form
/// (see [`escape_attribute`]); the CRFsuite reader unescapes them before they
/// reach the model's attribute dictionary.
#[derive(Debug, Clone)]
pub struct CrfSuitePredictor {
    model_data: Vec<u8>,
}

impl CrfSuitePredictor {
    /// Reads and validates a model file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let predictor = Self::from_bytes(data)?;
        info!(path = %path.display(), "loaded crfsuite model");
        Ok(predictor)
    }

    /// Validates an in-memory model.
    pub fn from_bytes(model_data: Vec<u8>) -> Result<Self> {
        Model::new(&model_data).map_err(|e| ObekError::ModelLoad(e.to_string()))?;
        Ok(Self { model_data })
    }
}

/// Attribute name for column `j` holding `value`.
pub fn attribute_name(j: usize, value: &str) -> String {
    format!("{j}={value}")
}

/// Escapes `\` and `:` for a CRFsuite training file, where an unescaped
/// colon would start the attribute weight.
pub fn escape_attribute(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '\\' || c == ':' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Turns a feature row into CRFsuite attributes.
pub fn attributes(row: &[String]) -> Vec<Attribute> {
    row.iter()
        .enumerate()
        .map(|(j, value)| Attribute::new(attribute_name(j, value), 1.0))
        .collect()
}

impl LabelPredictor for CrfSuitePredictor {
    fn predict(&self, features: &[Vec<String>]) -> Result<Vec<String>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        // `Model` borrows the buffer it reads from, so it cannot be stored
        // next to `model_data`; it is rebuilt from the bytes for each sentence.
        let model =
            Model::new(&self.model_data).map_err(|e| ObekError::ModelLoad(e.to_string()))?;
        let xseq: Vec<Vec<Attribute>> = features.iter().map(|row| attributes(row)).collect();
        let labels = model
            .tagger()
            .map_err(|e| ObekError::ModelLoad(e.to_string()))?
            .tag(&xseq)
            .map_err(|e| ObekError::PredictorFailure(e.to_string()))?
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(labels)
    }

    fn name(&self) -> &'static str {
        "crfsuite"
    }
}
