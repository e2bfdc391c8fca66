use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while shaping features or decoding chunks.
#[derive(Debug, Error)]
pub enum ObekError {
    /// A template token could not be read as a `position,featureIndex` pair.
    #[error("cannot parse template token {token:?} on line {line}: {reason}")]
    TemplateParse {
        /// 1-based line number in the template source.
        line: usize,
        /// The offending token after decoration stripping.
        token: String,
        /// Why the token was rejected.
        reason: String,
    },

    /// No usable template was loaded, so expansion would be meaningless.
    #[error("no valid templates are loaded")]
    EmptyTemplateSet,

    /// A template references a feature column the rows do not have.
    #[error("feature index {index} is out of range for rows of width {width}")]
    FeatureIndexOutOfRange {
        /// Requested feature index.
        index: usize,
        /// Number of features per row.
        width: usize,
    },

    /// A label is not a two-character `<tag><marker>` string with a known tag.
    #[error("unexpected label {label:?}")]
    MalformedLabel {
        /// The label as produced by the predictor.
        label: String,
    },

    /// A feature file line carries fewer fields than required.
    #[error("line {line} has {found} fields, at least {expected} expected: {content:?}")]
    InvalidFeatureLine {
        /// 1-based line number.
        line: usize,
        /// Number of fields found.
        found: usize,
        /// Minimum number of fields.
        expected: usize,
        /// Raw line content.
        content: String,
    },

    /// Two parallel sequences disagree in length.
    #[error("{what}: expected {expected} items, got {actual}")]
    LengthMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The external label predictor failed for this sentence.
    #[error("label predictor failed: {0}")]
    PredictorFailure(String),

    /// The external label predictor did not finish in time.
    #[error("label predictor timed out after {0:?}")]
    PredictorTimeout(Duration),

    /// The model file could not be loaded.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),
}

impl ObekError {
    /// Whether the error belongs to the label predictor stage.
    ///
    /// Corpus drivers use this to fail a single sentence and keep going.
    pub fn is_predictor_failure(&self) -> bool {
        matches!(
            self,
            ObekError::PredictorFailure(_) | ObekError::PredictorTimeout(_) | ObekError::ModelLoad(_)
        )
    }
}

/// Result type alias for obek operations.
pub type Result<T> = std::result::Result<T, ObekError>;
