use std::time::Duration;

use crate::decoder::MalformedLabelPolicy;
use crate::predictor::crfpp::DEFAULT_TIMEOUT;
use crate::template::DEFAULT_COMPOUND_DELIMITER;

/// Default separator between fields of feature files.
pub const DEFAULT_FIELD_DELIMITER: &str = "\t";

/// Configuration for the chunker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Joins the pieces of one expanded template
    pub compound_delimiter: String,
    /// Separates fields in feature files, including the `crf_test` scratch file
    pub field_delimiter: String,
    /// How the decoder treats malformed labels
    pub malformed_policy: MalformedLabelPolicy,
    /// Upper bound on one subprocess prediction
    pub predictor_timeout: Duration,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            compound_delimiter: DEFAULT_COMPOUND_DELIMITER.to_string(),
            field_delimiter: DEFAULT_FIELD_DELIMITER.to_string(),
            malformed_policy: MalformedLabelPolicy::default(),
            predictor_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ChunkerConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter joining template pieces.
    pub fn with_compound_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.compound_delimiter = delimiter.into();
        self
    }

    /// Set the feature file field delimiter.
    pub fn with_field_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.field_delimiter = delimiter.into();
        self
    }

    /// Set the malformed label policy.
    pub fn with_malformed_policy(mut self, policy: MalformedLabelPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    /// Set the subprocess prediction timeout.
    pub fn with_predictor_timeout(mut self, timeout: Duration) -> Self {
        self.predictor_timeout = timeout;
        self
    }
}
