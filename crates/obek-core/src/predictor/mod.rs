//! # Label Predictors
//!
//! The sequence-labeling model is external. A predictor receives the
//! composite feature vectors of one sentence and returns one label per token.

pub mod crfpp;
pub mod crfsuite;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::ChunkerConfig;

pub use crfpp::CrfPlusPlusPredictor;
pub use crfsuite::CrfSuitePredictor;

/// Produces boundary labels for one sentence.
pub trait LabelPredictor: Send + Sync {
    /// Returns one label per row of `features`.
    fn predict(&self, features: &[Vec<String>]) -> Result<Vec<String>>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

impl<P: LabelPredictor + ?Sized> LabelPredictor for Box<P> {
    fn predict(&self, features: &[Vec<String>]) -> Result<Vec<String>> {
        (**self).predict(features)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<P: LabelPredictor + ?Sized> LabelPredictor for Arc<P> {
    fn predict(&self, features: &[Vec<String>]) -> Result<Vec<String>> {
        (**self).predict(features)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Available predictor implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `crf_test` subprocess with a CRF++ model
    #[default]
    CrfPlusPlus,
    /// In-process CRFsuite model
    CrfSuite,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crfpp" | "crf++" => Ok(Backend::CrfPlusPlus),
            "crfsuite" => Ok(Backend::CrfSuite),
            other => Err(format!("unknown backend `{other}` (expected crfpp or crfsuite)")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::CrfPlusPlus => "crfpp",
            Backend::CrfSuite => "crfsuite",
        })
    }
}

/// Opens a predictor for `model`.
///
/// `executable`, the predictor timeout and the field delimiter of `config`
/// only apply to the CRF++ backend.
pub fn load_predictor(
    backend: Backend,
    model: &Path,
    executable: Option<&Path>,
    config: &ChunkerConfig,
) -> Result<Box<dyn LabelPredictor>> {
    match backend {
        Backend::CrfPlusPlus => {
            let mut predictor = CrfPlusPlusPredictor::new(model)
                .with_timeout(config.predictor_timeout)
                .with_field_delimiter(config.field_delimiter.clone());
            if let Some(executable) = executable {
                predictor = predictor.with_executable(executable);
            }
            Ok(Box::new(predictor))
        }
        Backend::CrfSuite => Ok(Box::new(CrfSuitePredictor::from_file(model)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn backend_from_str() {
        assert_eq!("crfpp".parse::<Backend>().unwrap(), Backend::CrfPlusPlus);
        assert_eq!("CRF++".parse::<Backend>().unwrap(), Backend::CrfPlusPlus);
        assert_eq!("crfsuite".parse::<Backend>().unwrap(), Backend::CrfSuite);
        assert!("mallet".parse::<Backend>().is_err());
        assert_eq!(Backend::CrfSuite.to_string(), "crfsuite");
    }

    #[test]
    fn crfpp_backend_defers_to_run_time() {
        let predictor = load_predictor(
            Backend::CrfPlusPlus,
            Path::new("missing.model"),
            Some(Path::new("/nonexistent/crf_test")),
            &ChunkerConfig::new().with_predictor_timeout(Duration::from_secs(1)),
        )
        .unwrap();
        assert_eq!(predictor.name(), "crf++");
        assert!(predictor.predict(&[vec!["x".into()]]).is_err());
    }

    #[test]
    fn crfsuite_backend_reads_model_eagerly() {
        let result = load_predictor(
            Backend::CrfSuite,
            Path::new("/nonexistent/model.crfsuite"),
            None,
            &ChunkerConfig::new().with_predictor_timeout(Duration::from_secs(1)),
        );
        assert!(result.is_err());
    }
}
