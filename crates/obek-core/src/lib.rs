//! # Obek Core
//!
//! Shallow parsing for Turkish. Sentences are split into typed chunks
//! (subject, object, adjunct, verb) by a CRF sequence labeler fed with
//! template-expanded morphological features.
//!
//! ## Quick Start
//!
//! ```rust
//! use obek_core::{Chunker, LabelPredictor, MorphAnalysis, Result, TemplateSet};
//!
//! struct Fixed;
//!
//! impl LabelPredictor for Fixed {
//!     fn predict(&self, features: &[Vec<String>]) -> Result<Vec<String>> {
//!         let mut labels = vec!["SB".to_string(); features.len()];
//!         if let Some(last) = labels.last_mut() {
//!             *last = "VB".to_string();
//!         }
//!         Ok(labels)
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "fixed"
//!     }
//! }
//!
//! let templates = TemplateSet::parse("U00:%x[0,0]\nU01:%x[-1,1]/%x[0,1]").unwrap();
//! let chunker = Chunker::new(templates, Fixed);
//! let analyses = vec![
//!     Some(MorphAnalysis::new("Ahmet", "Noun").with_secondary_pos("Prop")),
//!     Some(MorphAnalysis::new("gel", "Verb")),
//! ];
//! let chunks = chunker.chunk(&["Ahmet", "geldi"], &analyses).unwrap();
//!
//! assert_eq!(chunks[0].to_string(), "[Ahmet:SUBJECT]");
//! assert_eq!(chunks[1].explain(), "[gel:VERB-1]");
//! ```
pub mod corpus;
pub mod decoder;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod predictor;
pub mod template;
pub mod tokenizer;

// Re-export primary API
pub use corpus::{AnalyzedSentence, AnalyzedToken, LabeledRow};
pub use decoder::{
    Chunk, ChunkToken, ChunkType, Label, LabelDecoder, MalformedLabelPolicy, Marker, TagTable,
};
pub use error::{ObekError, Result};
pub use features::{AtomicFeatureSet, FeatureField, MorphAnalysis};
pub use pipeline::{Chunker, ChunkerConfig, TokenAndLabel};
pub use predictor::{Backend, CrfPlusPlusPredictor, CrfSuitePredictor, LabelPredictor, load_predictor};
pub use template::{Template, TemplateDiagnostic, TemplateItem, TemplateSet};
pub use tokenizer::{Token, Tokenizer};
