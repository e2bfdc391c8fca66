//! # Obek Trainer
//!
//! Training-side workflows for the chunker: reading hand-annotated corpora,
//! writing single-feature files for CRF training, writing CRFsuite training
//! files and measuring token-level accuracy of a trained model.

pub mod annotation;
pub mod crfsuite;
pub mod evaluate;
pub mod features;

pub use annotation::{
    AnnotatedChunk, AnnotatedSentence, AnnotationCorpus, AnnotationMode, AnnotationReader,
    AnnotationStats, LineOutcome,
};
pub use crfsuite::{crfsuite_line, write_crfsuite_features};
pub use evaluate::{Evaluation, evaluate};
pub use features::{GenerationStats, write_single_features};
