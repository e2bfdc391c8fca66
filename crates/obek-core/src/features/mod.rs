pub mod analysis;
pub mod atomic;

pub use analysis::MorphAnalysis;
pub use atomic::{AtomicFeatureSet, FeatureField, PLACEHOLDER, shape};
