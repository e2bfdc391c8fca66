//! # Obek
//!
//! Turkish shallow parsing. Re-exports the chunking pipeline from
//! `obek-core` and the training workflows from `obek-trainer`.
//!
//! ```rust
//! use obek::{ChunkType, LabelDecoder, TagTable};
//!
//! let tags = TagTable::default();
//! let chunks = LabelDecoder::new(&tags)
//!     .decode(&["AB", "AI", "VB"], &["dün", "akşam", "geldi"])
//!     .unwrap();
//! assert_eq!(chunks[0].chunk_type, ChunkType::Adjunct);
//! ```

pub use obek_core::*;

/// Training data preparation and evaluation.
pub mod trainer {
    pub use obek_trainer::*;
}
