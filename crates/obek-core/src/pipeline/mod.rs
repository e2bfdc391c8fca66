pub mod chunker;
pub mod config;

pub use chunker::{Chunker, TokenAndLabel};
pub use config::{ChunkerConfig, DEFAULT_FIELD_DELIMITER};
