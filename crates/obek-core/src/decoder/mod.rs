pub mod chunk;
#[allow(clippy::module_inception)]
pub mod decoder;
pub mod label;

pub use chunk::{Chunk, ChunkToken};
pub use decoder::{LabelDecoder, MalformedLabelPolicy};
pub use label::{ChunkType, Label, Marker, TagTable};
