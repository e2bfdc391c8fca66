pub mod analysis_file;
pub mod feature_file;

pub use analysis_file::{AnalyzedSentence, AnalyzedToken, read_analysis_file, write_analysis_file};
pub use feature_file::{
    LabeledRow, read_full_features, read_sentences, read_single_features, write_sentence,
    write_sentences,
};
