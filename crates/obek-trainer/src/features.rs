//! Single-feature training files from gold-labelled analysis sentences.

use std::io::Write;

use obek_core::Result;
use obek_core::corpus::AnalyzedSentence;
use tracing::{info, warn};

/// Counts from one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub sentences: usize,
    pub tokens: usize,
    /// Sentences skipped because a token had no gold label
    pub unlabeled: usize,
}

/// Writes each token's atomic features followed by its gold label.
///
/// Sentences are separated by one blank line. A sentence with any
/// unlabelled token is skipped.
pub fn write_single_features<W: Write>(
    writer: &mut W,
    sentences: &[AnalyzedSentence],
    delimiter: &str,
) -> Result<GenerationStats> {
    let mut stats = GenerationStats::default();

    for (idx, sentence) in sentences.iter().enumerate() {
        let Some(labels) = sentence.labels() else {
            warn!(sentence = idx, text = %sentence.text(), "sentence without gold labels skipped");
            stats.unlabeled += 1;
            continue;
        };
        if sentence.is_empty() {
            continue;
        }

        if stats.sentences > 0 {
            writeln!(writer)?;
        }
        for (token, label) in sentence.tokens.iter().zip(&labels) {
            writeln!(writer, "{}", token.features().feature_line(delimiter, Some(label.as_str())))?;
        }
        stats.sentences += 1;
        stats.tokens += sentence.len();
    }

    writer.flush()?;
    info!(
        sentences = stats.sentences,
        tokens = stats.tokens,
        unlabeled = stats.unlabeled,
        "single feature file written"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use obek_core::corpus::{AnalyzedToken, read_single_features};
    use obek_core::features::{FeatureField, MorphAnalysis};
    use std::io::Cursor;

    fn sentence(labels: &[Option<&str>]) -> AnalyzedSentence {
        let words = ["Ahmet", "geldi"];
        let analyses = [
            MorphAnalysis::new("Ahmet", "Noun").with_secondary_pos("Prop"),
            MorphAnalysis::new("gel", "Verb").with_chain("Pos+Past+A3sg"),
        ];
        let tokens = words
            .iter()
            .zip(analyses)
            .zip(labels)
            .map(|((word, analysis), label)| {
                let token = AnalyzedToken::new(*word, Some(analysis));
                match label {
                    Some(label) => token.with_label(*label),
                    None => token,
                }
            })
            .collect();
        AnalyzedSentence::new(tokens)
    }

    #[test]
    fn writes_features_then_label() {
        let sentences = vec![
            sentence(&[Some("SB"), Some("VB")]),
            sentence(&[Some("SB"), None]),
            sentence(&[Some("OB"), Some("VB")]),
        ];
        let mut out = Vec::new();
        let stats = write_single_features(&mut out, &sentences, "\t").unwrap();
        assert_eq!(
            stats,
            GenerationStats {
                sentences: 2,
                tokens: 4,
                unlabeled: 1
            }
        );

        let text = String::from_utf8(out).unwrap();
        let first = text.lines().next().unwrap();
        let fields: Vec<&str> = first.split('\t').collect();
        assert_eq!(fields.len(), FeatureField::COUNT + 1);
        assert_eq!(fields[FeatureField::Pos.index()], "Prop");
        assert_eq!(fields.last(), Some(&"SB"));

        let back = read_single_features(Cursor::new(text), "\t").unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[1][0].label, "OB");
    }
}
