//! Token-level chunk type accuracy against gold-labelled sentences.

use std::fmt;

use obek_core::corpus::AnalyzedSentence;
use obek_core::decoder::{ChunkType, LabelDecoder};
use obek_core::{Chunker, LabelPredictor};
use serde::Serialize;
use tracing::{info, warn};

/// Hit and total token counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub hit: usize,
    pub total: usize,
    /// Sentences the chunker failed on; their tokens count as misses.
    pub failed_sentences: usize,
}

impl Evaluation {
    /// `hit / total`, or 0 for an empty evaluation.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hit as f64 / self.total as f64
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.2})", self.hit, self.total, self.accuracy())
    }
}

/// Compares the chunk type predicted for every token with its gold type.
///
/// A token counts as a hit when the chunk containing its index has the gold
/// type. Tokens without a valid gold label are not counted; sentences
/// without gold labels are skipped.
pub fn evaluate<P: LabelPredictor>(
    chunker: &Chunker<P>,
    sentences: &[AnalyzedSentence],
) -> Evaluation {
    let decoder = LabelDecoder::new(chunker.tag_table());
    let gold: Vec<Option<Vec<Option<ChunkType>>>> = sentences
        .iter()
        .map(|s| {
            s.labels().map(|labels| {
                labels
                    .iter()
                    .map(|l| decoder.parse_label(l).ok().map(|(_, ty)| ty))
                    .collect()
            })
        })
        .collect();

    let results = chunker.chunk_corpus(sentences);
    let mut eval = Evaluation::default();

    for (idx, (gold, result)) in gold.iter().zip(results).enumerate() {
        let Some(gold) = gold else {
            warn!(sentence = idx, "no gold labels, skipped");
            continue;
        };
        let chunks = match result {
            Ok(chunks) => chunks,
            Err(err) => {
                warn!(sentence = idx, "chunking failed: {err}");
                eval.failed_sentences += 1;
                eval.total += gold.iter().flatten().count();
                continue;
            }
        };

        for (token, expected) in gold.iter().enumerate() {
            let Some(expected) = expected else {
                continue;
            };
            let predicted = chunks
                .iter()
                .find(|c| c.contains(token))
                .map(|c| c.chunk_type);
            if predicted == Some(*expected) {
                eval.hit += 1;
            }
            eval.total += 1;
        }
    }

    info!(
        hit = eval.hit,
        total = eval.total,
        failed = eval.failed_sentences,
        accuracy = eval.accuracy(),
        "evaluation finished"
    );
    eval
}

#[cfg(test)]
mod tests {
    use super::*;
    use obek_core::corpus::AnalyzedToken;
    use obek_core::{ObekError, Result, TemplateSet};

    /// Predicts from the surface form: `V*` words are verbs, `?` yields a
    /// malformed label and `!` fails the sentence.
    struct ByWord;

    impl LabelPredictor for ByWord {
        fn predict(&self, features: &[Vec<String>]) -> Result<Vec<String>> {
            features
                .iter()
                .map(|row| match row[0].as_str() {
                    "!" => Err(ObekError::PredictorFailure("bang".into())),
                    "?" => Ok("X".to_string()),
                    w if w.starts_with('V') => Ok("VB".to_string()),
                    _ => Ok("SB".to_string()),
                })
                .collect()
        }

        fn name(&self) -> &'static str {
            "by-word"
        }
    }

    fn sentence(tokens: &[(&str, Option<&str>)]) -> AnalyzedSentence {
        AnalyzedSentence::new(
            tokens
                .iter()
                .map(|(w, l)| {
                    let token = AnalyzedToken::new(*w, None);
                    match l {
                        Some(l) => token.with_label(*l),
                        None => token,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn counts_hits_per_token() {
        let chunker = Chunker::new(TemplateSet::parse("U00:%x[0,0]").unwrap(), ByWord);
        let sentences = vec![
            // 2 hits out of 3: "Vay" is predicted as a verb.
            sentence(&[("Ali", Some("SB")), ("Vay", Some("SI")), ("Vgeldi", Some("VB"))]),
            // malformed prediction: the token belongs to no chunk, a miss.
            sentence(&[("?", Some("SB")), ("Vgit", Some("VB"))]),
            // failed sentence: both tokens are misses.
            sentence(&[("!", Some("SB")), ("Vgit", Some("VB"))]),
            // unlabelled sentence is skipped.
            sentence(&[("Ali", None)]),
            // invalid gold label is not counted.
            sentence(&[("Ali", Some("ZZ")), ("Veli", Some("VB"))]),
        ];
        let eval = evaluate(&chunker, &sentences);
        assert_eq!(eval.hit, 2 + 1 + 1);
        assert_eq!(eval.total, 3 + 2 + 2 + 1);
        assert_eq!(eval.failed_sentences, 1);
        assert!((eval.accuracy() - 0.5).abs() < 1e-9);
        assert_eq!(eval.to_string(), "4/8 (0.50)");
    }

    #[test]
    fn empty_evaluation() {
        let eval = Evaluation::default();
        assert_eq!(eval.accuracy(), 0.0);
    }
}
