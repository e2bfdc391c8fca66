//! Window expansion of atomic feature rows into composite feature vectors.

use std::io::{BufRead, Write};

use tracing::debug;

use super::{OUT_OF_RANGE, Template, TemplateSet};
use crate::corpus::feature_file::{LabeledRow, read_single_features, write_sentence};
use crate::error::{ObekError, Result};

impl TemplateSet {
    /// Expands every token of a sentence.
    ///
    /// Returns one vector per row, each holding one composite string per
    /// template in file order. Positions outside the sentence read as `_`.
    ///
    /// # Errors
    ///
    /// `ObekError::EmptyTemplateSet` when no template is loaded,
    /// `ObekError::FeatureIndexOutOfRange` when a template reads past the
    /// end of a row.
    ///
    /// # Examples
    /// ```
    /// use obek_core::template::TemplateSet;
    ///
    /// let set = TemplateSet::parse("U00:%x[-1,0]/%x[0,0]").unwrap();
    /// let rows = vec![vec!["Ali".to_string()], vec!["geldi".to_string()]];
    /// let vectors = set.expand(&rows).unwrap();
    /// assert_eq!(vectors, vec![vec!["_/Ali".to_string()], vec!["Ali/geldi".to_string()]]);
    /// ```
    pub fn expand<R: AsRef<[String]>>(&self, rows: &[R]) -> Result<Vec<Vec<String>>> {
        if self.is_empty() {
            return Err(ObekError::EmptyTemplateSet);
        }
        (0..rows.len()).map(|k| self.expand_token(rows, k)).collect()
    }

    /// Expands the token at index `k`.
    pub fn expand_token<R: AsRef<[String]>>(&self, rows: &[R], k: usize) -> Result<Vec<String>> {
        if self.is_empty() {
            return Err(ObekError::EmptyTemplateSet);
        }
        self.templates()
            .iter()
            .map(|template| self.expand_template(template, rows, k))
            .collect()
    }

    fn expand_template<R: AsRef<[String]>>(
        &self,
        template: &Template,
        rows: &[R],
        k: usize,
    ) -> Result<String> {
        let mut pieces = Vec::with_capacity(template.items.len());
        for item in &template.items {
            let Some(pos) = k
                .checked_add_signed(item.position)
                .filter(|&pos| pos < rows.len())
            else {
                pieces.push(OUT_OF_RANGE);
                continue;
            };
            let row = rows[pos].as_ref();
            let value = row
                .get(item.feature_index)
                .ok_or(ObekError::FeatureIndexOutOfRange {
                    index: item.feature_index,
                    width: row.len(),
                })?;
            pieces.push(value.as_str());
        }
        Ok(pieces.join(self.compound_delimiter()))
    }

    /// Expands a labelled sentence, carrying each gold label over.
    pub fn expand_labeled(&self, sentence: &[LabeledRow]) -> Result<Vec<LabeledRow>> {
        let vectors = self.expand(sentence)?;
        Ok(vectors
            .into_iter()
            .zip(sentence)
            .map(|(features, row)| LabeledRow::new(features, row.label.clone()))
            .collect())
    }

    /// Converts a single-feature file into a full-feature file.
    ///
    /// Both files use `field_delimiter` between fields; sentences are
    /// separated by one blank line. Returns the number of sentences written.
    pub fn generate_full_features<R: BufRead, W: Write>(
        &self,
        reader: R,
        writer: &mut W,
        field_delimiter: &str,
    ) -> Result<usize> {
        let sentences = read_single_features(reader, field_delimiter)?;
        for (i, sentence) in sentences.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            let expanded = self.expand_labeled(sentence)?;
            write_sentence(writer, &expanded, field_delimiter)?;
        }
        writer.flush()?;
        debug!(sentences = sentences.len(), "wrote full feature sentences");
        Ok(sentences.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Template, TemplateItem};

    fn rows(words: &[&str]) -> Vec<Vec<String>> {
        words
            .iter()
            .map(|w| vec![w.to_string(), w.to_uppercase()])
            .collect()
    }

    fn window_set() -> TemplateSet {
        TemplateSet::parse(
            "U00:%x[-2,0]\nU01:%x[-1,0]\nU02:%x[0,0]\nU03:%x[1,0]\nU04:%x[2,0]\nU05:%x[-1,1]/%x[0,1]/%x[1,1]\n",
        )
        .unwrap()
    }

    #[test]
    fn expands_symmetric_window() {
        let vectors = window_set().expand(&rows(&["a", "b", "c"])).unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], vec!["_", "_", "a", "b", "c", "_/A/B"]);
        assert_eq!(vectors[1], vec!["_", "a", "b", "c", "_", "A/B/C"]);
        assert_eq!(vectors[2], vec!["a", "b", "c", "_", "_", "B/C/_"]);
    }

    #[test]
    fn every_vector_has_one_component_per_template() {
        let set = window_set();
        for n in 0..6 {
            let words: Vec<String> = (0..n).map(|i| format!("w{i}")).collect();
            let refs: Vec<&str> = words.iter().map(String::as_str).collect();
            let vectors = set.expand(&rows(&refs)).unwrap();
            assert_eq!(vectors.len(), n);
            for vector in &vectors {
                assert_eq!(vector.len(), set.len());
                assert_eq!(vector[5].split('/').count(), 3);
            }
        }
    }

    #[test]
    fn far_offsets_degrade_to_placeholder() {
        let set = TemplateSet::new(vec![Template::new(vec![
            TemplateItem::new(-100, 0),
            TemplateItem::new(100, 1),
        ])]);
        let vectors = set.expand(&rows(&["x"])).unwrap();
        assert_eq!(vectors, vec![vec!["_/_".to_string()]]);
    }

    #[test]
    fn extreme_offsets_degrade_to_placeholder() {
        let set = TemplateSet::parse(
            "U00:%x[9223372036854775807,0]\nU01:%x[-9223372036854775808,1]\n",
        )
        .unwrap();
        assert_eq!(set.templates()[0].items[0].position, isize::MAX);
        assert_eq!(set.templates()[1].items[0].position, isize::MIN);
        let vectors = set.expand(&rows(&["a", "b"])).unwrap();
        assert_eq!(vectors, vec![vec!["_", "_"], vec!["_", "_"]]);
    }

    #[test]
    fn custom_compound_delimiter() {
        let set = TemplateSet::parse("U00:%x[0,0]/%x[0,1]")
            .unwrap()
            .with_compound_delimiter("|");
        let vectors = set.expand(&rows(&["ev"])).unwrap();
        assert_eq!(vectors[0][0], "ev|EV");
    }

    #[test]
    fn empty_template_set_is_fatal() {
        let set = TemplateSet::parse("# nothing\n").unwrap();
        let err = set.expand(&rows(&["a"])).unwrap_err();
        assert!(matches!(err, ObekError::EmptyTemplateSet));
    }

    #[test]
    fn feature_index_past_row_width_is_an_error() {
        let set = TemplateSet::parse("U00:%x[0,7]").unwrap();
        let err = set.expand(&rows(&["a"])).unwrap_err();
        assert!(matches!(
            err,
            ObekError::FeatureIndexOutOfRange { index: 7, width: 2 }
        ));
    }

    #[test]
    fn empty_sentence_expands_to_nothing() {
        let empty: Vec<Vec<String>> = Vec::new();
        assert!(window_set().expand(&empty).unwrap().is_empty());
    }

    #[test]
    fn reparsing_is_deterministic() {
        let text = "U00:%x[-1,0]\nU01:%x[0,1]/%x[1,0]\n";
        let a = TemplateSet::parse(text).unwrap();
        let b = TemplateSet::parse(text).unwrap();
        let sentence = rows(&["bu", "bir", "deneme"]);
        assert_eq!(a.expand(&sentence).unwrap(), b.expand(&sentence).unwrap());
    }

    #[test]
    fn generates_full_feature_file() {
        let set = TemplateSet::parse("U00:%x[-1,0]\nU01:%x[0,0]/%x[0,1]\n").unwrap();
        let input = "Ahmet Ahmet SB\nçay çay OB\n\ndemledi demle VB\n";
        let mut out = Vec::new();
        let count = set
            .generate_full_features(input.as_bytes(), &mut out, " ")
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "_ Ahmet/Ahmet SB\nAhmet çay/çay OB\n\n_ demledi/demle VB\n"
        );
    }
}
