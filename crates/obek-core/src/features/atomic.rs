//! # Atomic Token Features
//!
//! Derives the fixed-order categorical feature row of a single token from its
//! surface form and morphological analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::analysis::{MorphAnalysis, UNKNOWN_SECONDARY_POS};

/// Placeholder for absent categorical values.
pub const PLACEHOLDER: &str = "_";

/// Word and lemma of the sentence boundary sentinels.
pub const BOUNDARY_WORD: &str = "<s>";

/// Group chain of tokens without a morphological analysis.
pub const NO_GROUP: &str = "NO_IG";

/// Grammatical cases recognised in the last inflectional group, in lookup order.
const CASES: &[&str] = &["Dat", "Abl", "Acc", "Inst", "Loc", "Gen", "Nom"];

/// Suffix id marking third person plural agreement.
const PLURAL_SUFFIX: &str = "A3pl";

/// Columns of an [`AtomicFeatureSet`], in feature-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureField {
    Word,
    Lemma,
    Pos,
    SecondaryPos,
    LastGroup,
    Case,
    Suffix3,
    Plural,
    Shape,
    FirstCapital,
    HasQuote,
    AllCaps,
    HasDot,
}

impl FeatureField {
    /// Number of features per token.
    pub const COUNT: usize = 13;

    /// All fields in feature-index order.
    pub fn all() -> &'static [FeatureField] {
        &[
            FeatureField::Word,
            FeatureField::Lemma,
            FeatureField::Pos,
            FeatureField::SecondaryPos,
            FeatureField::LastGroup,
            FeatureField::Case,
            FeatureField::Suffix3,
            FeatureField::Plural,
            FeatureField::Shape,
            FeatureField::FirstCapital,
            FeatureField::HasQuote,
            FeatureField::AllCaps,
            FeatureField::HasDot,
        ]
    }

    /// Feature index used by templates.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Field for a feature index.
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::all().get(idx).copied()
    }

    /// Column name.
    pub fn name(self) -> &'static str {
        match self {
            FeatureField::Word => "word",
            FeatureField::Lemma => "lemma",
            FeatureField::Pos => "pos",
            FeatureField::SecondaryPos => "secondary_pos",
            FeatureField::LastGroup => "last_group",
            FeatureField::Case => "case",
            FeatureField::Suffix3 => "suffix3",
            FeatureField::Plural => "plural",
            FeatureField::Shape => "shape",
            FeatureField::FirstCapital => "first_capital",
            FeatureField::HasQuote => "has_quote",
            FeatureField::AllCaps => "all_caps",
            FeatureField::HasDot => "has_dot",
        }
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-token feature row. Always [`FeatureField::COUNT`] values long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomicFeatureSet {
    values: Vec<String>,
}

impl AtomicFeatureSet {
    /// Extracts the features of `word` given its analysis.
    ///
    /// Tokens the analyzer could not identify get the degraded row of
    /// [`AtomicFeatureSet::unanalyzed`].
    ///
    /// # Examples
    /// ```
    /// use obek_core::features::{AtomicFeatureSet, FeatureField, MorphAnalysis};
    ///
    /// let analysis = MorphAnalysis::new("ev", "Noun").with_chain("A3sg+Pnon+Loc");
    /// let features = AtomicFeatureSet::extract("Evde", Some(&analysis));
    /// assert_eq!(features.get(FeatureField::Case), "Loc");
    /// assert_eq!(features.get(FeatureField::Shape), "Cc");
    /// ```
    pub fn extract(word: &str, analysis: Option<&MorphAnalysis>) -> Self {
        let Some(analysis) = analysis else {
            return Self::unanalyzed(word);
        };

        let pos = if analysis.is_proper_noun() {
            "Prop".to_string()
        } else {
            analysis.pos.clone()
        };
        let secondary_pos = match analysis.secondary_pos.as_deref() {
            None | Some("") | Some(UNKNOWN_SECONDARY_POS) => PLACEHOLDER.to_string(),
            Some(s) => s.to_string(),
        };
        let last_group = analysis.chain().unwrap_or_else(|| PLACEHOLDER.to_string());
        let case = CASES
            .iter()
            .find(|case| analysis.last_group.iter().any(|s| s == *case))
            .copied()
            .unwrap_or(PLACEHOLDER);
        let plural = analysis.last_group.iter().any(|s| s == PLURAL_SUFFIX);

        let values = vec![
            word.to_string(),
            analysis.lemma.clone(),
            pos,
            secondary_pos,
            last_group,
            case.to_string(),
            last_chars(word, 3),
            plural.to_string(),
            shape(word),
            starts_with_capital(word).to_string(),
            word.contains('\'').to_string(),
            is_all_caps(word).to_string(),
            (word.chars().count() > 1 && word.contains('.')).to_string(),
        ];
        Self { values }
    }

    /// Degraded row: the surface form doubles as lemma, the rest are placeholders.
    pub fn unanalyzed(word: &str) -> Self {
        let values = vec![
            word.to_string(),
            word.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            NO_GROUP.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            "false".to_string(),
            PLACEHOLDER.to_string(),
            "false".to_string(),
            "false".to_string(),
            "false".to_string(),
            "false".to_string(),
        ];
        Self { values }
    }

    /// Sentinel standing before the first token of a sentence.
    pub fn start() -> Self {
        Self::unanalyzed(BOUNDARY_WORD)
    }

    /// Sentinel standing after the last token of a sentence.
    pub fn end() -> Self {
        Self::unanalyzed(BOUNDARY_WORD)
    }

    /// Value of one field.
    pub fn get(&self, field: FeatureField) -> &str {
        &self.values[field.index()]
    }

    /// All values in feature-index order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Consumes the set, returning its values.
    pub fn into_values(self) -> Vec<String> {
        self.values
    }

    /// Values joined with `delimiter`, optionally followed by a label.
    pub fn feature_line(&self, delimiter: &str, label: Option<&str>) -> String {
        let mut line = self.values.join(delimiter);
        if let Some(label) = label {
            line.push_str(delimiter);
            line.push_str(label);
        }
        line
    }
}

impl AsRef<[String]> for AtomicFeatureSet {
    fn as_ref(&self) -> &[String] {
        &self.values
    }
}

/// Character class used by [`shape`].
fn char_class(ch: char) -> char {
    if ch.is_uppercase() {
        'C'
    } else if ch.is_lowercase() {
        'c'
    } else if ch.is_numeric() {
        'D'
    } else {
        'P'
    }
}

/// Run-length-collapsed character class signature, e.g. `Ankara'da` → `CcPc`.
pub fn shape(word: &str) -> String {
    let mut out = String::new();
    let mut last = None;
    for class in word.chars().map(char_class) {
        if last != Some(class) {
            out.push(class);
            last = Some(class);
        }
    }
    out
}

fn last_chars(word: &str, n: usize) -> String {
    let count = word.chars().count();
    if count > n {
        word.chars().skip(count - n).collect()
    } else {
        word.to_string()
    }
}

fn starts_with_capital(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// The part before the first apostrophe is non-empty and all uppercase.
fn is_all_caps(word: &str) -> bool {
    let prefix = word.split('\'').next().unwrap_or_default();
    !prefix.is_empty() && prefix.chars().all(char::is_uppercase)
}
