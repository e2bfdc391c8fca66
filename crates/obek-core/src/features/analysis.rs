use serde::{Deserialize, Serialize};

/// Secondary part-of-speech short form the analyzer uses for proper nouns.
pub const PROPER_NOUN: &str = "Prop";

/// Secondary part-of-speech short form the analyzer uses when it has none.
pub const UNKNOWN_SECONDARY_POS: &str = "Unk";

/// The first (disambiguated) morphological analysis of one token, as produced
/// by an external analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MorphAnalysis {
    /// Dictionary lemma.
    pub lemma: String,

    /// Primary part-of-speech short form (e.g. `Noun`, `Verb`).
    pub pos: String,

    /// Secondary part-of-speech short form (e.g. `Prop`), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_pos: Option<String>,

    /// Suffix ids of the last inflectional group, in order
    /// (e.g. `["A3sg", "Pnon", "Loc"]`).
    #[serde(default)]
    pub last_group: Vec<String>,
}

impl MorphAnalysis {
    /// Creates an analysis with no secondary POS and no suffixes.
    pub fn new(lemma: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
            pos: pos.into(),
            secondary_pos: None,
            last_group: Vec::new(),
        }
    }

    /// Sets the secondary part-of-speech.
    pub fn with_secondary_pos(mut self, secondary_pos: impl Into<String>) -> Self {
        self.secondary_pos = Some(secondary_pos.into());
        self
    }

    /// Sets the last inflectional group from a `+`-joined chain such as
    /// `A3sg+Pnon+Loc`. Empty segments are ignored.
    pub fn with_chain(mut self, chain: &str) -> Self {
        self.last_group = chain
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Whether the analyzer marked this token as a proper noun.
    pub fn is_proper_noun(&self) -> bool {
        self.secondary_pos.as_deref() == Some(PROPER_NOUN)
    }

    /// The last inflectional group joined with `+`, or `None` when empty.
    pub fn chain(&self) -> Option<String> {
        if self.last_group.is_empty() {
            None
        } else {
            Some(self.last_group.join("+"))
        }
    }
}
