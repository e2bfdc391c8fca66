//! # Chunk Boundary Labels
//!
//! Defines the chunk types and the two-character `<tag><marker>` labels used
//! for sequence labeling, e.g. `SB` (subject, begin) or `OI` (object, inside).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ObekError, Result};

/// Grammatical role of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChunkType {
    Subject,
    Object,
    Adjunct,
    Verb,
}

impl ChunkType {
    /// Total number of chunk types.
    pub const NUM_TYPES: usize = 4;

    /// All chunk types in tag-table order.
    pub fn all_types() -> &'static [ChunkType] {
        &[
            ChunkType::Subject,
            ChunkType::Object,
            ChunkType::Adjunct,
            ChunkType::Verb,
        ]
    }

    /// Upper-case name, as printed in chunk renderings.
    pub fn name(self) -> &'static str {
        match self {
            ChunkType::Subject => "SUBJECT",
            ChunkType::Object => "OBJECT",
            ChunkType::Adjunct => "ADJUNCT",
            ChunkType::Verb => "VERB",
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Second character of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `B`: the token opens a new chunk.
    Begin,
    /// Anything else (normally `I`): the token continues the open chunk.
    Inside,
}

impl Marker {
    pub fn as_char(self) -> char {
        match self {
            Marker::Begin => 'B',
            Marker::Inside => 'I',
        }
    }
}

/// A well-formed two-character label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
    pub tag: char,
    pub marker: Marker,
}

impl Label {
    pub fn new(tag: char, marker: Marker) -> Self {
        Self { tag, marker }
    }

    /// Parses a label. Only the character count is checked here; whether the
    /// tag is known is up to the [`TagTable`].
    ///
    /// # Errors
    ///
    /// `ObekError::MalformedLabel` when the label is not exactly two characters.
    pub fn parse(label: &str) -> Result<Self> {
        let mut chars = label.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(tag), Some(marker), None) => Ok(Self {
                tag,
                marker: if marker == 'B' {
                    Marker::Begin
                } else {
                    Marker::Inside
                },
            }),
            _ => Err(ObekError::MalformedLabel {
                label: label.to_string(),
            }),
        }
    }

    pub fn is_begin(&self) -> bool {
        self.marker == Marker::Begin
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag, self.marker.as_char())
    }
}

/// Mapping between label tag characters, annotation markers and chunk types.
///
/// Built once and handed by reference to whatever needs it.
#[derive(Debug, Clone)]
pub struct TagTable {
    by_tag: HashMap<char, ChunkType>,
    tags: HashMap<ChunkType, char>,
    annotations: Vec<(String, ChunkType)>,
}

impl TagTable {
    /// Builds a table from `(tag, type)` pairs and `(annotation marker, type)`
    /// pairs.
    pub fn new(
        tags: impl IntoIterator<Item = (char, ChunkType)>,
        annotations: impl IntoIterator<Item = (String, ChunkType)>,
    ) -> Self {
        let by_tag: HashMap<char, ChunkType> = tags.into_iter().collect();
        let tags = by_tag.iter().map(|(tag, ty)| (*ty, *tag)).collect();
        Self {
            by_tag,
            tags,
            annotations: annotations.into_iter().collect(),
        }
    }

    /// Chunk type for a tag character.
    pub fn chunk_type(&self, tag: char) -> Option<ChunkType> {
        self.by_tag.get(&tag).copied()
    }

    /// Tag character for a chunk type.
    pub fn tag(&self, chunk_type: ChunkType) -> Option<char> {
        self.tags.get(&chunk_type).copied()
    }

    /// Label for a chunk type and marker.
    pub fn label(&self, chunk_type: ChunkType, marker: Marker) -> Option<Label> {
        self.tag(chunk_type).map(|tag| Label::new(tag, marker))
    }

    /// Annotation markers in lookup order.
    pub fn annotations(&self) -> &[(String, ChunkType)] {
        &self.annotations
    }

    /// Splits an annotated chunk such as `çay [Nesne]` into its words block
    /// and chunk type, using the first marker the text ends with.
    pub fn split_annotation<'a>(&self, chunk: &'a str) -> Option<(&'a str, ChunkType)> {
        let chunk = chunk.trim();
        self.annotations.iter().find_map(|(marker, ty)| {
            chunk
                .strip_suffix(marker.as_str())
                .map(|words| (words.trim_end(), *ty))
        })
    }
}

impl Default for TagTable {
    /// `S`/`O`/`A`/`V` tags with the Turkish annotation markers.
    fn default() -> Self {
        Self::new(
            [
                ('S', ChunkType::Subject),
                ('O', ChunkType::Object),
                ('A', ChunkType::Adjunct),
                ('V', ChunkType::Verb),
            ],
            [
                ("[Özne]".to_string(), ChunkType::Subject),
                ("[Nesne]".to_string(), ChunkType::Object),
                ("[Tümleç]".to_string(), ChunkType::Adjunct),
                ("[Yüklem]".to_string(), ChunkType::Verb),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        let table = TagTable::default();
        for ty in ChunkType::all_types() {
            let tag = table.tag(*ty).unwrap();
            assert_eq!(table.chunk_type(tag), Some(*ty));
        }
        assert_eq!(table.chunk_type('X'), None);
    }

    #[test]
    fn test_parse_label() {
        let label = Label::parse("SB").unwrap();
        assert_eq!(label.tag, 'S');
        assert!(label.is_begin());

        let label = Label::parse("OI").unwrap();
        assert!(!label.is_begin());
        assert_eq!(label.to_string(), "OI");
    }

    #[test]
    fn test_non_b_marker_continues() {
        assert_eq!(Label::parse("VX").unwrap().marker, Marker::Inside);
    }

    #[test]
    fn test_malformed_labels() {
        for bad in ["", "S", "SBI", "S-B"] {
            assert!(matches!(
                Label::parse(bad),
                Err(ObekError::MalformedLabel { .. })
            ));
        }
    }

    #[test]
    fn test_label_counts_characters() {
        let label = Label::parse("ÖB").unwrap();
        assert_eq!(label.tag, 'Ö');
    }

    #[test]
    fn test_label_for_type() {
        let table = TagTable::default();
        assert_eq!(
            table.label(ChunkType::Adjunct, Marker::Begin).unwrap().to_string(),
            "AB"
        );
    }

    #[test]
    fn test_split_annotation() {
        let table = TagTable::default();
        assert_eq!(
            table.split_annotation(" öğleden sonra [Tümleç] "),
            Some(("öğleden sonra", ChunkType::Adjunct))
        );
        assert_eq!(table.split_annotation("çay [Nesne"), None);
    }

    #[test]
    fn test_chunk_type_display() {
        assert_eq!(ChunkType::Subject.to_string(), "SUBJECT");
        assert_eq!(
            serde_json::to_string(&ChunkType::Verb).unwrap(),
            "\"VERB\""
        );
    }
}
