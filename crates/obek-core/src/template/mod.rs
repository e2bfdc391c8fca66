//! # Feature Templates
//!
//! CRF++ style feature templates. A template is a list of
//! `(relative position, feature index)` pairs; expanding it at a token joins
//! the referenced atomic features of the surrounding tokens into one composite
//! feature string.

pub mod expand;
pub mod parse;

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;

pub use parse::{TemplateDiagnostic, TemplateParser};

/// Default delimiter between the pieces of one composite feature.
pub const DEFAULT_COMPOUND_DELIMITER: &str = "/";

/// Value used for positions that fall outside the sentence.
pub const OUT_OF_RANGE: &str = "_";

/// One `(position, feature index)` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateItem {
    /// Offset from the current token; `0` is the token itself.
    pub position: isize,
    /// Column of the atomic feature row at that offset.
    pub feature_index: usize,
}

impl TemplateItem {
    /// Creates a new item.
    pub fn new(position: isize, feature_index: usize) -> Self {
        Self {
            position,
            feature_index,
        }
    }
}

impl fmt::Display for TemplateItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.position, self.feature_index)
    }
}

/// An ordered, non-empty list of items producing one composite feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Identifier from the template file (`U00`), if the line had one.
    pub id: Option<String>,
    /// Items in concatenation order.
    pub items: Vec<TemplateItem>,
}

impl Template {
    /// Creates an anonymous template.
    pub fn new(items: Vec<TemplateItem>) -> Self {
        Self { id: None, items }
    }

    /// Tags the template with a source identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A parsed template file: the templates in file order plus the load
/// diagnostics. Immutable once built, so it can be shared across workers.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: Vec<Template>,
    compound_delimiter: String,
    diagnostics: Vec<TemplateDiagnostic>,
}

impl TemplateSet {
    /// Builds a set from already parsed templates.
    pub fn new(templates: Vec<Template>) -> Self {
        Self {
            templates,
            compound_delimiter: DEFAULT_COMPOUND_DELIMITER.to_string(),
            diagnostics: Vec::new(),
        }
    }

    /// Parses CRF++ template text. Bad lines are skipped and reported through
    /// [`TemplateSet::diagnostics`]; this only fails if the internal pattern
    /// cannot be compiled.
    ///
    /// # Examples
    /// ```
    /// use obek_core::template::TemplateSet;
    ///
    /// let set = TemplateSet::parse("# unigrams\nU00:%x[-1,0]\nU01:%x[0,0]/%x[0,2]\n").unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert!(set.diagnostics().is_empty());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_lines(text.lines())
    }

    /// Parses template lines.
    pub fn parse_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parser = TemplateParser::new()?;
        let (templates, diagnostics) = parser.parse_lines(lines);
        Ok(Self {
            templates,
            compound_delimiter: DEFAULT_COMPOUND_DELIMITER.to_string(),
            diagnostics,
        })
    }

    /// Loads a CRF++ template file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let set = Self::parse(&text)?;
        info!(
            path = %path.display(),
            templates = set.len(),
            diagnostics = set.diagnostics.len(),
            "loaded feature templates"
        );
        Ok(set)
    }

    /// Overrides the compound feature delimiter.
    pub fn with_compound_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.compound_delimiter = delimiter.into();
        self
    }

    /// Delimiter between the pieces of one composite feature.
    pub fn compound_delimiter(&self) -> &str {
        &self.compound_delimiter
    }

    /// Templates in file order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Problems found while loading.
    pub fn diagnostics(&self) -> &[TemplateDiagnostic] {
        &self.diagnostics
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no template was loaded.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
