//! Forgiving loader for CRF++ template lines.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use tracing::warn;

use super::{Template, TemplateItem};
use crate::error::{ObekError, Result};

/// Problems found while loading a template file. None of them stop the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateDiagnostic {
    /// The line has no `id:` prefix; the whole line was read as the body.
    MissingId {
        /// 1-based line number.
        line: usize,
        /// Trimmed line content.
        content: String,
    },
    /// The id was already used by an earlier line. The template is kept.
    DuplicateId {
        /// 1-based line number.
        line: usize,
        /// The repeated identifier.
        id: String,
    },
    /// A token could not be parsed; the whole line was discarded.
    Discarded {
        /// 1-based line number.
        line: usize,
        /// Token after decoration stripping.
        token: String,
        /// Parser message.
        reason: String,
    },
}

impl TemplateDiagnostic {
    /// Line the diagnostic refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::MissingId { line, .. }
            | Self::DuplicateId { line, .. }
            | Self::Discarded { line, .. } => *line,
        }
    }
}

impl fmt::Display for TemplateDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId { line, content } => {
                write!(f, "line {line} does not contain ':' character: {content}")
            }
            Self::DuplicateId { line, id } => {
                write!(f, "template with id {id} has already been defined (line {line})")
            }
            Self::Discarded {
                line,
                token,
                reason,
            } => {
                let err = ObekError::TemplateParse {
                    line: *line,
                    token: token.clone(),
                    reason: reason.clone(),
                };
                write!(f, "{err}")
            }
        }
    }
}

/// Parses CRF++ template lines such as `U05:%x[-1,0]/%x[0,0]`.
pub struct TemplateParser {
    re_decoration: Regex,
}

impl TemplateParser {
    /// Creates a parser.
    ///
    /// # Errors
    ///
    /// Returns `ObekError::Regex` if the decoration pattern fails to compile
    /// (should never happen with the static pattern defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_decoration: Regex::new(r"[\[\]%x]+")?,
        })
    }

    /// Parses all lines, returning the valid templates in order and the
    /// diagnostics collected along the way.
    pub fn parse_lines<I, S>(&self, lines: I) -> (Vec<Template>, Vec<TemplateDiagnostic>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut templates = Vec::new();
        let mut diagnostics = Vec::new();
        let mut seen_ids = HashSet::new();

        for (idx, raw) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let line = raw.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, body) = match line.split_once(':') {
                Some((id, body)) => (Some(id.trim()), body),
                None => {
                    report(
                        &mut diagnostics,
                        TemplateDiagnostic::MissingId {
                            line: line_no,
                            content: line.to_string(),
                        },
                    );
                    (None, line)
                }
            };

            if let Some(id) = id {
                if !seen_ids.insert(id.to_string()) {
                    report(
                        &mut diagnostics,
                        TemplateDiagnostic::DuplicateId {
                            line: line_no,
                            id: id.to_string(),
                        },
                    );
                }
            }

            match self.parse_body(body, line_no) {
                Ok(items) => templates.push(Template {
                    id: id.map(str::to_string),
                    items,
                }),
                Err(diagnostic) => report(&mut diagnostics, diagnostic),
            }
        }

        (templates, diagnostics)
    }

    /// Strips decoration and parses the `/`-separated item list of one line.
    fn parse_body(
        &self,
        body: &str,
        line_no: usize,
    ) -> std::result::Result<Vec<TemplateItem>, TemplateDiagnostic> {
        let stripped = self.re_decoration.replace_all(body, "");
        stripped
            .split('/')
            .map(|token| {
                parse_item(token).map_err(|reason| TemplateDiagnostic::Discarded {
                    line: line_no,
                    token: token.trim().to_string(),
                    reason,
                })
            })
            .collect()
    }
}

/// Parses `<position>,<featureIndex>`.
fn parse_item(token: &str) -> std::result::Result<TemplateItem, String> {
    let (position, feature_index) = token
        .split_once(',')
        .ok_or_else(|| "expected <position>,<featureIndex>".to_string())?;
    let position = position
        .trim()
        .parse::<isize>()
        .map_err(|e| format!("position: {e}"))?;
    let feature_index = feature_index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("feature index: {e}"))?;
    Ok(TemplateItem::new(position, feature_index))
}

fn report(diagnostics: &mut Vec<TemplateDiagnostic>, diagnostic: TemplateDiagnostic) {
    warn!("{diagnostic}");
    diagnostics.push(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Vec<Template>, Vec<TemplateDiagnostic>) {
        TemplateParser::new().unwrap().parse_lines(text.lines())
    }

    #[test]
    fn parses_unigram_and_compound_templates() {
        let (templates, diagnostics) = parse("U00:%x[-2,0]\nU10:%x[-1,1]/%x[0,1]/%x[1,1]\n");
        assert!(diagnostics.is_empty());
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].id.as_deref(), Some("U00"));
        assert_eq!(templates[0].items, vec![TemplateItem::new(-2, 0)]);
        assert_eq!(
            templates[1].items,
            vec![
                TemplateItem::new(-1, 1),
                TemplateItem::new(0, 1),
                TemplateItem::new(1, 1)
            ]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let (templates, diagnostics) = parse("# Unigram\n\n   \nU00:%x[0,0]\n");
        assert_eq!(templates.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn whitespace_inside_pairs_is_trimmed() {
        let (templates, _) = parse("U00:%x[ -1 , 3 ]");
        assert_eq!(templates[0].items, vec![TemplateItem::new(-1, 3)]);
    }

    #[test]
    fn bad_token_discards_line_and_continues() {
        let (templates, diagnostics) = parse("U00:%x[0,0]\nU01:%x[a,0]/%x[0,1]\nU02:%x[1,0]\n");
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[1].id.as_deref(), Some("U02"));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            TemplateDiagnostic::Discarded { line: 2, token, .. } if token == "a,0"
        ));
    }

    #[test]
    fn negative_feature_index_is_rejected() {
        let (templates, diagnostics) = parse("U00:%x[0,-1]");
        assert!(templates.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn duplicate_id_is_reported_but_kept() {
        let (templates, diagnostics) = parse("U00:%x[0,0]\nU00:%x[1,0]\n");
        assert_eq!(templates.len(), 2);
        assert_eq!(
            diagnostics,
            vec![TemplateDiagnostic::DuplicateId {
                line: 2,
                id: "U00".into()
            }]
        );
    }

    #[test]
    fn missing_id_uses_whole_line() {
        let (templates, diagnostics) = parse("%x[0,2]/%x[1,2]");
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, None);
        assert_eq!(templates[0].items.len(), 2);
        assert!(matches!(diagnostics[0], TemplateDiagnostic::MissingId { line: 1, .. }));
    }

    #[test]
    fn bigram_marker_is_discarded() {
        let (templates, diagnostics) = parse("U00:%x[0,0]\nB\n");
        assert_eq!(templates.len(), 1);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].line(), 2);
    }

    #[test]
    fn diagnostic_display_mentions_line() {
        let (_, diagnostics) = parse("U01:%x[0;0]");
        assert!(diagnostics[0].to_string().contains("line 1"));
    }
}
