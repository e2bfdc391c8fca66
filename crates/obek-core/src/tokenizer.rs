//! # Sentence Tokenizer
//!
//! Splits raw Turkish sentences into tokens for feature extraction.
//! Whitespace separates words; punctuation becomes tokens of its own.
//! Apostrophes stay inside words (`Ankara'da`) and so do dots followed by
//! more word characters (`3.5`, `T.C`).

/// A token extracted from a sentence with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text content
    pub text: String,
    /// Start byte offset in the original string
    pub start: usize,
    /// End byte offset in the original string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

/// Characters emitted as standalone tokens.
pub const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '"'];

/// Whitespace and punctuation tokenizer.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Tokenize a sentence.
    ///
    /// # Examples
    /// ```
    /// use obek_core::tokenizer::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("Ahmet, Ankara'ya 3.5 saatte gitti.");
    /// let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, ["Ahmet", ",", "Ankara'ya", "3.5", "saatte", "gitti", "."]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word_start: Option<usize> = None;
        let mut chars = input.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if c.is_whitespace() {
                if let Some(start) = word_start.take() {
                    push(&mut tokens, input, start, idx);
                }
                continue;
            }

            if PUNCTUATION.contains(&c) {
                // A dot between word characters belongs to the word.
                let inner_dot = c == '.'
                    && word_start.is_some()
                    && chars
                        .peek()
                        .is_some_and(|&(_, next)| !next.is_whitespace() && !PUNCTUATION.contains(&next));
                if inner_dot {
                    continue;
                }
                if let Some(start) = word_start.take() {
                    push(&mut tokens, input, start, idx);
                }
                push(&mut tokens, input, idx, idx + c.len_utf8());
                continue;
            }

            if word_start.is_none() {
                word_start = Some(idx);
            }
        }

        if let Some(start) = word_start {
            push(&mut tokens, input, start, input.len());
        }

        tokens
    }

    /// Tokenize and keep only the token texts.
    pub fn words(&self, input: &str) -> Vec<String> {
        self.tokenize(input).into_iter().map(|t| t.text).collect()
    }

    /// Get the original byte span covered by a range of tokens.
    pub fn get_spans(
        &self,
        tokens: &[Token],
        start_idx: usize,
        end_idx: usize,
    ) -> Option<(usize, usize)> {
        if start_idx >= tokens.len() || end_idx > tokens.len() || start_idx >= end_idx {
            return None;
        }

        let start = tokens[start_idx].start;
        let end = tokens[end_idx - 1].end;
        Some((start, end))
    }
}

fn push(tokens: &mut Vec<Token>, input: &str, start: usize, end: usize) {
    let index = tokens.len();
    tokens.push(Token {
        text: input[start..end].to_string(),
        start,
        end,
        index,
    });
}

/// Whether the token consists only of punctuation characters.
pub fn is_punctuation(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| PUNCTUATION.contains(&c))
}
