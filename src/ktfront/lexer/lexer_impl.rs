//! Line-by-line tokenizer
//!
//! Each line is scanned left to right. At every position the recognizers are tried in priority
//! order against the remainder of the line and the first match wins. The recognized type then
//! passes through the current [`CommentMode`], which may reclassify it as a comment token.

use super::comment_mode::CommentMode;
use super::recognizers::recognize;
use super::source::{split_lines, SourceLine};
use super::tokens::Token;
use thiserror::Error;
use tracing::{debug, trace};

/// Lexical errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("no token matches at line {line}, column {column}: {remainder:?}")]
    NoMatch {
        line: usize,
        column: usize,
        remainder: String,
    },
}

impl LexError {
    /// `(line, column)` of the failure
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexError::NoMatch { line, column, .. } => (*line, *column),
        }
    }
}

/// Stateful tokenizer. The comment mode survives between [`Lexer::tokenize`] calls, so a source
/// can be fed in several chunks of lines.
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    mode: CommentMode,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> CommentMode {
        self.mode
    }

    /// Back to [`CommentMode::Code`]
    pub fn reset(&mut self) {
        self.mode = CommentMode::Code;
    }

    /// Tokenize the given lines in order.
    ///
    /// On error nothing is returned for the lines already scanned, and the lexer keeps the mode
    /// it had reached; call [`reset`](Self::reset) before reusing it for unrelated input.
    pub fn tokenize(&mut self, lines: &[SourceLine]) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        for line in lines {
            self.tokenize_line(line, &mut tokens)?;
        }
        debug!(
            lines = lines.len(),
            tokens = tokens.len(),
            mode = ?self.mode,
            "tokenized source"
        );
        Ok(tokens)
    }

    fn tokenize_line(&mut self, line: &SourceLine, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        self.mode = self.mode.at_line_start();
        let text = line.text.as_str();
        let mut offset = 0;
        let mut column = 1;

        while offset < text.len() {
            let remainder = &text[offset..];
            let (recognized, lexeme) = recognize(remainder).ok_or_else(|| LexError::NoMatch {
                line: line.number,
                column,
                remainder: remainder.to_string(),
            })?;

            let (emitted, next_mode) = self.mode.classify(recognized);
            if next_mode != self.mode {
                trace!(line = line.number, column, from = ?self.mode, to = ?next_mode, "comment mode change");
            }
            self.mode = next_mode;

            let width = lexeme.chars().count();
            tokens.push(Token::new(
                column,
                line.number,
                column - 1 + width,
                lexeme,
                emitted,
            ));
            offset += lexeme.len();
            column += width;
        }
        Ok(())
    }
}

/// Tokenize lines with a fresh [`Lexer`]
pub fn tokenize(lines: &[SourceLine]) -> Result<Vec<Token>, LexError> {
    Lexer::new().tokenize(lines)
}

/// Split `source` into lines and tokenize them
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize(&split_lines(source))
}

/// Drop auxiliary tokens (whitespace, line breaks, comments), keeping the order of the rest
pub fn filter_significant(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|token| token.is_significant())
        .cloned()
        .collect()
}
