//! Parse errors

use crate::ktfront::lexer::TokenType;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The token stream does not match the grammar.
///
/// `found` is the offending lexeme, or `None` when input ran out; in that case the position is
/// just past the last token. `expected` holds the sorted names of the terminals that would have
/// been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub found: Option<String>,
    pub line: usize,
    pub column: usize,
    pub expected: Vec<String>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error at line {}, column {}: ", self.line, self.column)?;
        match &self.found {
            Some(lexeme) => write!(f, "unexpected '{}'", lexeme)?,
            None => write!(f, "unexpected end of input")?,
        }
        if !self.expected.is_empty() {
            write!(f, ", expected {}", self.expected.join(" | "))?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Lexer and grammar vocabularies disagree. Not a problem with the input program.
    #[error("token '{lexeme}' ({token_type}) at line {line}, column {column} has no grammar terminal")]
    InternalConsistency {
        lexeme: String,
        token_type: TokenType,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            ParseError::Syntax(error) => (error.line, error.column),
            ParseError::InternalConsistency { line, column, .. } => (*line, *column),
        }
    }
}
