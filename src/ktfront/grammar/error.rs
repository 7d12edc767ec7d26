//! Grammar loading and compilation errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("line {line}: expected `->` after the left-hand side")]
    MissingArrow { line: usize },

    #[error("line {line}: more than one `->`")]
    UnexpectedArrow { line: usize },

    #[error("line {line}: missing left-hand side")]
    MissingLeftSide { line: usize },

    #[error("line {line}: left-hand side must be a single name, found {names:?}")]
    MultipleLeftSides { line: usize, names: Vec<String> },

    #[error("line {line}: left-hand side `{name}` is not a nonterminal")]
    NotNonterminal { line: usize, name: String },

    #[error("line {line}: empty alternative (use EPSILON for the empty production)")]
    EmptyAlternative { line: usize },

    #[error("line {line}: `{name}` is reserved")]
    ReservedName { line: usize, name: String },

    #[error("line {line}: unrecognized text {text:?}")]
    Unrecognized { line: usize, text: String },

    #[error("line {line}: nonterminal `{name}` is used but never defined")]
    UndefinedNonterminal { line: usize, name: String },

    #[error("grammar has no rules")]
    NoRules,

    #[error(
        "grammar is not LL(1): table entry ({nonterminal}, {lookahead}) claimed by rule {existing} and rule {replacement}"
    )]
    Conflict {
        nonterminal: String,
        lookahead: String,
        existing: usize,
        replacement: usize,
    },

    #[error("failed to read grammar {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GrammarError {
    /// Grammar file line the error refers to, when there is one
    pub fn line(&self) -> Option<usize> {
        match self {
            GrammarError::MissingArrow { line }
            | GrammarError::UnexpectedArrow { line }
            | GrammarError::MissingLeftSide { line }
            | GrammarError::MultipleLeftSides { line, .. }
            | GrammarError::NotNonterminal { line, .. }
            | GrammarError::EmptyAlternative { line }
            | GrammarError::ReservedName { line, .. }
            | GrammarError::Unrecognized { line, .. }
            | GrammarError::UndefinedNonterminal { line, .. } => Some(*line),
            GrammarError::NoRules | GrammarError::Conflict { .. } | GrammarError::Io { .. } => None,
        }
    }
}
