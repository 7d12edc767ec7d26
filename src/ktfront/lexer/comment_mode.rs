//! Comment mode state machine
//!
//! The lexer is in exactly one [`CommentMode`] at any time. Every recognized token goes through
//! [`CommentMode::classify`], which decides the type that is actually emitted and the mode for
//! the next token:
//!
//! | mode          | recognized          | emitted             | next mode      |
//! |---------------|---------------------|---------------------|----------------|
//! | Code          | `LineComment`       | `LineComment`       | LineComment    |
//! | Code          | `BlockCommentStart` | `BlockCommentStart` | BlockComment   |
//! | Code          | anything else       | itself              | Code           |
//! | LineComment   | anything            | `Comment`           | LineComment    |
//! | BlockComment  | `BlockCommentEnd`   | `BlockCommentEnd`   | Code           |
//! | BlockComment  | anything else       | `Comment`           | BlockComment   |
//!
//! Line comments end with their line ([`CommentMode::at_line_start`]); block comments are sticky.

use super::tokens::TokenType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CommentMode {
    #[default]
    Code,
    LineComment,
    BlockComment,
}

impl CommentMode {
    /// Reclassify a recognized token and compute the following mode
    pub fn classify(self, recognized: TokenType) -> (TokenType, CommentMode) {
        match (self, recognized) {
            (CommentMode::Code, TokenType::LineComment) => {
                (TokenType::LineComment, CommentMode::LineComment)
            }
            (CommentMode::Code, TokenType::BlockCommentStart) => {
                (TokenType::BlockCommentStart, CommentMode::BlockComment)
            }
            (CommentMode::Code, other) => (other, CommentMode::Code),
            (CommentMode::LineComment, _) => (TokenType::Comment, CommentMode::LineComment),
            (CommentMode::BlockComment, TokenType::BlockCommentEnd) => {
                (TokenType::BlockCommentEnd, CommentMode::Code)
            }
            (CommentMode::BlockComment, _) => (TokenType::Comment, CommentMode::BlockComment),
        }
    }

    /// Mode in effect when a new line begins
    pub fn at_line_start(self) -> CommentMode {
        match self {
            CommentMode::LineComment => CommentMode::Code,
            other => other,
        }
    }

    pub fn in_comment(&self) -> bool {
        !matches!(self, CommentMode::Code)
    }
}
