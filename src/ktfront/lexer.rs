//! Lexer for the Kotlin-like source language
//!
//! Turns source lines into an ordered token sequence. Recognizers are regexes tried in the
//! declaration order of [`TokenType`]; comment handling is a small explicit state machine
//! ([`CommentMode`]) that reclassifies tokens inside `//` and `/* */` comments.
//!
//! The raw sequence keeps every token, whitespace and comments included, with exact positions.
//! The parser only sees [`filter_significant`] output.

pub mod comment_mode;
pub mod lexer_impl;
pub mod recognizers;
pub mod source;
pub mod tokens;

pub use comment_mode::CommentMode;
pub use lexer_impl::{filter_significant, lex, tokenize, LexError, Lexer};
pub use source::{split_lines, SourceLine};
pub use tokens::{Token, TokenType};
