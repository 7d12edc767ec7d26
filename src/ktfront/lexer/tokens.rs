//! Token definitions for the ktfront lexer
//!
//! The variant order of [`TokenType`] is significant: the lexer tries recognizers in this
//! order and the first one that matches wins. Keywords therefore come before
//! [`TokenType::Identifier`], `==` before `=`, and the comment openers before `/` and `*`.
//! See [`recognizers`](super::recognizers) for the patterns themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// All token classifications produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenType {
    // Comment delimiters
    BlockCommentStart,
    BlockCommentEnd,
    LineComment,

    // Layout
    WhiteSpace,
    Tab,
    CarriageReturn,
    NewLine,

    // Punctuation
    OpenBrace,
    CloseBrace,
    OpeningCurlyBrace,
    ClosingCurlyBrace,
    Extends,
    Comma,
    Point,

    // Keywords
    Value,
    Variable,
    Function,
    Class,
    Public,
    Private,
    Return,
    If,
    Else,
    While,
    True,
    False,
    Null,

    // Built-in types
    ArrayInt,
    ArrayChar,
    Int,
    Char,
    Double,

    // Literals
    CharConstant,
    DoubleConstant,
    IntConstant,

    // Operators
    Plus,
    Minus,
    Multiply,
    Divide,
    EqualEqual,
    NotEqual,
    Equal,
    Greater,
    Less,

    Identifier,

    /// Anything swallowed by a line or block comment. Never matched directly.
    Comment,
}

impl TokenType {
    /// Whitespace, line breaks and everything comment related.
    ///
    /// Auxiliary tokens are kept in the raw token sequence (collaborators such as the symbol
    /// table builder see them) but are dropped before predictive parsing.
    pub fn is_auxiliary(&self) -> bool {
        matches!(
            self,
            TokenType::BlockCommentStart
                | TokenType::BlockCommentEnd
                | TokenType::LineComment
                | TokenType::Comment
                | TokenType::WhiteSpace
                | TokenType::Tab
                | TokenType::CarriageReturn
                | TokenType::NewLine
        )
    }

    /// Syntax relevant tokens, the complement of [`is_auxiliary`](Self::is_auxiliary)
    pub fn is_significant(&self) -> bool {
        !self.is_auxiliary()
    }

    /// Check if this token is one of the built-in type keywords
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenType::Int
                | TokenType::Char
                | TokenType::Double
                | TokenType::ArrayInt
                | TokenType::ArrayChar
        )
    }

    pub fn name(&self) -> &'static str {
        use TokenType::*;
        match self {
            BlockCommentStart => "BlockCommentStart",
            BlockCommentEnd => "BlockCommentEnd",
            LineComment => "LineComment",
            WhiteSpace => "WhiteSpace",
            Tab => "Tab",
            CarriageReturn => "CarriageReturn",
            NewLine => "NewLine",
            OpenBrace => "OpenBrace",
            CloseBrace => "CloseBrace",
            OpeningCurlyBrace => "OpeningCurlyBrace",
            ClosingCurlyBrace => "ClosingCurlyBrace",
            Extends => "Extends",
            Comma => "Comma",
            Point => "Point",
            Value => "Value",
            Variable => "Variable",
            Function => "Function",
            Class => "Class",
            Public => "Public",
            Private => "Private",
            Return => "Return",
            If => "If",
            Else => "Else",
            While => "While",
            True => "True",
            False => "False",
            Null => "Null",
            ArrayInt => "ArrayInt",
            ArrayChar => "ArrayChar",
            Int => "Int",
            Char => "Char",
            Double => "Double",
            CharConstant => "CharConstant",
            DoubleConstant => "DoubleConstant",
            IntConstant => "IntConstant",
            Plus => "Plus",
            Minus => "Minus",
            Multiply => "Multiply",
            Divide => "Divide",
            EqualEqual => "EqualEqual",
            NotEqual => "NotEqual",
            Equal => "Equal",
            Greater => "Greater",
            Less => "Less",
            Identifier => "Identifier",
            Comment => "Comment",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified lexeme with its position in the source.
///
/// `column` and `line` are 1-based. `end_index` is the 0-based exclusive end offset of the lexeme
/// within its line, which is also the 1-based column of its last character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub column: usize,
    pub line: usize,
    pub end_index: usize,
    pub lexeme: String,
    pub token_type: TokenType,
}

impl Token {
    pub fn new(
        column: usize,
        line: usize,
        end_index: usize,
        lexeme: impl Into<String>,
        token_type: TokenType,
    ) -> Self {
        Self {
            column,
            line,
            end_index,
            lexeme: lexeme.into(),
            token_type,
        }
    }

    /// `[column,line]`
    pub fn position(&self) -> String {
        format!("[{},{}]", self.column, self.line)
    }

    pub fn is_auxiliary(&self) -> bool {
        self.token_type.is_auxiliary()
    }

    pub fn is_significant(&self) -> bool {
        self.token_type.is_significant()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_significant() {
            write!(f, "{} {} '{}'", self.position(), self.token_type, self.lexeme)
        } else {
            write!(f, "{} {}", self.position(), self.token_type)
        }
    }
}
