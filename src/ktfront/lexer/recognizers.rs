//! Regex recognizers for every token type
//!
//! Recognizers are tried in declaration order against the *whole remainder* of the current line.
//! Each pattern carries one capture group holding the lexeme; the compiled form anchors it at the
//! start of the remainder and lets `.*` absorb the rest, so a recognizer matches iff the remainder
//! starts with its lexeme. The first recognizer that matches wins, which is how keywords beat
//! identifiers and `==` beats `=`.
//!
//! `Comment` has no recognizer: comment tokens only come out of comment-mode reclassification.

use super::tokens::TokenType;
use once_cell::sync::Lazy;
use regex::Regex;

/// Token patterns, in priority order. Order matters, see module docs.
pub const TOKEN_PATTERNS: &[(TokenType, &str)] = &[
    (TokenType::BlockCommentStart, r"(/\*)"),
    (TokenType::BlockCommentEnd, r"(\*?\*/)"),
    (TokenType::LineComment, r"(//)"),
    (TokenType::WhiteSpace, r"( )"),
    (TokenType::Tab, r"(\t)"),
    (TokenType::CarriageReturn, r"(\r)"),
    (TokenType::NewLine, r"(\n)"),
    (TokenType::OpenBrace, r"(\()"),
    (TokenType::CloseBrace, r"(\))"),
    (TokenType::OpeningCurlyBrace, r"(\{)"),
    (TokenType::ClosingCurlyBrace, r"(\})"),
    (TokenType::Extends, r"(:)"),
    (TokenType::Comma, r"(,)"),
    (TokenType::Point, r"(\.)"),
    (TokenType::Value, r"\b(val)\b"),
    (TokenType::Variable, r"\b(var)\b"),
    (TokenType::Function, r"\b(fun)\b"),
    (TokenType::Class, r"\b(class)\b"),
    (TokenType::Public, r"\b(public)\b"),
    (TokenType::Private, r"\b(private)\b"),
    (TokenType::Return, r"\b(return)\b"),
    (TokenType::If, r"\b(if)\b"),
    (TokenType::Else, r"\b(else)\b"),
    (TokenType::While, r"\b(while)\b"),
    (TokenType::True, r"\b(true)\b"),
    (TokenType::False, r"\b(false)\b"),
    (TokenType::Null, r"\b(null)\b"),
    (TokenType::ArrayInt, r"\b(Array<Int>)"),
    (TokenType::ArrayChar, r"\b(Array<Char>)"),
    (TokenType::Int, r"\b(Int)\b"),
    (TokenType::Char, r"\b(Char)\b"),
    (TokenType::Double, r"\b(Double)\b"),
    (TokenType::CharConstant, r"('[a-zA-Z]')"),
    (TokenType::DoubleConstant, r"\b(\d{1,9}\.\d{1,9})\b"),
    (TokenType::IntConstant, r"\b(\d{1,9})\b"),
    (TokenType::Plus, r"(\+)"),
    (TokenType::Minus, r"(-)"),
    (TokenType::Multiply, r"(\*)"),
    (TokenType::Divide, r"(/)"),
    (TokenType::EqualEqual, r"(==)"),
    (TokenType::NotEqual, r"(!=)"),
    (TokenType::Equal, r"(=)"),
    (TokenType::Greater, r"(>)"),
    (TokenType::Less, r"(<)"),
    (TokenType::Identifier, r"\b([a-zA-Z][0-9a-zA-Z_]{0,31})\b"),
];

/// A compiled token pattern
#[derive(Debug)]
pub struct Recognizer {
    pub token_type: TokenType,
    regex: Regex,
}

impl Recognizer {
    fn compile(token_type: TokenType, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"(?s)\A{}.*\z", pattern))?;
        Ok(Self { token_type, regex })
    }

    /// Returns the lexeme if the remainder starts with this token
    pub fn recognize<'a>(&self, remainder: &'a str) -> Option<&'a str> {
        self.regex
            .captures(remainder)
            .and_then(|caps| caps.get(1))
            .map(|lexeme| lexeme.as_str())
            .filter(|lexeme| !lexeme.is_empty())
    }
}

static RECOGNIZERS: Lazy<Vec<Recognizer>> = Lazy::new(|| {
    TOKEN_PATTERNS
        .iter()
        .map(|(token_type, pattern)| {
            Recognizer::compile(*token_type, pattern).expect("token patterns are valid regexes")
        })
        .collect()
});

/// All recognizers in priority order
pub fn recognizers() -> &'static [Recognizer] {
    &RECOGNIZERS
}

/// Classify the start of `remainder`, first match in declaration order wins
pub fn recognize(remainder: &str) -> Option<(TokenType, &str)> {
    recognizers().iter().find_map(|recognizer| {
        recognizer
            .recognize(remainder)
            .map(|lexeme| (recognizer.token_type, lexeme))
    })
}
