//! Grammar file syntax
//!
//! One production per line:
//!
//! ```text
//! # comment
//! Expr -> Arith Comparison
//! Comparison -> RelOp Arith | EPSILON
//! ```
//!
//! Names are separated by whitespace and may contain any other character except `|`, so
//! punctuation terminals such as `(`, `==` or `Array<Int>` are written as-is.

use super::error::GrammarError;
use logos::Logos;

/// Tokens of a single grammar line
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum GrammarToken<'a> {
    #[token("->")]
    Arrow,

    #[token("|")]
    Pipe,

    #[regex(r"[^ \t\r\f\n|]+", |lex| lex.slice())]
    Name(&'a str),
}

/// `lhs -> alt1 | alt2 | ...` as written on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionLine<'a> {
    pub line: usize,
    pub lhs: &'a str,
    pub alternatives: Vec<Vec<&'a str>>,
}

/// True for lines that carry no production
pub fn is_ignorable(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse one non-ignorable grammar line
pub fn parse_line(line: usize, text: &str) -> Result<ProductionLine<'_>, GrammarError> {
    let mut tokens = Vec::new();
    let mut lexer = GrammarToken::lexer(text);
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(GrammarError::Unrecognized {
                    line,
                    text: lexer.slice().to_string(),
                })
            }
        }
    }

    let arrows: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| **token == GrammarToken::Arrow)
        .map(|(index, _)| index)
        .collect();
    let arrow = match arrows.as_slice() {
        [] => return Err(GrammarError::MissingArrow { line }),
        [arrow] => *arrow,
        _ => return Err(GrammarError::UnexpectedArrow { line }),
    };

    let lhs = match &tokens[..arrow] {
        [] => return Err(GrammarError::MissingLeftSide { line }),
        [GrammarToken::Name(name)] => *name,
        others => {
            return Err(GrammarError::MultipleLeftSides {
                line,
                names: others.iter().map(token_text).collect(),
            })
        }
    };

    let mut alternatives = vec![Vec::new()];
    for token in &tokens[arrow + 1..] {
        match token {
            GrammarToken::Name(name) => {
                if let Some(current) = alternatives.last_mut() {
                    current.push(*name);
                }
            }
            GrammarToken::Pipe => alternatives.push(Vec::new()),
            GrammarToken::Arrow => return Err(GrammarError::UnexpectedArrow { line }),
        }
    }
    if alternatives.iter().any(|alternative| alternative.is_empty()) {
        return Err(GrammarError::EmptyAlternative { line });
    }

    Ok(ProductionLine {
        line,
        lhs,
        alternatives,
    })
}

fn token_text(token: &GrammarToken<'_>) -> String {
    match token {
        GrammarToken::Arrow => "->".to_string(),
        GrammarToken::Pipe => "|".to_string(),
        GrammarToken::Name(name) => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        let tokens: Vec<_> = GrammarToken::lexer("A -> ( b ) | EPSILON")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                GrammarToken::Name("A"),
                GrammarToken::Arrow,
                GrammarToken::Name("("),
                GrammarToken::Name("b"),
                GrammarToken::Name(")"),
                GrammarToken::Pipe,
                GrammarToken::Name("EPSILON"),
            ]
        );
    }

    #[test]
    fn test_parse_alternatives() {
        let production = parse_line(3, "RelOp -> == | != | Array<Int>").unwrap();
        assert_eq!(production.line, 3);
        assert_eq!(production.lhs, "RelOp");
        assert_eq!(
            production.alternatives,
            vec![vec!["=="], vec!["!="], vec!["Array<Int>"]]
        );
    }

    #[test]
    fn test_missing_arrow() {
        assert!(matches!(
            parse_line(1, "A a b"),
            Err(GrammarError::MissingArrow { line: 1 })
        ));
    }

    #[test]
    fn test_left_side_errors() {
        assert!(matches!(
            parse_line(2, "-> a"),
            Err(GrammarError::MissingLeftSide { line: 2 })
        ));
        assert!(matches!(
            parse_line(2, "A B -> a"),
            Err(GrammarError::MultipleLeftSides { line: 2, .. })
        ));
        assert!(matches!(
            parse_line(2, "A -> a -> b"),
            Err(GrammarError::UnexpectedArrow { line: 2 })
        ));
    }

    #[test]
    fn test_empty_alternatives() {
        for text in ["A -> a | | b", "A -> a |", "A ->", "A -> | a"] {
            assert!(
                matches!(parse_line(5, text), Err(GrammarError::EmptyAlternative { line: 5 })),
                "{text}"
            );
        }
    }

    #[test]
    fn test_ignorable_lines() {
        assert!(is_ignorable(""));
        assert!(is_ignorable("   "));
        assert!(is_ignorable("  # note"));
        assert!(!is_ignorable("A -> a"));
    }
}
