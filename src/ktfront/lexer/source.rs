//! Source lines as handed to the lexer

use serde::Serialize;

/// One physical line of source text with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Split source text on `\n`.
///
/// Lines are numbered from 1. Empty lines are kept so numbering matches the file, and a trailing
/// `\r` stays part of its line (it lexes as `CarriageReturn`). A final newline does not produce an
/// extra empty line.
pub fn split_lines(source: &str) -> Vec<SourceLine> {
    if source.is_empty() {
        return Vec::new();
    }
    let body = source.strip_suffix('\n').unwrap_or(source);
    body.split('\n')
        .enumerate()
        .map(|(index, text)| SourceLine::new(index + 1, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_from_one_and_keeps_blank_lines() {
        let lines = split_lines("a\n\nb");
        assert_eq!(
            lines,
            vec![
                SourceLine::new(1, "a"),
                SourceLine::new(2, ""),
                SourceLine::new(3, "b"),
            ]
        );
    }

    #[test]
    fn test_keeps_carriage_return() {
        let lines = split_lines("a\r\nb\r\n");
        assert_eq!(lines[0].text, "a\r");
        assert_eq!(lines[1].text, "b\r");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_empty_source() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n"), vec![SourceLine::new(1, "")]);
    }
}
