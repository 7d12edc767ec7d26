//! Grouping tokens by the class or function that owns them
//!
//! A `class Name` or `fun name(...)` header is held back until its opening `{`; that brace and
//! its matching `}` belong to the owner and, like the header, are left out of every partition.
//! Any other brace pair is an ordinary block and stays with the innermost owner. Tokens outside
//! every owner go to the top-level partition, which always comes first.

use crate::ktfront::lexer::{Token, TokenType};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OwnerKind {
    TopLevel,
    Class,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub owner: String,
    pub kind: OwnerKind,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    kind: OwnerKind,
    name: Option<String>,
    tokens: Vec<Token>,
}

/// Brace frames; `Owned` holds the index of the partition the brace opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Owned(usize),
    Block,
}

pub struct TokenPartitioner;

impl TokenPartitioner {
    pub fn partition(tokens: &[Token]) -> Vec<Partition> {
        let mut partitions = vec![Partition {
            owner: "<top-level>".to_string(),
            kind: OwnerKind::TopLevel,
            tokens: Vec::new(),
        }];
        let mut frames: Vec<Frame> = Vec::new();
        let mut header: Option<Header> = None;

        for token in tokens.iter().filter(|token| token.is_significant()) {
            let current = current_owner(&frames);

            if let Some(mut pending) = header.take() {
                match token.token_type {
                    TokenType::OpeningCurlyBrace => {
                        partitions.push(Partition {
                            owner: pending.name.unwrap_or_else(|| "<anonymous>".to_string()),
                            kind: pending.kind,
                            tokens: Vec::new(),
                        });
                        frames.push(Frame::Owned(partitions.len() - 1));
                    }
                    TokenType::ClosingCurlyBrace => {
                        // header never got a body; give its tokens back
                        partitions[current].tokens.append(&mut pending.tokens);
                        close(&mut frames, &mut partitions, current, token);
                    }
                    _ => {
                        if pending.name.is_none() && token.token_type == TokenType::Identifier {
                            pending.name = Some(token.lexeme.clone());
                        }
                        pending.tokens.push(token.clone());
                        header = Some(pending);
                    }
                }
                continue;
            }

            match token.token_type {
                TokenType::Class | TokenType::Function => {
                    let kind = if token.token_type == TokenType::Class {
                        OwnerKind::Class
                    } else {
                        OwnerKind::Function
                    };
                    header = Some(Header {
                        kind,
                        name: None,
                        tokens: vec![token.clone()],
                    });
                }
                TokenType::OpeningCurlyBrace => {
                    frames.push(Frame::Block);
                    partitions[current].tokens.push(token.clone());
                }
                TokenType::ClosingCurlyBrace => close(&mut frames, &mut partitions, current, token),
                _ => partitions[current].tokens.push(token.clone()),
            }
        }

        if let Some(mut pending) = header {
            let current = current_owner(&frames);
            partitions[current].tokens.append(&mut pending.tokens);
        }
        partitions
    }
}

fn current_owner(frames: &[Frame]) -> usize {
    frames
        .iter()
        .rev()
        .find_map(|frame| match frame {
            Frame::Owned(index) => Some(*index),
            Frame::Block => None,
        })
        .unwrap_or(0)
}

fn close(frames: &mut Vec<Frame>, partitions: &mut [Partition], current: usize, token: &Token) {
    match frames.pop() {
        Some(Frame::Owned(_)) => {}
        // a block brace, or a stray one with nothing to close
        Some(Frame::Block) | None => partitions[current].tokens.push(token.clone()),
    }
}

/// Owner line followed by its tokens, indented
pub fn render_partitions(partitions: &[Partition]) -> String {
    let mut out = String::new();
    for partition in partitions {
        let _ = writeln!(out, "{:?} {}", partition.kind, partition.owner);
        for token in &partition.tokens {
            let _ = writeln!(out, "  {}", token);
        }
    }
    out
}
