//! Mapping lexer tokens onto grammar terminals

use super::error::ParseError;
use crate::ktfront::grammar::{CompiledGrammar, SymbolId};
use crate::ktfront::lexer::{Token, TokenType};
use serde::{Deserialize, Serialize};

/// Grammar terminals standing for whole token classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericTerminals {
    pub identifier: String,
    pub int_constant: String,
    pub double_constant: String,
    pub char_constant: String,
}

impl Default for GenericTerminals {
    fn default() -> Self {
        Self {
            identifier: "id".to_string(),
            int_constant: "intConst".to_string(),
            double_constant: "doubleConst".to_string(),
            char_constant: "charConst".to_string(),
        }
    }
}

impl GenericTerminals {
    /// Generic terminal name for a token type, if it has one
    pub fn name_for(&self, token_type: TokenType) -> Option<&str> {
        match token_type {
            TokenType::Identifier => Some(&self.identifier),
            TokenType::IntConstant => Some(&self.int_constant),
            TokenType::DoubleConstant => Some(&self.double_constant),
            TokenType::CharConstant => Some(&self.char_constant),
            _ => None,
        }
    }
}

/// Grammar terminal for a significant token.
///
/// A lexeme that names a terminal maps to it (keywords, punctuation, and identifiers in grammars
/// that spell them out); otherwise identifiers and literals map to their generic terminal.
pub fn terminal_for(
    grammar: &CompiledGrammar,
    generic: &GenericTerminals,
    token: &Token,
) -> Result<SymbolId, ParseError> {
    let named = grammar.symbol(&token.lexeme).filter(|id| {
        *id != SymbolId::EPSILON
            && *id != SymbolId::END_OF_INPUT
            && grammar.alphabet().is_terminal(*id)
    });
    if let Some(id) = named {
        return Ok(id);
    }

    generic
        .name_for(token.token_type)
        .and_then(|name| grammar.symbol(name))
        .filter(|id| grammar.alphabet().is_terminal(*id))
        .ok_or_else(|| ParseError::InternalConsistency {
            lexeme: token.lexeme.clone(),
            token_type: token.token_type,
            line: token.line,
            column: token.column,
        })
}

/// Input stack for one parse: terminals in reverse order with end of input at the bottom.
///
/// Each entry keeps the index of its token in the (filtered) token list.
pub fn input_stack(
    grammar: &CompiledGrammar,
    generic: &GenericTerminals,
    tokens: &[Token],
) -> Result<Vec<(SymbolId, Option<usize>)>, ParseError> {
    let mut stack = Vec::with_capacity(tokens.len() + 1);
    stack.push((SymbolId::END_OF_INPUT, None));
    for (index, token) in tokens.iter().enumerate().rev() {
        stack.push((terminal_for(grammar, generic, token)?, Some(index)));
    }
    Ok(stack)
}
