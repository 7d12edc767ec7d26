//! Shared fixtures for unit tests
//!
//! Tests should take grammars and sample programs from here rather than inlining them, so that
//! a grammar change only has to be reflected in one place.
//!
//! - [`KOTLIN_GRAMMAR`]: the bundled `grammar/kotlin.grammar`
//! - [`BALANCED_GRAMMAR`]: `S -> a S b | EPSILON`, small enough to reason about by hand
//! - [`COUNTER_SAMPLE`]: `samples/counter.kt`, a program exercising most of the language

use crate::ktfront::grammar::{CompiledGrammar, GrammarOptions};
use crate::ktfront::lexer::{lex, Token, TokenType};

pub const KOTLIN_GRAMMAR: &str = include_str!("../../grammar/kotlin.grammar");
pub const BALANCED_GRAMMAR: &str = "S -> a S b | EPSILON";
pub const COUNTER_SAMPLE: &str = include_str!("../../samples/counter.kt");
pub const MISSING_BRACE_SAMPLE: &str = include_str!("../../samples/missing_brace.kt");

pub fn kotlin_grammar() -> CompiledGrammar {
    CompiledGrammar::compile(KOTLIN_GRAMMAR, &GrammarOptions::default())
        .expect("bundled grammar compiles")
}

pub fn balanced_grammar() -> CompiledGrammar {
    CompiledGrammar::compile(BALANCED_GRAMMAR, &GrammarOptions::default())
        .expect("balanced grammar compiles")
}

/// Lex a snippet that is known to be lexically valid
pub fn tokens(source: &str) -> Vec<Token> {
    lex(source).expect("fixture source lexes")
}

pub fn token_types(tokens: &[Token]) -> Vec<TokenType> {
    tokens.iter().map(|token| token.token_type).collect()
}
