//! Table-driven predictive parser
//!
//! Two stacks drive the automaton. The symbol stack starts as `[$, start]`; the input stack holds
//! the significant tokens' terminals in reverse, with `$` at the bottom. On every step:
//!
//! - terminal on top: it must equal the next input terminal; both are popped
//! - nonterminal on top and input exhausted: the parse is accepted as it stands
//! - nonterminal on top otherwise: the table entry for `(top, lookahead)` is replaced by its
//!   right-hand side pushed in reverse (EPSILON pushes nothing) and the rule is appended to the
//!   derivation
//!
//! With [`ParserOptions::strict_end_of_input`] the exhausted-input shortcut is off: end of input
//! is looked up like any other terminal, so the stack has to drain down to `$`.
//!
//! A missing entry or a terminal mismatch is a [`SyntaxError`] at the current input token.

use super::derivation::{Derivation, DerivationStep};
use super::error::{ParseError, SyntaxError};
use super::input::{input_stack, GenericTerminals};
use crate::ktfront::grammar::{CompiledGrammar, SymbolId};
use crate::ktfront::lexer::{filter_significant, Token};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Treat end of input as an ordinary lookahead instead of accepting as soon as a
    /// nonterminal is on top and the input is exhausted
    pub strict_end_of_input: bool,
    pub generic_terminals: GenericTerminals,
}

/// Parser bound to a compiled grammar. Holds no per-parse state, so one value can serve any
/// number of parses.
#[derive(Debug, Clone)]
pub struct PredictiveParser<'g> {
    grammar: &'g CompiledGrammar,
    options: ParserOptions,
}

impl<'g> PredictiveParser<'g> {
    pub fn new(grammar: &'g CompiledGrammar) -> Self {
        Self::with_options(grammar, ParserOptions::default())
    }

    pub fn with_options(grammar: &'g CompiledGrammar, options: ParserOptions) -> Self {
        Self { grammar, options }
    }

    pub fn grammar(&self) -> &'g CompiledGrammar {
        self.grammar
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a token sequence. Auxiliary tokens are dropped first, so raw lexer output is fine.
    pub fn parse(&self, tokens: &[Token]) -> Result<Derivation, ParseError> {
        let grammar = self.grammar;
        let significant = filter_significant(tokens);
        let mut input = input_stack(grammar, &self.options.generic_terminals, &significant)?;
        let mut symbols = vec![SymbolId::END_OF_INPUT, grammar.start()];
        let mut derivation = Derivation::default();
        let mut consumed = 0;

        while let (Some(&top), Some(&(lookahead, _))) = (symbols.last(), input.last()) {
            if grammar.alphabet().is_terminal(top) {
                if top != lookahead {
                    let expected = vec![grammar.name(top).to_string()];
                    return Err(syntax_error(&significant, consumed, expected).into());
                }
                trace!(terminal = grammar.name(top), consumed, "match");
                symbols.pop();
                input.pop();
                if top != SymbolId::END_OF_INPUT {
                    consumed += 1;
                }
                continue;
            }

            if lookahead == SymbolId::END_OF_INPUT && !self.options.strict_end_of_input {
                debug!(pending = symbols.len() - 1, "accepting at end of input");
                break;
            }

            match grammar.lookup(top, lookahead) {
                Some(rule) => {
                    trace!(
                        rule = rule.number,
                        lookahead = grammar.name(lookahead),
                        "expand {}",
                        rule.production(grammar.alphabet())
                    );
                    symbols.pop();
                    symbols.extend(rule.expansion().rev());
                    derivation.steps.push(DerivationStep::from_rule(grammar, rule));
                }
                None => {
                    let expected = grammar.expected_terminals(top);
                    return Err(syntax_error(&significant, consumed, expected).into());
                }
            }
        }

        derivation.tokens_consumed = consumed;
        debug!(
            steps = derivation.len(),
            tokens = consumed,
            "parse accepted"
        );
        Ok(derivation)
    }
}

/// Parse with default options
pub fn parse(grammar: &CompiledGrammar, tokens: &[Token]) -> Result<Derivation, ParseError> {
    PredictiveParser::new(grammar).parse(tokens)
}

/// Error positioned at the first token not yet consumed, or just past the last one
fn syntax_error(tokens: &[Token], consumed: usize, expected: Vec<String>) -> SyntaxError {
    match tokens.get(consumed) {
        Some(token) => SyntaxError {
            found: Some(token.lexeme.clone()),
            line: token.line,
            column: token.column,
            expected,
        },
        None => {
            let (line, column) = tokens
                .last()
                .map(|last| (last.line, last.end_index + 1))
                .unwrap_or((1, 1));
            SyntaxError {
                found: None,
                line,
                column,
                expected,
            }
        }
    }
}
