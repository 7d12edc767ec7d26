//! Grammar loader: grammar text to alphabet, rules and start symbol

use super::error::GrammarError;
use super::rule::Rule;
use super::symbol::{
    Alphabet, SymbolId, SymbolKind, END_OF_INPUT_KEYWORD, END_OF_INPUT_NAME, EPSILON_NAME,
};
use super::syntax::{is_ignorable, parse_line};
use std::collections::HashSet;
use tracing::debug;

/// Result of loading a grammar, before any set computation
#[derive(Debug, Clone)]
pub struct LoadedGrammar {
    pub alphabet: Alphabet,
    pub rules: Vec<Rule>,
    pub start: SymbolId,
}

pub struct GrammarLoader;

impl GrammarLoader {
    /// Load a grammar description.
    ///
    /// Every `|` alternative becomes its own rule, numbered from 0 in file order. The first
    /// left-hand side is the start symbol. Names are interned once, in first-seen order.
    pub fn load(text: &str) -> Result<LoadedGrammar, GrammarError> {
        let mut alphabet = Alphabet::new();
        let mut rules = Vec::new();
        let mut start = None;
        let mut defined = HashSet::new();
        let mut references: Vec<(SymbolId, usize)> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            if is_ignorable(raw) {
                continue;
            }
            let line = index + 1;
            let production = parse_line(line, raw)?;

            check_reserved(line, production.lhs)?;
            if production.lhs == EPSILON_NAME
                || SymbolKind::classify(production.lhs) != SymbolKind::Nonterminal
            {
                return Err(GrammarError::NotNonterminal {
                    line,
                    name: production.lhs.to_string(),
                });
            }
            let lhs = alphabet.intern(production.lhs);
            defined.insert(lhs);
            start.get_or_insert(lhs);

            for alternative in &production.alternatives {
                let mut rhs = Vec::with_capacity(alternative.len());
                for name in alternative {
                    check_reserved(line, name)?;
                    let symbol = alphabet.intern(name);
                    if alphabet.is_nonterminal(symbol) {
                        references.push((symbol, line));
                    }
                    rhs.push(symbol);
                }
                rules.push(Rule::new(rules.len(), lhs, rhs));
            }
        }

        let start = start.ok_or(GrammarError::NoRules)?;
        if let Some((symbol, line)) = references
            .iter()
            .find(|(symbol, _)| !defined.contains(symbol))
        {
            return Err(GrammarError::UndefinedNonterminal {
                line: *line,
                name: alphabet.name(*symbol).to_string(),
            });
        }

        debug!(
            symbols = alphabet.len(),
            rules = rules.len(),
            start = alphabet.name(start),
            "loaded grammar"
        );
        Ok(LoadedGrammar {
            alphabet,
            rules,
            start,
        })
    }
}

fn check_reserved(line: usize, name: &str) -> Result<(), GrammarError> {
    if name == END_OF_INPUT_KEYWORD || name == END_OF_INPUT_NAME {
        return Err(GrammarError::ReservedName {
            line,
            name: name.to_string(),
        });
    }
    Ok(())
}
