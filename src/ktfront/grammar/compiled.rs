//! The compiled grammar bundle shared by every parse

use super::error::GrammarError;
use super::loader::GrammarLoader;
use super::rule::Rule;
use super::sets::{FirstSets, FollowSets, FollowStrategy, TerminalSet};
use super::symbol::{Alphabet, Symbol, SymbolId};
use super::table::{ConflictPolicy, ParsingTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Options that influence grammar compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrammarOptions {
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    #[serde(default)]
    pub follow_strategy: FollowStrategy,
}

/// Alphabet, rules, FIRST/FOLLOW and parsing table, built once and never mutated.
///
/// Share it by reference (or `Arc`) across any number of parsers.
#[derive(Debug, Clone)]
pub struct CompiledGrammar {
    alphabet: Alphabet,
    rules: Vec<Rule>,
    start: SymbolId,
    first: FirstSets,
    follow: FollowSets,
    table: ParsingTable,
}

impl CompiledGrammar {
    pub fn compile(text: &str, options: &GrammarOptions) -> Result<Self, GrammarError> {
        let loaded = GrammarLoader::load(text)?;
        let first = FirstSets::compute(&loaded.alphabet, &loaded.rules);
        let follow = FollowSets::compute(
            &loaded.alphabet,
            &loaded.rules,
            loaded.start,
            &first,
            options.follow_strategy,
        );
        let table = ParsingTable::build(
            &loaded.alphabet,
            &loaded.rules,
            &first,
            &follow,
            options.conflict_policy,
        )?;
        Ok(Self {
            alphabet: loaded.alphabet,
            rules: loaded.rules,
            start: loaded.start,
            first,
            follow,
            table,
        })
    }

    pub fn from_file(path: impl AsRef<Path>, options: &GrammarOptions) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grammar = Self::compile(&text, options)?;
        info!(path = %path.display(), rules = grammar.rules.len(), "compiled grammar");
        Ok(grammar)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, number: usize) -> Option<&Rule> {
        self.rules.get(number)
    }

    pub fn start(&self) -> SymbolId {
        self.start
    }

    pub fn table(&self) -> &ParsingTable {
        &self.table
    }

    /// Symbol code for a name
    pub fn symbol(&self, name: &str) -> Option<SymbolId> {
        self.alphabet.lookup(name)
    }

    pub fn symbol_info(&self, id: SymbolId) -> &Symbol {
        self.alphabet.get(id)
    }

    pub fn name(&self, id: SymbolId) -> &str {
        self.alphabet.name(id)
    }

    pub fn first_of(&self, id: SymbolId) -> &TerminalSet {
        self.first.of(id)
    }

    pub fn follow_of(&self, id: SymbolId) -> &TerminalSet {
        self.follow.of(id)
    }

    pub fn first_of_sequence(&self, sequence: &[SymbolId]) -> TerminalSet {
        self.first.of_sequence(sequence)
    }

    pub fn first_sets(&self) -> &FirstSets {
        &self.first
    }

    pub fn follow_sets(&self) -> &FollowSets {
        &self.follow
    }

    /// Rule predicted for `nonterminal` on `lookahead`
    pub fn lookup(&self, nonterminal: SymbolId, lookahead: SymbolId) -> Option<&Rule> {
        self.table
            .get(nonterminal, lookahead)
            .and_then(|number| self.rules.get(number))
    }

    pub fn rules_for(&self, nonterminal: SymbolId) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |rule| rule.lhs == nonterminal)
    }

    /// Terminal names with a table entry for `nonterminal`, sorted
    pub fn expected_terminals(&self, nonterminal: SymbolId) -> Vec<String> {
        let mut names: Vec<String> = self
            .table
            .lookaheads(nonterminal)
            .map(|id| self.name(id).to_string())
            .collect();
        names.sort();
        names
    }

    fn render_set(&self, set: &TerminalSet) -> String {
        let names: Vec<&str> = set.iter().map(|id| self.name(*id)).collect();
        format!("{{{}}}", names.join(", "))
    }

    /// Numbered rule listing
    pub fn render_rules(&self) -> String {
        self.rules
            .iter()
            .map(|rule| rule.render(&self.alphabet))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// FIRST and FOLLOW of every nonterminal, in alphabet order
    pub fn render_sets(&self) -> String {
        let mut out = String::new();
        for symbol in self.alphabet.nonterminals() {
            out.push_str(&format!(
                "FIRST({}) = {}\n",
                symbol.name,
                self.render_set(self.first_of(symbol.id))
            ));
        }
        for symbol in self.alphabet.nonterminals() {
            out.push_str(&format!(
                "FOLLOW({}) = {}\n",
                symbol.name,
                self.render_set(self.follow_of(symbol.id))
            ));
        }
        out
    }

    /// One `(A, t) => rule` line per table entry
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        for ((nonterminal, lookahead), number) in self.table.iter() {
            let production = self
                .rules
                .get(number)
                .map(|rule| rule.render(&self.alphabet))
                .unwrap_or_default();
            out.push_str(&format!(
                "({}, {}) => {}\n",
                self.name(nonterminal),
                self.name(lookahead),
                production
            ));
        }
        out
    }
}
