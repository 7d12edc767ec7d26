//! Predictive parsing table
//!
//! For every rule `A -> α`, each terminal `t` in FIRST(α) gets `table[(A, t)] = rule`; when α can
//! derive the empty string, every `t` in FOLLOW(A) does too. EPSILON itself is never a key.
//! Two different rules claiming the same key mean the grammar is not LL(1).

use super::error::GrammarError;
use super::rule::Rule;
use super::sets::{FirstSets, FollowSets};
use super::symbol::{Alphabet, SymbolId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What to do when two rules claim the same table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Fail compilation with [`GrammarError::Conflict`]
    #[default]
    Reject,
    /// Keep the later rule and log a warning
    LastWriteWins,
}

/// A table entry that was overwritten under [`ConflictPolicy::LastWriteWins`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overwrite {
    pub nonterminal: SymbolId,
    pub lookahead: SymbolId,
    pub existing: usize,
    pub replacement: usize,
}

/// `(nonterminal, lookahead terminal) -> rule number`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsingTable {
    entries: BTreeMap<(SymbolId, SymbolId), usize>,
    overwrites: Vec<Overwrite>,
}

impl ParsingTable {
    pub fn build(
        alphabet: &Alphabet,
        rules: &[Rule],
        first: &FirstSets,
        follow: &FollowSets,
        policy: ConflictPolicy,
    ) -> Result<Self, GrammarError> {
        let mut table = Self::default();
        for rule in rules {
            let first_of_rhs = first.of_sequence(&rule.rhs);
            for lookahead in first_of_rhs.iter().filter(|t| **t != SymbolId::EPSILON) {
                table.insert(alphabet, rule, *lookahead, policy)?;
            }
            if first_of_rhs.contains(&SymbolId::EPSILON) {
                for lookahead in follow.of(rule.lhs) {
                    table.insert(alphabet, rule, *lookahead, policy)?;
                }
            }
        }
        debug!(
            entries = table.entries.len(),
            overwrites = table.overwrites.len(),
            "built parsing table"
        );
        Ok(table)
    }

    fn insert(
        &mut self,
        alphabet: &Alphabet,
        rule: &Rule,
        lookahead: SymbolId,
        policy: ConflictPolicy,
    ) -> Result<(), GrammarError> {
        let key = (rule.lhs, lookahead);
        match self.entries.get(&key) {
            Some(existing) if *existing != rule.number => {
                let existing = *existing;
                match policy {
                    ConflictPolicy::Reject => {
                        return Err(GrammarError::Conflict {
                            nonterminal: alphabet.name(rule.lhs).to_string(),
                            lookahead: alphabet.name(lookahead).to_string(),
                            existing,
                            replacement: rule.number,
                        })
                    }
                    ConflictPolicy::LastWriteWins => {
                        warn!(
                            nonterminal = alphabet.name(rule.lhs),
                            lookahead = alphabet.name(lookahead),
                            existing,
                            replacement = rule.number,
                            "overwriting parsing table entry"
                        );
                        self.overwrites.push(Overwrite {
                            nonterminal: rule.lhs,
                            lookahead,
                            existing,
                            replacement: rule.number,
                        });
                    }
                }
            }
            _ => {}
        }
        self.entries.insert(key, rule.number);
        Ok(())
    }

    /// Rule number for `(nonterminal, lookahead)`
    pub fn get(&self, nonterminal: SymbolId, lookahead: SymbolId) -> Option<usize> {
        self.entries.get(&(nonterminal, lookahead)).copied()
    }

    pub fn contains(&self, nonterminal: SymbolId, lookahead: SymbolId) -> bool {
        self.entries.contains_key(&(nonterminal, lookahead))
    }

    /// Lookaheads with an entry for `nonterminal`, ordered by code
    pub fn lookaheads(&self, nonterminal: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        self.entries
            .range((nonterminal, SymbolId(0))..=(nonterminal, SymbolId(usize::MAX)))
            .map(|((_, lookahead), _)| *lookahead)
    }

    /// `((nonterminal, lookahead), rule number)` ordered by key
    pub fn iter(&self) -> impl Iterator<Item = ((SymbolId, SymbolId), usize)> + '_ {
        self.entries.iter().map(|(key, rule)| (*key, *rule))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn overwrites(&self) -> &[Overwrite] {
        &self.overwrites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ktfront::grammar::loader::GrammarLoader;
    use crate::ktfront::grammar::sets::FollowStrategy;

    fn build(text: &str, policy: ConflictPolicy) -> Result<(Alphabet, ParsingTable), GrammarError> {
        let grammar = GrammarLoader::load(text)?;
        let first = FirstSets::compute(&grammar.alphabet, &grammar.rules);
        let follow = FollowSets::compute(
            &grammar.alphabet,
            &grammar.rules,
            grammar.start,
            &first,
            FollowStrategy::FixedPoint,
        );
        let table = ParsingTable::build(&grammar.alphabet, &grammar.rules, &first, &follow, policy)?;
        Ok((grammar.alphabet, table))
    }

    #[test]
    fn test_balanced_grammar_table() {
        let (alphabet, table) = build("S -> a S b | EPSILON", ConflictPolicy::Reject).unwrap();
        let s = alphabet.lookup("S").unwrap();
        let a = alphabet.lookup("a").unwrap();
        let b = alphabet.lookup("b").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(s, a), Some(0));
        assert_eq!(table.get(s, b), Some(1));
        assert_eq!(table.get(s, SymbolId::END_OF_INPUT), Some(1));
        assert!(!table.contains(s, SymbolId::EPSILON));
        assert_eq!(
            table.lookaheads(s).collect::<Vec<_>>(),
            vec![SymbolId::END_OF_INPUT, a, b]
        );
    }

    #[test]
    fn test_conflict_is_rejected() {
        let err = build("S -> a b | a c", ConflictPolicy::Reject).unwrap_err();
        match err {
            GrammarError::Conflict {
                nonterminal,
                lookahead,
                existing,
                replacement,
            } => {
                assert_eq!(nonterminal, "S");
                assert_eq!(lookahead, "a");
                assert_eq!((existing, replacement), (0, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_last_write_wins_keeps_later_rule() {
        let (alphabet, table) = build("S -> a b | a c", ConflictPolicy::LastWriteWins).unwrap();
        let s = alphabet.lookup("S").unwrap();
        let a = alphabet.lookup("a").unwrap();
        assert_eq!(table.get(s, a), Some(1));
        assert_eq!(table.overwrites().len(), 1);
        assert_eq!(table.overwrites()[0].existing, 0);
    }

    #[test]
    fn test_left_recursion_is_a_conflict() {
        assert!(matches!(
            build("E -> E + t | t", ConflictPolicy::Reject),
            Err(GrammarError::Conflict { .. })
        ));
    }
}
