//! FIRST and FOLLOW sets
//!
//! FIRST is computed by iterating every rule to a fixed point, so it terminates on any grammar
//! (left-recursive ones included; those fail later when the table is built).
//!
//! FOLLOW has two strategies:
//! - [`FollowStrategy::FixedPoint`] computes the least fixed point of the usual equations.
//! - [`FollowStrategy::GuardedRecursion`] walks `FOLLOW(B) ⊆ FOLLOW(A)` dependencies
//!   recursively and cuts cycles with a visited marker per (caller, callee) pair. A cut edge
//!   contributes whatever the callee had at that moment, so on heavily cyclic grammars this
//!   strategy can return a subset of the fixed point.
//!
//! For example, in
//!
//! ```text
//! S -> b A B | b
//! A -> S b C | C c
//! B -> a a A
//! C -> b S
//! ```
//!
//! the walk that starts at `S` marks the pair `(A, B)` and copies `FOLLOW(B) = {$, b}` into
//! `FOLLOW(A)`. `c` reaches `FOLLOW(B)` later, and the top-level visit of `A` may not follow the
//! marked pair again. The guarded `FOLLOW(A)` is `{$, b, a}`; the fixed point adds `c`.

use super::rule::Rule;
use super::symbol::{Alphabet, SymbolId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Set of terminal codes, ordered by code
pub type TerminalSet = BTreeSet<SymbolId>;

/// How FOLLOW sets are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FollowStrategy {
    #[default]
    FixedPoint,
    GuardedRecursion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: Vec<TerminalSet>,
}

impl FirstSets {
    pub fn compute(alphabet: &Alphabet, rules: &[Rule]) -> Self {
        let sets = alphabet
            .iter()
            .map(|symbol| {
                if symbol.is_terminal() {
                    TerminalSet::from([symbol.id])
                } else {
                    TerminalSet::new()
                }
            })
            .collect();
        let mut first = Self { sets };

        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut changed = false;
            for rule in rules {
                let contribution = first.of_sequence(&rule.rhs);
                let target = &mut first.sets[rule.lhs.code()];
                let before = target.len();
                target.extend(contribution);
                changed |= target.len() != before;
            }
            if !changed {
                break;
            }
        }
        debug!(rounds, "FIRST sets reached fixed point");
        first
    }

    pub fn of(&self, symbol: SymbolId) -> &TerminalSet {
        &self.sets[symbol.code()]
    }

    /// FIRST of a symbol sequence. The empty sequence yields `{EPSILON}`.
    pub fn of_sequence(&self, sequence: &[SymbolId]) -> TerminalSet {
        let mut result = TerminalSet::new();
        for symbol in sequence {
            let first = self.of(*symbol);
            result.extend(first.iter().filter(|t| **t != SymbolId::EPSILON));
            if !first.contains(&SymbolId::EPSILON) {
                return result;
            }
        }
        result.insert(SymbolId::EPSILON);
        result
    }

    pub fn derives_empty(&self, symbol: SymbolId) -> bool {
        self.of(symbol).contains(&SymbolId::EPSILON)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: Vec<TerminalSet>,
}

impl FollowSets {
    pub fn compute(
        alphabet: &Alphabet,
        rules: &[Rule],
        start: SymbolId,
        first: &FirstSets,
        strategy: FollowStrategy,
    ) -> Self {
        let mut sets = vec![TerminalSet::new(); alphabet.len()];
        sets[start.code()].insert(SymbolId::END_OF_INPUT);

        let sets = match strategy {
            FollowStrategy::FixedPoint => fixed_point(alphabet, rules, first, sets),
            FollowStrategy::GuardedRecursion => {
                let mut walk = GuardedWalk {
                    alphabet,
                    rules,
                    first,
                    follow: sets,
                    visited: HashSet::new(),
                };
                for symbol in alphabet.nonterminals() {
                    walk.visit(symbol.id, None);
                }
                walk.follow
            }
        };
        debug!(?strategy, "FOLLOW sets computed");
        Self { sets }
    }

    /// FOLLOW of a nonterminal; empty for terminals
    pub fn of(&self, symbol: SymbolId) -> &TerminalSet {
        &self.sets[symbol.code()]
    }

    pub fn is_subset_of(&self, other: &FollowSets) -> bool {
        self.sets
            .iter()
            .zip(&other.sets)
            .all(|(mine, theirs)| mine.is_subset(theirs))
    }
}

fn fixed_point(
    alphabet: &Alphabet,
    rules: &[Rule],
    first: &FirstSets,
    mut sets: Vec<TerminalSet>,
) -> Vec<TerminalSet> {
    loop {
        let mut changed = false;
        for rule in rules {
            for (index, symbol) in rule.rhs.iter().enumerate() {
                if !alphabet.is_nonterminal(*symbol) {
                    continue;
                }
                let trailing = first.of_sequence(&rule.rhs[index + 1..]);
                let mut contribution: TerminalSet = trailing
                    .iter()
                    .copied()
                    .filter(|t| *t != SymbolId::EPSILON)
                    .collect();
                if trailing.contains(&SymbolId::EPSILON) {
                    contribution.extend(sets[rule.lhs.code()].iter().copied());
                }
                let target = &mut sets[symbol.code()];
                let before = target.len();
                target.extend(contribution);
                changed |= target.len() != before;
            }
        }
        if !changed {
            return sets;
        }
    }
}

struct GuardedWalk<'a> {
    alphabet: &'a Alphabet,
    rules: &'a [Rule],
    first: &'a FirstSets,
    follow: Vec<TerminalSet>,
    visited: HashSet<(SymbolId, SymbolId)>,
}

impl GuardedWalk<'_> {
    /// Accumulate FOLLOW(symbol). `caller` is the nonterminal whose FOLLOW asked for it.
    fn visit(&mut self, symbol: SymbolId, caller: Option<SymbolId>) {
        if let Some(caller) = caller {
            if !self.visited.insert((caller, symbol)) {
                return;
            }
        }
        let rules = self.rules;
        for rule in rules {
            for (index, occurrence) in rule.rhs.iter().enumerate() {
                if *occurrence != symbol || !self.alphabet.is_nonterminal(symbol) {
                    continue;
                }
                let trailing = self.first.of_sequence(&rule.rhs[index + 1..]);
                self.follow[symbol.code()].extend(
                    trailing
                        .iter()
                        .copied()
                        .filter(|t| *t != SymbolId::EPSILON),
                );
                if trailing.contains(&SymbolId::EPSILON) {
                    self.visit(rule.lhs, Some(symbol));
                    let inherited = self.follow[rule.lhs.code()].clone();
                    self.follow[symbol.code()].extend(inherited);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ktfront::grammar::loader::GrammarLoader;

    fn names(alphabet: &Alphabet, set: &TerminalSet) -> Vec<String> {
        set.iter().map(|id| alphabet.name(*id).to_string()).collect()
    }

    #[test]
    fn test_balanced_grammar_sets() {
        let grammar = GrammarLoader::load("S -> a S b | EPSILON").unwrap();
        let first = FirstSets::compute(&grammar.alphabet, &grammar.rules);
        let follow = FollowSets::compute(
            &grammar.alphabet,
            &grammar.rules,
            grammar.start,
            &first,
            FollowStrategy::FixedPoint,
        );
        assert_eq!(names(&grammar.alphabet, first.of(grammar.start)), ["EPSILON", "a"]);
        assert_eq!(names(&grammar.alphabet, follow.of(grammar.start)), ["$", "b"]);
    }

    #[test]
    fn test_first_of_sequence_skips_nullable_prefix() {
        let grammar = GrammarLoader::load("S -> A B c\nA -> a | EPSILON\nB -> b | EPSILON").unwrap();
        let first = FirstSets::compute(&grammar.alphabet, &grammar.rules);
        let s = grammar.alphabet.lookup("S").unwrap();
        // ordered by code, and `c` is seen before `a` and `b`
        assert_eq!(names(&grammar.alphabet, first.of(s)), ["c", "a", "b"]);
        assert!(!first.derives_empty(s));

        let a = grammar.alphabet.lookup("A").unwrap();
        let b = grammar.alphabet.lookup("B").unwrap();
        assert_eq!(
            names(&grammar.alphabet, &first.of_sequence(&[a, b])),
            ["EPSILON", "a", "b"]
        );
        assert_eq!(
            names(&grammar.alphabet, &first.of_sequence(&[])),
            ["EPSILON"]
        );
    }

    #[test]
    fn test_left_recursion_terminates() {
        let grammar = GrammarLoader::load("E -> E + t | t").unwrap();
        let first = FirstSets::compute(&grammar.alphabet, &grammar.rules);
        assert_eq!(names(&grammar.alphabet, first.of(grammar.start)), ["t"]);
    }

    #[test]
    fn test_follow_propagates_through_nullable_tail() {
        let text = "S -> A x\nA -> B\nB -> C\nC -> A | y";
        let grammar = GrammarLoader::load(text).unwrap();
        let first = FirstSets::compute(&grammar.alphabet, &grammar.rules);
        for strategy in [FollowStrategy::FixedPoint, FollowStrategy::GuardedRecursion] {
            let follow = FollowSets::compute(
                &grammar.alphabet,
                &grammar.rules,
                grammar.start,
                &first,
                strategy,
            );
            for name in ["A", "B", "C"] {
                let id = grammar.alphabet.lookup(name).unwrap();
                assert_eq!(names(&grammar.alphabet, follow.of(id)), ["x"], "{strategy:?} {name}");
            }
        }
    }

    #[test]
    fn test_guarded_recursion_is_bounded_by_fixed_point() {
        let text = "S -> X s\nX -> Y\nY -> Z | t\nZ -> X | u\nT -> X v";
        let grammar = GrammarLoader::load(text).unwrap();
        let first = FirstSets::compute(&grammar.alphabet, &grammar.rules);
        let compute = |strategy| {
            FollowSets::compute(&grammar.alphabet, &grammar.rules, grammar.start, &first, strategy)
        };
        let fixed = compute(FollowStrategy::FixedPoint);
        let guarded = compute(FollowStrategy::GuardedRecursion);
        assert!(guarded.is_subset_of(&fixed));
    }

    #[test]
    fn test_guarded_recursion_misses_late_terminal() {
        let text = "S -> b A B | b\nA -> S b C | C c\nB -> a a A\nC -> b S";
        let grammar = GrammarLoader::load(text).unwrap();
        let first = FirstSets::compute(&grammar.alphabet, &grammar.rules);
        let compute = |strategy| {
            FollowSets::compute(&grammar.alphabet, &grammar.rules, grammar.start, &first, strategy)
        };
        let fixed = compute(FollowStrategy::FixedPoint);
        let guarded = compute(FollowStrategy::GuardedRecursion);

        let a = grammar.alphabet.lookup("A").unwrap();
        assert_eq!(names(&grammar.alphabet, fixed.of(a)), ["$", "b", "c", "a"]);
        assert_eq!(names(&grammar.alphabet, guarded.of(a)), ["$", "b", "a"]);
        assert!(guarded.is_subset_of(&fixed));
        assert!(!fixed.is_subset_of(&guarded));

        for name in ["S", "B", "C"] {
            let id = grammar.alphabet.lookup(name).unwrap();
            assert_eq!(guarded.of(id), fixed.of(id), "{name}");
        }
    }
}
