//! Property-based tests for FIRST/FOLLOW and parsing table construction over random grammars
//!
//! Random grammars are rarely LL(1), so they are compiled with last-write-wins; every table
//! entry must still be justified by its rule, and every justified cell must be filled.

use ktfront::ktfront::grammar::{
    CompiledGrammar, ConflictPolicy, FollowStrategy, GrammarOptions, SymbolId,
};
use proptest::prelude::*;

const NONTERMINALS: &[&str] = &["S", "A", "B"];
const SYMBOLS: &[&str] = &["S", "A", "B", "a", "b", "c"];

fn alternative() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(SYMBOLS), 0..=3)
}

fn grammar_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::collection::vec(alternative(), 1..=3), NONTERMINALS.len()).prop_map(
        |productions| {
            NONTERMINALS
                .iter()
                .zip(productions)
                .map(|(lhs, alternatives)| {
                    let rhs = alternatives
                        .iter()
                        .map(|alt| {
                            if alt.is_empty() {
                                "EPSILON".to_string()
                            } else {
                                alt.join(" ")
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(" | ");
                    format!("{} -> {}", lhs, rhs)
                })
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

fn compile(text: &str, follow_strategy: FollowStrategy) -> CompiledGrammar {
    let options = GrammarOptions {
        conflict_policy: ConflictPolicy::LastWriteWins,
        follow_strategy,
    };
    CompiledGrammar::compile(text, &options).unwrap()
}

proptest! {
    #[test]
    fn compilation_is_deterministic(text in grammar_text()) {
        let first = compile(&text, FollowStrategy::FixedPoint);
        let second = compile(&text, FollowStrategy::FixedPoint);
        prop_assert_eq!(first.render_sets(), second.render_sets());
        prop_assert_eq!(first.render_table(), second.render_table());
        prop_assert_eq!(first.table().overwrites(), second.table().overwrites());
    }

    #[test]
    fn every_entry_is_justified(text in grammar_text()) {
        let grammar = compile(&text, FollowStrategy::FixedPoint);
        for ((nonterminal, lookahead), number) in grammar.table().iter() {
            let rule = grammar.rule(number).unwrap();
            prop_assert_eq!(rule.lhs, nonterminal);
            let first = grammar.first_of_sequence(&rule.rhs);
            let by_first = lookahead != SymbolId::EPSILON && first.contains(&lookahead);
            let by_follow = first.contains(&SymbolId::EPSILON)
                && grammar.follow_of(nonterminal).contains(&lookahead);
            prop_assert!(by_first || by_follow);
        }
    }

    #[test]
    fn justified_cells_are_filled(text in grammar_text()) {
        let grammar = compile(&text, FollowStrategy::FixedPoint);
        for rule in grammar.rules() {
            let first = grammar.first_of_sequence(&rule.rhs);
            for terminal in first.iter().filter(|t| **t != SymbolId::EPSILON) {
                prop_assert!(grammar.table().contains(rule.lhs, *terminal));
            }
            if first.contains(&SymbolId::EPSILON) {
                for terminal in grammar.follow_of(rule.lhs) {
                    prop_assert!(grammar.table().contains(rule.lhs, *terminal));
                }
            }
        }
    }

    #[test]
    fn start_symbol_is_followed_by_end_of_input(text in grammar_text()) {
        let grammar = compile(&text, FollowStrategy::FixedPoint);
        prop_assert!(grammar.follow_of(grammar.start()).contains(&SymbolId::END_OF_INPUT));
    }

    #[test]
    fn guarded_follow_never_exceeds_fixed_point(text in grammar_text()) {
        let fixed = compile(&text, FollowStrategy::FixedPoint);
        let guarded = compile(&text, FollowStrategy::GuardedRecursion);
        prop_assert!(guarded.follow_sets().is_subset_of(fixed.follow_sets()));
    }
}
