//! Derivation traces

use crate::ktfront::grammar::{CompiledGrammar, Rule};
use serde::Serialize;
use std::fmt;

/// One applied production
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationStep {
    pub rule: usize,
    pub lhs: String,
    pub rhs: Vec<String>,
}

impl DerivationStep {
    pub fn from_rule(grammar: &CompiledGrammar, rule: &Rule) -> Self {
        Self {
            rule: rule.number,
            lhs: grammar.name(rule.lhs).to_string(),
            rhs: rule
                .rhs
                .iter()
                .map(|id| grammar.name(*id).to_string())
                .collect(),
        }
    }
}

impl fmt::Display for DerivationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.rule, self.lhs, self.rhs.join(" "))
    }
}

/// Productions applied by a successful parse, in order (a leftmost derivation)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Derivation {
    pub steps: Vec<DerivationStep>,
    /// Significant tokens matched against the grammar
    pub tokens_consumed: usize,
}

impl Derivation {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn rule_numbers(&self) -> Vec<usize> {
        self.steps.iter().map(|step| step.rule).collect()
    }

    /// One `ruleNumber: LHS -> RHS` line per step
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .map(|step| step.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
