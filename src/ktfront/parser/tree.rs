//! Parse trees rebuilt from derivations
//!
//! A derivation produced by the predictive parser is leftmost, so the tree can be replayed from
//! it: expand the leftmost unexpanded nonterminal with the next step, attach the next token to
//! the leftmost unfilled terminal. Nodes live in an arena and refer to each other by [`NodeId`].

use super::derivation::Derivation;
use crate::ktfront::grammar::{CompiledGrammar, SymbolId};
use crate::ktfront::lexer::{filter_significant, Token};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// Expanded with the given rule; `None` when the derivation stopped before reaching it
    Nonterminal { rule: Option<usize> },
    /// Matched terminal with its token
    Terminal { token: Option<Token> },
    /// Right-hand side of an empty production
    Epsilon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub symbol: String,
    #[serde(skip)]
    pub code: SymbolId,
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    fn label(&self) -> String {
        match &self.kind {
            NodeKind::Terminal { token: Some(token) } => {
                format!("{}: {}", self.symbol, truncate(&token.lexeme, 30))
            }
            _ => self.symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("derivation step {step} expands {found} but the leftmost nonterminal is {expected}")]
    RuleMismatch {
        step: usize,
        expected: String,
        found: String,
    },
    #[error("derivation step {step} refers to unknown rule {rule}")]
    UnknownRule { step: usize, rule: usize },
    #[error("derivation has {extra} more steps than the tree can use")]
    UnusedSteps { extra: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl ParseTree {
    /// Replay `derivation` from the grammar's start symbol, attaching `tokens` (raw or filtered)
    /// to terminal leaves in order.
    pub fn from_derivation(
        grammar: &CompiledGrammar,
        derivation: &Derivation,
        tokens: &[Token],
    ) -> Result<Self, TreeError> {
        let significant = filter_significant(tokens);
        let mut tokens = significant.into_iter();
        let mut steps = derivation.steps.iter().enumerate();

        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = tree.push(grammar, grammar.start());
        let mut pending = vec![root];

        while let Some(id) = pending.pop() {
            let symbol = tree.nodes[id.0].code;
            if grammar.alphabet().is_terminal(symbol) {
                if let NodeKind::Terminal { token } = &mut tree.nodes[id.0].kind {
                    *token = tokens.next();
                }
                continue;
            }

            let Some((index, step)) = steps.next() else {
                // accepted at end of input; the rest of the tree stays unexpanded
                break;
            };
            let rule = grammar
                .rule(step.rule)
                .ok_or(TreeError::UnknownRule {
                    step: index,
                    rule: step.rule,
                })?;
            if rule.lhs != symbol {
                return Err(TreeError::RuleMismatch {
                    step: index,
                    expected: grammar.name(symbol).to_string(),
                    found: grammar.name(rule.lhs).to_string(),
                });
            }

            tree.nodes[id.0].kind = NodeKind::Nonterminal {
                rule: Some(rule.number),
            };
            let children: Vec<NodeId> = if rule.is_epsilon() {
                vec![tree.push_epsilon(grammar)]
            } else {
                rule.rhs.iter().map(|child| tree.push(grammar, *child)).collect()
            };
            pending.extend(
                children
                    .iter()
                    .rev()
                    .filter(|child| tree.nodes[child.0].kind != NodeKind::Epsilon),
            );
            tree.nodes[id.0].children = children;
        }

        let extra = steps.count();
        if extra > 0 {
            return Err(TreeError::UnusedSteps { extra });
        }
        Ok(tree)
    }

    fn push(&mut self, grammar: &CompiledGrammar, symbol: SymbolId) -> NodeId {
        let kind = if grammar.alphabet().is_terminal(symbol) {
            NodeKind::Terminal { token: None }
        } else {
            NodeKind::Nonterminal { rule: None }
        };
        self.push_node(grammar.name(symbol).to_string(), symbol, kind)
    }

    fn push_epsilon(&mut self, grammar: &CompiledGrammar) -> NodeId {
        let name = grammar.name(SymbolId::EPSILON).to_string();
        self.push_node(name, SymbolId::EPSILON, NodeKind::Epsilon)
    }

    fn push_node(&mut self, symbol: String, code: SymbolId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            symbol,
            code,
            kind,
            children: Vec::new(),
        });
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tokens on the leaves, left to right
    pub fn leaves(&self) -> Vec<&Token> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if let NodeKind::Terminal { token: Some(token) } = &node.kind {
                leaves.push(token);
            }
            stack.extend(node.children.iter().rev());
        }
        leaves
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Render a tree with box-drawing connectors, one node per line
pub fn to_treeviz_str(tree: &ParseTree) -> String {
    let mut result = String::new();
    append_node(&mut result, tree, tree.root(), "", true);
    result
}

fn append_node(result: &mut String, tree: &ParseTree, id: NodeId, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let node = tree.node(id);
    result.push_str(&format!("{}{} {}\n", prefix, connector, node.label()));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i == node.children.len() - 1;
        append_node(result, tree, *child, &new_prefix, is_last);
    }
}
