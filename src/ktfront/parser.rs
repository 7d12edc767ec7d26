//! Predictive LL(1) parser
//!
//! [`PredictiveParser`] runs the table-driven stack automaton of a [`CompiledGrammar`] over the
//! significant tokens of a lexed program and returns the [`Derivation`] it applied, or the first
//! [`SyntaxError`]. [`ParseTree::from_derivation`] rebuilds the tree for display.
//!
//! [`CompiledGrammar`]: crate::ktfront::grammar::CompiledGrammar

pub mod derivation;
pub mod error;
pub mod input;
pub mod predictive;
pub mod tree;

pub use derivation::{Derivation, DerivationStep};
pub use error::{ParseError, SyntaxError};
pub use input::GenericTerminals;
pub use predictive::{parse, ParserOptions, PredictiveParser};
pub use tree::{to_treeviz_str, NodeId, NodeKind, ParseTree, TreeError, TreeNode};
