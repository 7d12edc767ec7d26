//! Grammar loading and LL(1) table construction
//!
//! A grammar file is loaded into an [`Alphabet`] of interned symbols and a list of numbered
//! [`Rule`]s, then compiled into a [`CompiledGrammar`]: FIRST and FOLLOW sets plus the
//! predictive [`ParsingTable`]. The compiled value is immutable and is what parsers share.
//!
//! Pipeline: [`syntax`] (logos line tokens) -> [`loader`] -> [`sets`] -> [`table`] -> [`compiled`].

pub mod compiled;
pub mod error;
pub mod loader;
pub mod rule;
pub mod sets;
pub mod symbol;
pub mod syntax;
pub mod table;

pub use compiled::{CompiledGrammar, GrammarOptions};
pub use error::GrammarError;
pub use loader::{GrammarLoader, LoadedGrammar};
pub use rule::Rule;
pub use sets::{FirstSets, FollowSets, FollowStrategy, TerminalSet};
pub use symbol::{Alphabet, Symbol, SymbolId, SymbolKind};
pub use table::{ConflictPolicy, ParsingTable};
