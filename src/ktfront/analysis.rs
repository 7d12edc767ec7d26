//! Token-level analyses built on the raw lexer output
//!
//! These read the unfiltered token sequence and never feed anything back into parsing:
//!
//! - [`SymbolTableBuilder`]: scope tree with declarations, plus unresolved or duplicate names
//! - [`TokenPartitioner`]: tokens grouped by the class or function that encloses them

pub mod partition;
pub mod scope_tree;
pub mod symbol_table;

pub use partition::{render_partitions, OwnerKind, Partition, TokenPartitioner};
pub use scope_tree::{
    Declaration, DeclarationKind, Scope, ScopeError, ScopeId, ScopeKind, ScopeTree,
};
pub use symbol_table::{
    BuilderState, DiagnosticKind, SymbolDiagnostic, SymbolTable, SymbolTableBuilder,
};
