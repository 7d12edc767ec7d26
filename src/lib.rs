//! # ktfront
//!
//! Front end for a restricted, Kotlin-like language: a stateful regex tokenizer and a generic,
//! table-driven LL(1) parser that loads its grammar from a text description.
//!
//! File Layout
//!
//! src/ktfront
//!   ├── lexer       Token types, recognizers, comment modes, tokenizer
//!   ├── grammar     Grammar loading, FIRST/FOLLOW, parsing table, compiled bundle
//!   ├── parser      Predictive driver, derivation trace and tree
//!   ├── analysis    Consumers of the raw token stream (scopes, symbol table, partitions)
//!   ├── config      Layered configuration
//!   └── processor   Stage/format processing used by the binary
//!
//! The lexer and the grammar are independent: the parser only meets them through the token
//! sequence and the compiled grammar bundle.

pub mod ktfront;
