//! Grammar symbols and the alphabet that interns them

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Name of the empty-production marker, as written in grammar files
pub const EPSILON_NAME: &str = "EPSILON";
/// Name under which the end-of-input terminal is rendered
pub const END_OF_INPUT_NAME: &str = "$";
/// Spelling reserved for end of input in grammar files; never allowed as a symbol
pub const END_OF_INPUT_KEYWORD: &str = "END_OF_INPUT";

/// Type keywords that look like nonterminals but are always terminals
pub const BUILTIN_TYPE_TERMINALS: &[&str] = &["Int", "Char", "Double", "Array<Int>", "Array<Char>"];

/// Stable integer code of a symbol. Codes index the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub usize);

impl SymbolId {
    pub const EPSILON: SymbolId = SymbolId(0);
    pub const END_OF_INPUT: SymbolId = SymbolId(1);

    pub fn code(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

impl SymbolKind {
    /// Uppercase-initial names are nonterminals, unless they are built-in type keywords
    pub fn classify(name: &str) -> SymbolKind {
        if name == EPSILON_NAME || BUILTIN_TYPE_TERMINALS.contains(&name) {
            return SymbolKind::Terminal;
        }
        match name.chars().next() {
            Some(first) if first.is_uppercase() => SymbolKind::Nonterminal,
            _ => SymbolKind::Terminal,
        }
    }
}

/// A grammar symbol. Identity is the code; the name is for display and lookup.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }

    pub fn is_nonterminal(&self) -> bool {
        self.kind == SymbolKind::Nonterminal
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Every interned symbol, in first-seen order.
///
/// EPSILON and end-of-input always hold codes 0 and 1; grammar symbols follow from 2.
#[derive(Debug, Clone, Serialize)]
pub struct Alphabet {
    symbols: Vec<Symbol>,
    #[serde(skip)]
    by_name: HashMap<String, SymbolId>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}

impl Alphabet {
    pub fn new() -> Self {
        let mut alphabet = Self {
            symbols: Vec::new(),
            by_name: HashMap::new(),
        };
        alphabet.push(EPSILON_NAME, SymbolKind::Terminal);
        alphabet.push(END_OF_INPUT_NAME, SymbolKind::Terminal);
        alphabet
    }

    fn push(&mut self, name: &str, kind: SymbolKind) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol {
            id,
            name: name.to_string(),
            kind,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Return the existing symbol for `name`, or create one classified by its spelling
    pub fn intern(&mut self, name: &str) -> SymbolId {
        match self.by_name.get(name) {
            Some(id) => *id,
            None => self.push(name, SymbolKind::classify(name)),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    /// Symbol for a code handed out by this alphabet
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn name(&self, id: SymbolId) -> &str {
        &self.symbols[id.0].name
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        self.get(id).is_terminal()
    }

    pub fn is_nonterminal(&self, id: SymbolId) -> bool {
        self.get(id).is_nonterminal()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|symbol| symbol.is_terminal())
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|symbol| symbol.is_nonterminal())
    }
}
