//! Arena-backed scope tree
//!
//! Scopes are stored in a flat vector and addressed by [`ScopeId`]; parents and children refer
//! to each other by id. A separate cursor marks the scope new declarations go into.

use serde::Serialize;
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(pub usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScopeKind {
    Global,
    Class,
    Function,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclarationKind {
    Val,
    Var,
    Parameter,
    Function,
    Class,
}

impl DeclarationKind {
    fn keyword(&self) -> &'static str {
        match self {
            DeclarationKind::Val => "val",
            DeclarationKind::Var => "var",
            DeclarationKind::Parameter => "param",
            DeclarationKind::Function => "fun",
            DeclarationKind::Class => "class",
        }
    }
}

/// A named entity declared in a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    /// Declared type, or return type for functions
    pub type_name: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind, line: usize, column: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            type_name: None,
            line,
            column,
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scope {
    pub id: ScopeId,
    pub name: String,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub declarations: Vec<Declaration>,
}

impl Scope {
    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|decl| decl.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("cannot close the global scope")]
    CloseRoot,

    #[error("'{name}' at line {line}, column {column} is already declared at line {previous_line}")]
    Duplicate {
        name: String,
        line: usize,
        column: usize,
        previous_line: usize,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    cursor: ScopeId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// A tree holding only the global scope, with the cursor on it
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId::ROOT,
                name: "global".to_string(),
                kind: ScopeKind::Global,
                parent: None,
                children: Vec::new(),
                declarations: Vec::new(),
            }],
            cursor: ScopeId::ROOT,
        }
    }

    pub fn cursor(&self) -> ScopeId {
        self.cursor
    }

    pub fn current(&self) -> &Scope {
        self.scope(self.cursor)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    /// Open a child of the current scope and move the cursor into it
    pub fn open_scope(&mut self, name: impl Into<String>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            name: name.into(),
            kind,
            parent: Some(self.cursor),
            children: Vec::new(),
            declarations: Vec::new(),
        });
        self.scopes[self.cursor.0].children.push(id);
        self.cursor = id;
        id
    }

    /// Move the cursor back to the parent scope, returning the scope that was closed
    pub fn close_scope(&mut self) -> Result<ScopeId, ScopeError> {
        let closed = self.cursor;
        self.cursor = self.scope(closed).parent.ok_or(ScopeError::CloseRoot)?;
        Ok(closed)
    }

    /// Declare in the current scope. Names are unique per scope; shadowing an outer scope is fine.
    pub fn declare(&mut self, declaration: Declaration) -> Result<(), ScopeError> {
        if let Some(previous) = self.current().find(&declaration.name) {
            return Err(ScopeError::Duplicate {
                name: declaration.name,
                line: declaration.line,
                column: declaration.column,
                previous_line: previous.line,
            });
        }
        self.scopes[self.cursor.0].declarations.push(declaration);
        Ok(())
    }

    /// Set the type of a declaration already made in `scope`
    pub fn set_type(&mut self, scope: ScopeId, name: &str, type_name: &str) -> bool {
        match self.scopes[scope.0]
            .declarations
            .iter_mut()
            .find(|decl| decl.name == name)
        {
            Some(decl) => {
                decl.type_name = Some(type_name.to_string());
                true
            }
            None => false,
        }
    }

    /// Find `name` in the current scope or the closest enclosing one
    pub fn resolve(&self, name: &str) -> Option<(ScopeId, &Declaration)> {
        let mut scope = Some(self.cursor);
        while let Some(id) = scope {
            let current = self.scope(id);
            if let Some(decl) = current.find(name) {
                return Some((id, decl));
            }
            scope = current.parent;
        }
        None
    }

    /// Indented listing of every scope and its declarations
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_scope(ScopeId::ROOT, 0, &mut out);
        out
    }

    fn render_scope(&self, id: ScopeId, depth: usize, out: &mut String) {
        let scope = self.scope(id);
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{}#{} {:?} {}", indent, id.0, scope.kind, scope.name);
        for decl in &scope.declarations {
            let _ = write!(out, "{}  {} {}", indent, decl.kind.keyword(), decl.name);
            if let Some(type_name) = &decl.type_name {
                let _ = write!(out, ": {}", type_name);
            }
            let _ = writeln!(out, " [{},{}]", decl.column, decl.line);
        }
        for child in &scope.children {
            self.render_scope(*child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let mut tree = ScopeTree::new();
        let class = tree.open_scope("Counter", ScopeKind::Class);
        let function = tree.open_scope("add", ScopeKind::Function);
        assert_eq!(tree.cursor(), function);
        assert_eq!(tree.scope(function).parent, Some(class));
        assert_eq!(tree.close_scope(), Ok(function));
        assert_eq!(tree.close_scope(), Ok(class));
        assert_eq!(tree.cursor(), ScopeId::ROOT);
        assert_eq!(tree.close_scope(), Err(ScopeError::CloseRoot));
        assert_eq!(tree.scope(ScopeId::ROOT).children, vec![class]);
    }

    #[test]
    fn test_resolve_walks_outward() {
        let mut tree = ScopeTree::new();
        tree.declare(Declaration::new("x", DeclarationKind::Val, 1, 5)).unwrap();
        let block = tree.open_scope("block", ScopeKind::Block);
        tree.declare(Declaration::new("y", DeclarationKind::Var, 2, 9)).unwrap();

        assert_eq!(tree.resolve("x").map(|(id, _)| id), Some(ScopeId::ROOT));
        assert_eq!(tree.resolve("y").map(|(id, _)| id), Some(block));
        assert!(tree.resolve("z").is_none());

        tree.close_scope().unwrap();
        assert!(tree.resolve("y").is_none());
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut tree = ScopeTree::new();
        tree.declare(Declaration::new("x", DeclarationKind::Val, 1, 5)).unwrap();
        let err = tree
            .declare(Declaration::new("x", DeclarationKind::Var, 3, 5))
            .unwrap_err();
        assert_eq!(
            err,
            ScopeError::Duplicate {
                name: "x".to_string(),
                line: 3,
                column: 5,
                previous_line: 1,
            }
        );

        // shadowing in a nested scope is allowed
        tree.open_scope("block", ScopeKind::Block);
        assert!(tree.declare(Declaration::new("x", DeclarationKind::Var, 4, 9)).is_ok());
    }

    #[test]
    fn test_render() {
        let mut tree = ScopeTree::new();
        tree.declare(Declaration::new("Counter", DeclarationKind::Class, 1, 7))
            .unwrap();
        tree.open_scope("Counter", ScopeKind::Class);
        tree.declare(Declaration::new("total", DeclarationKind::Var, 2, 9).with_type("Int"))
            .unwrap();
        assert_eq!(
            tree.render(),
            "#0 Global global\n  class Counter [7,1]\n  #1 Class Counter\n    var total: Int [9,2]\n"
        );
    }
}
