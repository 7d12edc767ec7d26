//! Symbol table construction from the raw token stream
//!
//! [`SymbolTableBuilder`] reads tokens one at a time (auxiliary tokens are skipped) and keeps a
//! single [`BuilderState`] describing what it is in the middle of: a class header, a function
//! header with its parameters, or a `val`/`var` declaration. Everything else is plain code, where
//! braces open and close anonymous block scopes and identifiers are resolved against the scopes
//! open at that point.
//!
//! Problems never abort the build; they are collected as [`SymbolDiagnostic`]s.

use super::scope_tree::{Declaration, DeclarationKind, ScopeError, ScopeId, ScopeKind, ScopeTree};
use crate::ktfront::lexer::{Token, TokenType};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    Unresolved,
    Duplicate,
    UnbalancedBrace,
    UnclosedScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SymbolDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}] {:?}: {}", self.column, self.line, self.kind, self.message)
    }
}

/// The function whose header is being read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHeader {
    /// Scope the function itself is declared in
    pub declared_in: ScopeId,
    pub name: String,
}

/// A name waiting for its `: Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingName {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuilderState {
    /// Plain code
    #[default]
    Code,
    /// After `class`
    ClassName,
    /// After `class Name`, until its `{` or the next declaration keyword
    ClassHeader { name: String },
    /// After `fun`
    FunctionName,
    /// After `fun name`, expecting `(`
    ParameterList(FunctionHeader),
    /// Inside `( ... )`, expecting a parameter name, `,` or `)`
    ParameterName(FunctionHeader),
    /// After a parameter name, expecting `: Type`
    ParameterType(FunctionHeader, PendingName),
    /// After `)`, expecting an optional `: Type` and the body `{`
    ReturnType(FunctionHeader),
    /// After `val` or `var`
    DeclarationName(DeclarationKind),
    /// After `val name` or `var name`, expecting `: Type`
    DeclarationType(DeclarationKind, PendingName),
}

/// Result of a symbol table build
#[derive(Debug, Clone, Serialize)]
pub struct SymbolTable {
    pub scopes: ScopeTree,
    pub diagnostics: Vec<SymbolDiagnostic>,
}

impl SymbolTable {
    /// Scope tree listing followed by one line per diagnostic
    pub fn render(&self) -> String {
        let mut out = self.scopes.render();
        for diagnostic in &self.diagnostics {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTableBuilder {
    state: BuilderState,
    scopes: ScopeTree,
    diagnostics: Vec<SymbolDiagnostic>,
    last_position: (usize, usize),
}

impl SymbolTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a whole raw token sequence
    pub fn build(tokens: &[Token]) -> SymbolTable {
        let mut builder = Self::new();
        for token in tokens {
            builder.step(token);
        }
        builder.finish()
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Feed one token
    pub fn step(&mut self, token: &Token) {
        if token.is_auxiliary() {
            return;
        }
        self.last_position = (token.line, token.end_index + 1);
        let state = std::mem::take(&mut self.state);
        self.state = self.transition(state, token);
        trace!(lexeme = %token.lexeme, state = ?self.state, "symbol table step");
    }

    /// Report scopes still open and hand out the table
    pub fn finish(mut self) -> SymbolTable {
        while self.scopes.cursor() != ScopeId::ROOT {
            let name = self.scopes.current().name.clone();
            let (line, column) = self.last_position;
            self.diagnose(
                DiagnosticKind::UnclosedScope,
                format!("scope '{}' is never closed", name),
                line,
                column,
            );
            if self.scopes.close_scope().is_err() {
                break;
            }
        }
        debug!(
            scopes = self.scopes.len(),
            diagnostics = self.diagnostics.len(),
            "built symbol table"
        );
        SymbolTable {
            scopes: self.scopes,
            diagnostics: self.diagnostics,
        }
    }

    fn transition(&mut self, state: BuilderState, token: &Token) -> BuilderState {
        use BuilderState::*;
        let token_type = token.token_type;
        match state {
            Code => self.code(token),

            ClassName => match token_type {
                TokenType::Identifier => {
                    self.declare(Declaration::new(
                        &token.lexeme,
                        DeclarationKind::Class,
                        token.line,
                        token.column,
                    ));
                    ClassHeader {
                        name: token.lexeme.clone(),
                    }
                }
                _ => self.code(token),
            },

            ClassHeader { name } => match token_type {
                TokenType::OpeningCurlyBrace => {
                    self.scopes.open_scope(name, ScopeKind::Class);
                    Code
                }
                // a bodiless class ends at the next declaration keyword
                TokenType::ClosingCurlyBrace
                | TokenType::Class
                | TokenType::Function
                | TokenType::Value
                | TokenType::Variable => self.code(token),
                _ => ClassHeader { name },
            },

            FunctionName => match token_type {
                TokenType::Identifier => {
                    let header = FunctionHeader {
                        declared_in: self.scopes.cursor(),
                        name: token.lexeme.clone(),
                    };
                    self.declare(Declaration::new(
                        &token.lexeme,
                        DeclarationKind::Function,
                        token.line,
                        token.column,
                    ));
                    self.scopes.open_scope(&token.lexeme, ScopeKind::Function);
                    ParameterList(header)
                }
                _ => self.code(token),
            },

            ParameterList(header) => match token_type {
                TokenType::OpenBrace => ParameterName(header),
                _ => self.return_type(header, token),
            },

            ParameterName(header) => match token_type {
                TokenType::Identifier => ParameterType(header, pending(token)),
                TokenType::CloseBrace => ReturnType(header),
                TokenType::OpeningCurlyBrace | TokenType::ClosingCurlyBrace => {
                    self.return_type(header, token)
                }
                _ => ParameterName(header),
            },

            ParameterType(header, name) => match token_type {
                TokenType::Extends => ParameterType(header, name),
                t if t.is_type_keyword() => {
                    self.declare_pending(DeclarationKind::Parameter, name, Some(&token.lexeme));
                    ParameterName(header)
                }
                TokenType::Comma => {
                    self.declare_pending(DeclarationKind::Parameter, name, None);
                    ParameterName(header)
                }
                TokenType::CloseBrace => {
                    self.declare_pending(DeclarationKind::Parameter, name, None);
                    ReturnType(header)
                }
                _ => {
                    self.declare_pending(DeclarationKind::Parameter, name, None);
                    self.return_type(header, token)
                }
            },

            ReturnType(header) => self.return_type(header, token),

            DeclarationName(kind) => match token_type {
                TokenType::Identifier => DeclarationType(kind, pending(token)),
                _ => self.code(token),
            },

            DeclarationType(kind, name) => match token_type {
                TokenType::Extends => DeclarationType(kind, name),
                t if t.is_type_keyword() => {
                    self.declare_pending(kind, name, Some(&token.lexeme));
                    Code
                }
                _ => {
                    self.declare_pending(kind, name, None);
                    self.code(token)
                }
            },
        }
    }

    /// Tokens outside any header or declaration
    fn code(&mut self, token: &Token) -> BuilderState {
        match token.token_type {
            TokenType::Class => BuilderState::ClassName,
            TokenType::Function => BuilderState::FunctionName,
            TokenType::Value => BuilderState::DeclarationName(DeclarationKind::Val),
            TokenType::Variable => BuilderState::DeclarationName(DeclarationKind::Var),
            TokenType::OpeningCurlyBrace => {
                self.scopes.open_scope("block", ScopeKind::Block);
                BuilderState::Code
            }
            TokenType::ClosingCurlyBrace => {
                if let Err(ScopeError::CloseRoot) = self.scopes.close_scope() {
                    self.diagnose(
                        DiagnosticKind::UnbalancedBrace,
                        "'}' without a matching '{'".to_string(),
                        token.line,
                        token.column,
                    );
                }
                BuilderState::Code
            }
            TokenType::Identifier => {
                if self.scopes.resolve(&token.lexeme).is_none() {
                    self.diagnose(
                        DiagnosticKind::Unresolved,
                        format!("unresolved reference '{}'", token.lexeme),
                        token.line,
                        token.column,
                    );
                }
                BuilderState::Code
            }
            _ => BuilderState::Code,
        }
    }

    /// Between `)` and the body: `: Type` sets the return type, `{` starts the body
    fn return_type(&mut self, header: FunctionHeader, token: &Token) -> BuilderState {
        match token.token_type {
            TokenType::Extends => BuilderState::ReturnType(header),
            t if t.is_type_keyword() => {
                self.scopes
                    .set_type(header.declared_in, &header.name, &token.lexeme);
                BuilderState::ReturnType(header)
            }
            // the function scope is already open; its body brace does not open another
            TokenType::OpeningCurlyBrace => BuilderState::Code,
            _ => self.code(token),
        }
    }

    fn declare_pending(&mut self, kind: DeclarationKind, name: PendingName, type_name: Option<&str>) {
        let mut declaration = Declaration::new(name.name, kind, name.line, name.column);
        declaration.type_name = type_name.map(str::to_string);
        self.declare(declaration);
    }

    fn declare(&mut self, declaration: Declaration) {
        if let Err(error) = self.scopes.declare(declaration) {
            if let ScopeError::Duplicate { line, column, .. } = &error {
                let (line, column) = (*line, *column);
                self.diagnose(DiagnosticKind::Duplicate, error.to_string(), line, column);
            }
        }
    }

    fn diagnose(&mut self, kind: DiagnosticKind, message: String, line: usize, column: usize) {
        debug!(?kind, line, column, "{}", message);
        self.diagnostics.push(SymbolDiagnostic {
            kind,
            message,
            line,
            column,
        });
    }
}

fn pending(token: &Token) -> PendingName {
    PendingName {
        name: token.lexeme.clone(),
        line: token.line,
        column: token.column,
    }
}
