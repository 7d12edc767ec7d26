//! Production rules

use super::symbol::{Alphabet, SymbolId};
use serde::Serialize;

/// `lhs -> rhs`, numbered in file order from 0.
///
/// The empty production has the single right-hand side symbol EPSILON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub number: usize,
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
}

impl Rule {
    pub fn new(number: usize, lhs: SymbolId, rhs: Vec<SymbolId>) -> Self {
        Self { number, lhs, rhs }
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs.iter().all(|symbol| *symbol == SymbolId::EPSILON)
    }

    /// Right-hand side without EPSILON markers, i.e. what the parser pushes
    pub fn expansion(&self) -> impl DoubleEndedIterator<Item = SymbolId> + '_ {
        self.rhs
            .iter()
            .copied()
            .filter(|symbol| *symbol != SymbolId::EPSILON)
    }

    /// `LHS -> RHS`
    pub fn production(&self, alphabet: &Alphabet) -> String {
        let rhs: Vec<&str> = self.rhs.iter().map(|id| alphabet.name(*id)).collect();
        format!("{} -> {}", alphabet.name(self.lhs), rhs.join(" "))
    }

    /// `number: LHS -> RHS`
    pub fn render(&self, alphabet: &Alphabet) -> String {
        format!("{}: {}", self.number, self.production(alphabet))
    }
}
