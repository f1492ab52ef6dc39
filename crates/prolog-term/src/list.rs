//! List cells
//!
//! Lists are chains of `'.'(Head, Tail)` cells terminated by the atom `[]`.
//! Every accessor here checks the cell shape first and reports
//! `TermError::NotAList` for anything else.

use crate::term::{symbol, Struct};
use crate::{Term, TermError};

/// Functor of a list cell
pub const LIST_CONS: &str = ".";
/// Atom terminating a proper list
pub const EMPTY_LIST: &str = "[]";

fn not_a_list(term: &Term) -> TermError {
    TermError::NotAList {
        found: term.to_string(),
    }
}

impl Term {
    pub fn nil() -> Term {
        Term::atom(EMPTY_LIST)
    }

    pub fn cons(head: Term, tail: Term) -> Term {
        Term::from_struct(Struct::from_parts(symbol(LIST_CONS), vec![head, tail], None))
    }

    pub fn list(items: Vec<Term>) -> Term {
        Term::list_with_tail(items, Term::nil())
    }

    /// Build `[a, b, ...|tail]`
    pub fn list_with_tail(items: Vec<Term>, tail: Term) -> Term {
        items
            .into_iter()
            .rev()
            .fold(tail, |acc, item| Term::cons(item, acc))
    }

    pub fn is_nil(&self) -> bool {
        self.as_atom()
            .map_or(false, |name| name.as_str() == EMPTY_LIST)
    }

    pub fn is_list_cell(&self) -> bool {
        self.as_struct().map_or(false, Struct::is_list_cell)
    }

    /// Proper list: zero or more cells ending in `[]`
    pub fn is_list(&self) -> bool {
        let mut current = self;
        loop {
            if current.is_nil() {
                return true;
            }
            match current.as_struct() {
                Some(cell) if cell.is_list_cell() => current = &cell.args()[1],
                _ => return false,
            }
        }
    }

    fn list_cell(&self) -> Result<&Struct, TermError> {
        match self.as_struct() {
            Some(cell) if cell.is_list_cell() => Ok(cell),
            _ => Err(not_a_list(self)),
        }
    }

    pub fn head(&self) -> Result<&Term, TermError> {
        Ok(&self.list_cell()?.args()[0])
    }

    pub fn tail(&self) -> Result<&Term, TermError> {
        Ok(&self.list_cell()?.args()[1])
    }

    /// Number of elements of a proper list
    pub fn list_len(&self) -> Result<usize, TermError> {
        let mut len = 0;
        let mut current = self;
        while !current.is_nil() {
            current = current.tail().map_err(|_| not_a_list(self))?;
            len += 1;
        }
        Ok(len)
    }

    pub fn list_items(&self) -> Result<Vec<Term>, TermError> {
        let mut items = Vec::new();
        let mut current = self;
        while !current.is_nil() {
            let cell = current.list_cell().map_err(|_| not_a_list(self))?;
            items.push(cell.args()[0].clone());
            current = &cell.args()[1];
        }
        Ok(items)
    }

    /// New proper list with `item` added at the end
    pub fn append(&self, item: Term) -> Result<Term, TermError> {
        let mut items = self.list_items()?;
        items.push(item);
        Ok(Term::list(items))
    }
}
