//! Clauses
//!
//! A clause is a head plus an optional body: `head :- body.` for rules, just
//! `head.` for facts. Head and body are normalized together so that shared
//! variables get the same slot, and the clause remembers how many slots an
//! activation needs.

use crate::normalize::{normalize, PrimitiveTable};
use prolog_term::{Signature, Term};
use thiserror::Error;

/// Errors raised when building a clause
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClauseError {
    /// Heads must be atoms or compound terms; bodies may also be variables
    #[error("{term} is not callable")]
    NotCallable { term: String },
}

/// A normalized clause
#[derive(Debug, Clone)]
pub struct Clause {
    head: Term,
    body: Option<Term>,
    signature: Signature,
    var_count: u32,
}

impl Clause {
    pub fn new(
        head: Term,
        body: Option<Term>,
        table: &dyn PrimitiveTable,
    ) -> Result<Self, ClauseError> {
        let signature = head.signature().ok_or_else(|| ClauseError::NotCallable {
            term: head.to_string(),
        })?;

        match body {
            None => {
                let head = normalize(&head, table);
                let var_count = head.var_bound();
                Ok(Clause {
                    head,
                    body: None,
                    signature,
                    var_count,
                })
            }
            Some(body) => {
                if !(body.is_callable() || body.is_var()) {
                    return Err(ClauseError::NotCallable {
                        term: body.to_string(),
                    });
                }
                // normalize both halves in one pass so shared variables agree
                let whole = Term::compound(":-", vec![head, body]).map_err(|_| {
                    ClauseError::NotCallable {
                        term: signature.to_string(),
                    }
                })?;
                let whole = normalize(&whole, table);
                let var_count = whole.var_bound();
                let [head, body] = whole.args() else {
                    unreachable!(":-/2 always has two arguments");
                };
                Ok(Clause {
                    head: head.clone(),
                    body: Some(body.clone()),
                    signature,
                    var_count,
                })
            }
        }
    }

    pub fn fact(head: Term, table: &dyn PrimitiveTable) -> Result<Self, ClauseError> {
        Clause::new(head, None, table)
    }

    pub fn rule(head: Term, body: Term, table: &dyn PrimitiveTable) -> Result<Self, ClauseError> {
        Clause::new(head, Some(body), table)
    }

    pub fn head(&self) -> &Term {
        &self.head
    }

    pub fn body(&self) -> Option<&Term> {
        self.body.as_ref()
    }

    pub fn is_fact(&self) -> bool {
        self.body.is_none()
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Slots one activation of this clause needs
    pub fn var_count(&self) -> u32 {
        self.var_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoPrimitives;

    fn compound(functor: &str, args: Vec<Term>) -> Term {
        Term::compound(functor, args).unwrap()
    }

    #[test]
    fn test_fact() {
        let clause = Clause::fact(compound("parent", vec![Term::atom("tom"), Term::atom("bob")]), &NoPrimitives).unwrap();
        assert!(clause.is_fact());
        assert_eq!(clause.var_count(), 0);
        assert_eq!(clause.signature(), Signature::new("parent", 2));
    }

    #[test]
    fn test_rule_shares_slots_between_head_and_body() {
        let x = Term::var("X");
        let y = Term::var("Y");
        let z = Term::var("Z");
        let head = compound("ancestor", vec![x.clone(), z.clone()]);
        let body = compound(
            ",",
            vec![
                compound("parent", vec![x.clone(), y.clone()]),
                compound("ancestor", vec![y, z]),
            ],
        );
        let clause = Clause::rule(head, body, &NoPrimitives).unwrap();
        assert_eq!(clause.var_count(), 3);

        let head_x = &clause.head().args()[0];
        let body = clause.body().unwrap();
        let body_x = &body.args()[0].args()[0];
        assert!(head_x.same_instance(body_x));
        assert_eq!(head_x.as_var().unwrap().index(), Some(0));
    }

    #[test]
    fn test_non_callable_head_rejected() {
        let err = Clause::fact(Term::integer(3), &NoPrimitives).unwrap_err();
        assert_eq!(err, ClauseError::NotCallable { term: "3".to_string() });
        assert!(Clause::fact(Term::var("X"), &NoPrimitives).is_err());
    }

    #[test]
    fn test_variable_body_allowed() {
        let g = Term::var("G");
        let clause = Clause::rule(compound("run", vec![g.clone()]), g, &NoPrimitives).unwrap();
        assert!(clause.body().unwrap().is_var());
        assert!(Clause::rule(Term::atom("p"), Term::integer(1), &NoPrimitives).is_err());
    }
}
