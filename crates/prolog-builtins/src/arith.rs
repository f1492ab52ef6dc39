//! Arithmetic evaluation
//!
//! Expressions are evaluated on reified terms. Integers stay integers while
//! every operand is an integer; any float operand promotes the operation to
//! floating point.
//!
//! # Supported Operators
//!
//! - **Binary**: `+`, `-`, `*`, `/`, `//`, `mod`, `min`, `max`
//! - **Unary**: `-`, `+`, `abs`
//! - **Comparisons**: `=:=`, `=\=`, `<`, `>`, `=<`, `>=`

use crate::BuiltinError;
use prolog_term::{Term, Value};
use std::cmp::Ordering;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompOp {
    Eq,  // =:=
    Neq, // =\=
    Lt,  // <
    Gt,  // >
    Lte, // =<
    Gte, // >=
}

impl CompOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompOp::Eq => ordering == Ordering::Equal,
            CompOp::Neq => ordering != Ordering::Equal,
            CompOp::Lt => ordering == Ordering::Less,
            CompOp::Gt => ordering == Ordering::Greater,
            CompOp::Lte => ordering != Ordering::Greater,
            CompOp::Gte => ordering != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn to_term(self) -> Term {
        match self {
            Numeric::Int(i) => Term::integer(i),
            Numeric::Float(f) => Term::float(f),
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    fn int_op(
        self,
        other: Numeric,
        int: fn(i64, i64) -> Option<i64>,
        float: fn(f64, f64) -> f64,
    ) -> Result<Numeric, BuiltinError> {
        match (self, other) {
            (Numeric::Int(l), Numeric::Int(r)) => int(l, r).map(Numeric::Int).ok_or(BuiltinError::Overflow),
            (l, r) => Ok(Numeric::Float(float(l.to_f64(), r.to_f64()))),
        }
    }

    fn add(self, other: Numeric) -> Result<Numeric, BuiltinError> {
        self.int_op(other, i64::checked_add, |l, r| l + r)
    }

    fn sub(self, other: Numeric) -> Result<Numeric, BuiltinError> {
        self.int_op(other, i64::checked_sub, |l, r| l - r)
    }

    fn mul(self, other: Numeric) -> Result<Numeric, BuiltinError> {
        self.int_op(other, i64::checked_mul, |l, r| l * r)
    }

    /// `/`: exact integer quotients stay integers, anything else is a float
    fn div(self, other: Numeric) -> Result<Numeric, BuiltinError> {
        match (self, other) {
            (_, Numeric::Int(0)) => Err(BuiltinError::ZeroDivisor),
            (Numeric::Int(l), Numeric::Int(-1)) => {
                l.checked_neg().map(Numeric::Int).ok_or(BuiltinError::Overflow)
            }
            (Numeric::Int(l), Numeric::Int(r)) if l.checked_rem(r) == Some(0) => {
                l.checked_div(r).map(Numeric::Int).ok_or(BuiltinError::Overflow)
            }
            (l, r) => {
                let divisor = r.to_f64();
                if divisor == 0.0 {
                    Err(BuiltinError::ZeroDivisor)
                } else {
                    Ok(Numeric::Float(l.to_f64() / divisor))
                }
            }
        }
    }

    /// `//`: truncating integer division
    fn int_div(self, other: Numeric) -> Result<Numeric, BuiltinError> {
        let (l, r) = (self.integer()?, other.integer()?);
        if r == 0 {
            return Err(BuiltinError::ZeroDivisor);
        }
        l.checked_div(r).map(Numeric::Int).ok_or(BuiltinError::Overflow)
    }

    /// `mod`: the result takes the sign of the divisor
    fn modulo(self, other: Numeric) -> Result<Numeric, BuiltinError> {
        let (l, r) = (self.integer()?, other.integer()?);
        if r == 0 {
            return Err(BuiltinError::ZeroDivisor);
        }
        // i64::MIN % -1 wraps to 0, which is also the exact result
        let m = l.wrapping_rem(r);
        if m != 0 && (m < 0) != (r < 0) {
            Ok(Numeric::Int(m + r))
        } else {
            Ok(Numeric::Int(m))
        }
    }

    fn neg(self) -> Result<Numeric, BuiltinError> {
        match self {
            Numeric::Int(i) => i.checked_neg().map(Numeric::Int).ok_or(BuiltinError::Overflow),
            Numeric::Float(f) => Ok(Numeric::Float(-f)),
        }
    }

    fn abs(self) -> Result<Numeric, BuiltinError> {
        match self {
            Numeric::Int(i) => i.checked_abs().map(Numeric::Int).ok_or(BuiltinError::Overflow),
            Numeric::Float(f) => Ok(Numeric::Float(f.abs())),
        }
    }

    fn integer(self) -> Result<i64, BuiltinError> {
        match self {
            Numeric::Int(i) => Ok(i),
            Numeric::Float(f) => Err(BuiltinError::Type {
                expected: "integer",
                found: Term::float(f).to_string(),
            }),
        }
    }

    fn compare(self, other: Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Int(l), Numeric::Int(r)) => Some(l.cmp(&r)),
            (l, r) => l.to_f64().partial_cmp(&r.to_f64()),
        }
    }

    fn min(self, other: Numeric) -> Numeric {
        match self.compare(other) {
            Some(Ordering::Greater) => other,
            _ => self,
        }
    }

    fn max(self, other: Numeric) -> Numeric {
        match self.compare(other) {
            Some(Ordering::Less) => other,
            _ => self,
        }
    }
}

/// Evaluate a fully reified arithmetic expression
pub fn eval(term: &Term) -> Result<Numeric, BuiltinError> {
    match term {
        Term::Atomic(Value::Integer(i)) => Ok(Numeric::Int(*i)),
        Term::Atomic(Value::Float(f)) => Ok(Numeric::Float(*f)),
        Term::Var(_) => Err(BuiltinError::Unbound),
        Term::Atomic(_) => Err(BuiltinError::Type {
            expected: "evaluable",
            found: term.to_string(),
        }),
        Term::Struct(node) => match (node.name(), node.args()) {
            ("+", [l, r]) => eval(l)?.add(eval(r)?),
            ("-", [l, r]) => eval(l)?.sub(eval(r)?),
            ("*", [l, r]) => eval(l)?.mul(eval(r)?),
            ("/", [l, r]) => eval(l)?.div(eval(r)?),
            ("//", [l, r]) => eval(l)?.int_div(eval(r)?),
            ("mod", [l, r]) => eval(l)?.modulo(eval(r)?),
            ("min", [l, r]) => Ok(eval(l)?.min(eval(r)?)),
            ("max", [l, r]) => Ok(eval(l)?.max(eval(r)?)),
            ("-", [x]) => eval(x)?.neg(),
            ("+", [x]) => eval(x),
            ("abs", [x]) => eval(x)?.abs(),
            _ => Err(BuiltinError::UnknownEvaluable {
                name: node.signature().to_string(),
            }),
        },
    }
}

/// Evaluate both sides and compare them
pub fn compare(op: CompOp, left: &Term, right: &Term) -> Result<bool, BuiltinError> {
    let left = eval(left)?;
    let right = eval(right)?;
    // NaN compares unequal to everything
    Ok(left.compare(right).map_or(op == CompOp::Neq, |ordering| op.holds(ordering)))
}
