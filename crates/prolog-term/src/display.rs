// Display implementations for logging and diagnostics

use crate::{Struct, Term, Value};
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Atom(a) if a.is_empty() => write!(f, "''"),
            Value::Atom(a) => write!(f, "{}", a),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) if fl.is_finite() && fl.fract() == 0.0 => write!(f, "{:.1}", fl),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{:?}", s.as_str()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atomic(value) => write!(f, "{}", value),
            Term::Var(var) => write!(f, "{}", var.name()),
            Term::Struct(node) if node.is_list_cell() => write_list(node, f),
            Term::Struct(node) => {
                write!(f, "{}(", node.functor())?;
                for (i, arg) in node.args().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_list(cell: &Struct, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}", cell.args()[0])?;
    let mut tail = &cell.args()[1];
    loop {
        match tail {
            Term::Struct(next) if next.is_list_cell() => {
                write!(f, ", {}", next.args()[0])?;
                tail = &next.args()[1];
            }
            t if t.is_nil() => break,
            t => {
                write!(f, "|{}", t)?;
                break;
            }
        }
    }
    write!(f, "]")
}

#[cfg(test)]
mod tests {
    use crate::Term;

    #[test]
    fn test_display_compound() {
        let t = Term::compound("f", vec![Term::atom("a"), Term::var("X"), Term::float(2.0)]).unwrap();
        assert_eq!(t.to_string(), "f(a, X, 2.0)");
    }

    #[test]
    fn test_display_lists() {
        let proper = Term::list(vec![Term::integer(1), Term::integer(2)]);
        assert_eq!(proper.to_string(), "[1, 2]");
        let partial = Term::list_with_tail(vec![Term::integer(1)], Term::var("T"));
        assert_eq!(partial.to_string(), "[1|T]");
        assert_eq!(Term::nil().to_string(), "[]");
    }

    #[test]
    fn test_display_strings_are_quoted() {
        assert_eq!(Term::string("hi").to_string(), "\"hi\"");
        assert_eq!(Term::atom("").to_string(), "''");
    }
}
