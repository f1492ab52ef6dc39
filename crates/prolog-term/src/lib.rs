//! Term model for the resolution engine
//!
//! This crate defines the closed family of values a proof manipulates:
//! atomic constants, compound structures and logic variables.
//!
//! # Key Components
//!
//! - **Term**: `Atomic`, `Struct` or `Var`, shared through `Arc`
//! - **Value**: atomic constants (atoms, integers, floats, strings)
//! - **Struct**: functor applied to a fixed-length argument slice
//! - **Var**: a named logic variable with a slot assigned during normalization
//! - **Symbol**: interned atom/functor names
//!
//! Terms are immutable once constructed. Proof search never mutates a term;
//! it extends a separate binding store instead.
//!
//! # Example
//!
//! ```ignore
//! use prolog_term::Term;
//!
//! let list = Term::list(vec![Term::integer(1), Term::integer(2), Term::integer(3)]);
//! assert_eq!(list.list_len().unwrap(), 3);
//! ```

mod display;
mod error;
mod list;
mod term;

pub use error::TermError;
pub use list::{EMPTY_LIST, LIST_CONS};
pub use term::{symbol, PrimitiveId, Signature, Slot, Struct, Symbol, Term, Value, Var};
