use thiserror::Error;

/// Domain errors raised when a term is built or accessed with the wrong shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    /// A compound term needs a non-empty functor once it has arguments
    #[error("empty functor is only legal at arity 0, found arity {arity}")]
    EmptyFunctor { arity: usize },
    /// Argument access past the end of a compound term
    #[error("argument index {index} out of range for {functor}/{arity}")]
    ArgumentOutOfRange {
        functor: String,
        arity: usize,
        index: usize,
    },
    /// List operation applied to something that is not a list or list cell
    #[error("expected a list, found {found}")]
    NotAList { found: String },
}
