//! Continuation codes
//!
//! Every solve call and every listener returns a `Code` telling the caller
//! how to proceed:
//!
//! - `0`: continue exploring alternatives
//! - `N > 0`: cut to level `N`; every choice point at level `N` or deeper is
//!   dropped and the frame owning level `N` resumes as "continue"
//! - `-1`: abort the whole search

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(i32);

impl Code {
    pub const CONTINUE: Code = Code(0);
    pub const ABORT: Code = Code(-1);

    /// Cut to `level`. Levels start at 1.
    pub fn cut_to(level: u32) -> Code {
        debug_assert!(level > 0, "cut levels start at 1");
        Code(i32::try_from(level).unwrap_or(i32::MAX))
    }

    /// Interpret a raw integer. Any negative value aborts.
    pub fn from_raw(raw: i32) -> Code {
        if raw < 0 {
            Code::ABORT
        } else {
            Code(raw)
        }
    }

    pub fn raw(self) -> i32 {
        self.0
    }

    pub fn is_continue(self) -> bool {
        self.0 == 0
    }

    pub fn is_abort(self) -> bool {
        self.0 < 0
    }

    pub fn cut_level(self) -> Option<u32> {
        u32::try_from(self.0).ok().filter(|&level| level > 0)
    }

    /// Convert a cut aimed at `level` back into "continue"
    pub fn absorb(self, level: u32) -> Code {
        if self.cut_level() == Some(level) {
            Code::CONTINUE
        } else {
            self
        }
    }

    /// Result of `!` at `barrier` after its continuation returned `self`.
    /// Abort dominates, otherwise the outermost cut wins.
    pub fn through_cut(self, barrier: u32) -> Code {
        if self.is_abort() {
            return Code::ABORT;
        }
        match self.cut_level() {
            Some(level) => Code::cut_to(level.min(barrier)),
            None => Code::cut_to(barrier),
        }
    }
}

impl Default for Code {
    fn default() -> Self {
        Code::CONTINUE
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cut_level() {
            Some(level) => write!(f, "cut({})", level),
            None if self.is_abort() => write!(f, "abort"),
            None => write!(f, "continue"),
        }
    }
}
