//! Property-based and scenario tests for the resolution engine
//!
//! Properties exercise normalization and unification over generated terms;
//! scenarios run small programs end to end through the engine facade.

#[cfg(test)]
mod properties;

#[cfg(test)]
mod scenarios;
