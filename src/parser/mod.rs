//! Parser module: the packrat engine that runs grammar rules.
//!
//! This module contains the parser engine that drives grammar rules over an
//! input stream and produces AST nodes through a factory. It handles:
//!
//! - Rule lookup and invocation, with optional rule-scoped skippers
//! - Speculative testing with full state rollback
//! - Memoization of test outcomes per (offset, rule) pair
//! - Ordered choice (`test_any`, `match_any`) and lookahead (`test_all`)
//! - Sub-parsers for files included relative to the current input
//!
//! Rules report failure by returning `Err`; the engine converts non-fatal
//! failures into `false` at speculative boundaries.

pub mod parser;
pub mod state;
