//! Character-level input for the parser engine.
//!
//! This module contains the input stream that rules consume from. It handles:
//!
//! - Loading a source file fully into memory, or wrapping in-memory text
//! - Literal, predicate and regex based consumption at the cursor
//! - Line and column tracking for error reporting
//! - Saving and restoring the cursor for backtracking

pub mod input;

#[cfg(test)]
mod tests;
