//! Grammar registry for the parser engine.
//!
//! A grammar maps rule names to rule functions and skipper names to
//! whitespace/comment consuming functions. Names that are not registered
//! rules resolve to literal tokens, synthesized on first use.

pub mod grammar;
pub mod skippers;

#[cfg(test)]
mod tests;
