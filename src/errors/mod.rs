//! Error types and error handling for the parser engine.
//!
//! This module defines the error type threaded through every rule
//! invocation. It includes:
//!
//! - Error structures with optional source position information
//! - Variants separating syntax failures from configuration failures
//! - Rendering of a message plus a pointer into the offending line

pub mod errors;
