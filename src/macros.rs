//! Utility macros for grammars.
//!
//! This module defines helper macros used when registering grammar parts:
//!
//! - `MK_SKIPPER!` - Creates a skipper that consumes one regex match
//!
//! These macros reduce boilerplate in grammar definitions.

/// Creates a skipper that consumes a match of a regex anchored at the cursor.
///
/// The skipper reports whether anything was consumed; an empty match counts
/// as nothing skipped.
///
/// # Arguments
///
/// * `$regex` - An expression dereferencing to `regex::Regex`
///
/// # Example
///
/// ```ignore
/// grammar.skipper("whitespace", MK_SKIPPER!(WHITESPACE));
/// ```
#[macro_export]
macro_rules! MK_SKIPPER {
    ($regex:expr) => {
        |parser: &mut $crate::parser::parser::Parser<_>| {
            Ok(parser
                .input_mut()
                .eat_regex(&$regex)
                .is_some_and(|skipped| !skipped.is_empty()))
        }
    };
}
