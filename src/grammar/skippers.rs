use lazy_static::lazy_static;
use regex::Regex;

use crate::MK_SKIPPER;

use super::grammar::Grammar;

lazy_static! {
    pub static ref WHITESPACE: Regex = Regex::new(r"\A\s+").unwrap();
    pub static ref INLINE_WHITESPACE: Regex = Regex::new(r"\A[ \t]+").unwrap();
    pub static ref LINE_COMMENT: Regex = Regex::new(r"\A//[^\n]*").unwrap();
    pub static ref WHITESPACE_AND_COMMENTS: Regex =
        Regex::new(r"\A(?:\s+|//[^\n]*|/\*(?s:.*?)\*/)+").unwrap();
}

pub const DEFAULT_SKIPPERS: [&str; 4] = [
    "whitespace",
    "inline_whitespace",
    "line_comment",
    "whitespace_and_comments",
];

pub fn register_default_skippers<N: 'static>(grammar: &mut Grammar<N>) {
    grammar.skipper("whitespace", MK_SKIPPER!(WHITESPACE));
    grammar.skipper("inline_whitespace", MK_SKIPPER!(INLINE_WHITESPACE));
    grammar.skipper("line_comment", MK_SKIPPER!(LINE_COMMENT));
    grammar.skipper("whitespace_and_comments", MK_SKIPPER!(WHITESPACE_AND_COMMENTS));
}
