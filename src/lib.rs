#![allow(clippy::module_inception)]

use std::{cmp::Ordering, fmt, path::PathBuf, rc::Rc};

pub mod ast;
pub mod errors;
pub mod grammar;
pub mod input;
pub mod macros;
pub mod parser;

extern crate regex;

pub use ast::ast::{AstFactory, Node, NodeFactory};
pub use errors::errors::{Error, ErrorImpl, ErrorTip, MatchResult};
pub use grammar::grammar::{Grammar, Params, Rule, Skipper};
pub use input::input::InputStream;
pub use parser::parser::{ParseStats, Parser, RuleRef};
pub use parser::state::State;

/// Text being parsed, loaded once per session.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub path: Option<PathBuf>,
    pub content: String,
}

impl Source {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            path: None,
            content: content.into(),
        }
    }

    pub fn from_path(path: PathBuf, content: String) -> Self {
        Source {
            name: path.to_string_lossy().into_owned(),
            path: Some(path),
            content,
        }
    }

    /// Returns `(line_number, line_text, byte_offset_in_line)` for `offset`.
    ///
    /// Offsets past the end of the content resolve to the end of the last line.
    pub fn line_at(&self, offset: usize) -> (usize, &str, usize) {
        let offset = offset.min(self.content.len());
        let mut start = 0;
        let mut line_number = 1;

        for line in self.content.split_inclusive('\n') {
            let end = start + line.len();

            if (start..end).contains(&offset) {
                return (line_number, line.trim_end_matches(['\n', '\r']), offset - start);
            }

            start = end;
            line_number += 1;
        }

        // Cursor sits at EOF: either after a trailing newline or at the end of the last line.
        if self.content.ends_with('\n') || self.content.is_empty() {
            (line_number, "", 0)
        } else {
            let line = self.content.rsplit('\n').next().unwrap_or("");
            (line_number - 1, line, line.len())
        }
    }
}

/// A point in a [`Source`].
#[derive(Clone)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    source: Rc<Source>,
}

impl Position {
    pub fn start(source: Rc<Source>) -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
            source,
        }
    }

    pub fn new(offset: usize, line: usize, column: usize, source: Rc<Source>) -> Self {
        Position {
            offset,
            line,
            column,
            source,
        }
    }

    pub fn source(&self) -> &Rc<Source> {
        &self.source
    }

    pub fn same_source(&self, other: &Position) -> bool {
        Rc::ptr_eq(&self.source, &other.source)
    }

    /// Renders the location block used in error messages:
    ///
    /// ```text
    /// -> file.pt:3:5
    ///   |
    /// 3 |     end
    ///   |     ^
    /// ```
    pub fn describe(&self) -> String {
        let (line_number, line_text, line_pos) = self.source.line_at(self.offset);
        let pointer_column = line_text
            .get(..line_pos)
            .map_or(line_pos, |prefix| prefix.chars().count());

        let line_string = line_number.to_string();
        let gutter = " ".repeat(line_string.len());

        format!(
            "-> {}:{}:{}\n{} |\n{} | {}\n{} | {}^",
            self.source.name,
            self.line,
            self.column,
            gutter,
            line_string,
            line_text,
            gutter,
            " ".repeat(pointer_column)
        )
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("source", &self.source.name)
            .field("offset", &self.offset)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source.name, self.line, self.column)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.same_source(other) && self.offset == other.offset
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_source(other) {
            Some(self.offset.cmp(&other.offset))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{Position, Source};

    #[test]
    fn test_line_at() {
        let source = Source::new("test.pt", "Hello, world!\nfoo\n\n    Testing { }\n");

        let (line_number, line, line_pos) = source.line_at(10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = source.line_at(31);
        assert_eq!(line_number, 4);
        assert_eq!(line, "    Testing { }");
        assert_eq!(line_pos, 12);
    }

    #[test]
    fn test_line_at_eof() {
        let source = Source::new("test.pt", "abc");
        assert_eq!(source.line_at(3), (1, "abc", 3));

        let source = Source::new("test.pt", "abc\n");
        assert_eq!(source.line_at(4), (2, "", 0));
    }

    #[test]
    fn test_position_describe() {
        let source = Rc::new(Source::new("file.pt", "module :name\n\n    end"));
        let position = Position::new(18, 3, 5, source);

        assert_eq!(
            position.describe(),
            "-> file.pt:3:5\n  |\n3 |     end\n  |     ^"
        );
    }

    #[test]
    fn test_position_ordering() {
        let source = Rc::new(Source::new("a", "abc"));
        let other = Rc::new(Source::new("a", "abc"));

        let first = Position::new(0, 1, 1, Rc::clone(&source));
        let second = Position::new(2, 1, 3, Rc::clone(&source));

        assert!(first < second);
        assert_eq!(first, Position::start(Rc::clone(&source)));
        assert_ne!(first, Position::start(other.clone()));
        assert_eq!(first.partial_cmp(&Position::start(other)), None);
    }
}
