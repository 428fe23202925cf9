use std::{fs, path::Path, rc::Rc};

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Source,
};

/// Cursor over one [`Source`].
///
/// The cursor only moves forward while consuming; `set_position` is the
/// single way back.
#[derive(Clone, Debug)]
pub struct InputStream {
    source: Rc<Source>,
    pos: usize,
    line: usize,
    column: usize,
}

impl InputStream {
    /// Creates a cursor at the start of `source`.
    pub fn new(source: Source) -> InputStream {
        InputStream {
            source: Rc::new(source),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Creates a cursor over in-memory text.
    ///
    /// # Arguments
    ///
    /// * `name` - Name shown in error locations
    /// * `content` - The text to parse
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: impl Into<String>, content: impl Into<String>) -> InputStream {
        InputStream::new(Source::new(name, content))
    }

    /// Reads `path` into a new cursor.
    ///
    /// # Returns
    ///
    /// The stream, or a fatal `ReadFailed` error if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<InputStream, Error> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::unpositioned(ErrorImpl::ReadFailed {
                path: path.to_string_lossy().into_owned(),
                message: e.to_string(),
            })
        })?;

        Ok(InputStream::new(Source::from_path(path.to_path_buf(), content)))
    }

    pub fn source(&self) -> &Rc<Source> {
        &self.source
    }

    /// Snapshot of the cursor: offset, line, column and source.
    pub fn get_position(&self) -> Position {
        Position::new(self.pos, self.line, self.column, Rc::clone(&self.source))
    }

    /// Moves the cursor to a position previously taken from this stream.
    pub fn set_position(&mut self, position: &Position) {
        self.pos = position.offset;
        self.line = position.line;
        self.column = position.column;
    }

    /// Memoization key for the cursor.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &str {
        &self.source.content[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.content.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes one character.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.advance_n(c.len_utf8());
        Some(c)
    }

    pub fn starts_with(&self, literal: &str) -> bool {
        self.rest().starts_with(literal)
    }

    /// Consumes `literal` if the input continues with it.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.starts_with(literal) {
            self.advance_n(literal.len());
            true
        } else {
            false
        }
    }

    /// Consumes a match of `regex` that begins exactly at the cursor.
    ///
    /// The regex is searched over the remaining input, so it must start with
    /// `\A` (see [`InputStream::anchored`]); an unanchored regex still only
    /// matches at the cursor but costs a scan of the rest of the input on
    /// every failure.
    ///
    /// # Returns
    ///
    /// The matched text, or `None` if nothing matched at the cursor.
    pub fn eat_regex(&mut self, regex: &Regex) -> Option<String> {
        let matched = regex
            .find(self.rest())
            .filter(|m| m.start() == 0)?
            .as_str()
            .to_string();

        self.advance_n(matched.len());
        Some(matched)
    }

    /// Consumes characters while `predicate` holds and returns them.
    pub fn eat_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> String {
        let len = self
            .rest()
            .char_indices()
            .find(|(_, c)| !predicate(*c))
            .map_or(self.rest().len(), |(i, _)| i);

        let matched = self.rest()[..len].to_string();
        self.advance_n(len);
        matched
    }

    /// Moves the cursor forward by `n` bytes, clamped to the end of input.
    ///
    /// A count ending inside a multibyte character takes the whole character.
    pub fn advance_n(&mut self, n: usize) {
        let content = &self.source.content;
        let mut end = (self.pos + n).min(content.len());
        while !content.is_char_boundary(end) {
            end += 1;
        }

        for c in content[self.pos..end].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }

        self.pos = end;
    }

    /// Renders `position` as a location block with the source line and a caret.
    pub fn describe_location(&self, position: &Position) -> String {
        position.describe()
    }

    /// Compiles `pattern` anchored at the start of the haystack, for use with
    /// [`InputStream::eat_regex`].
    pub fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!(r"\A(?:{})", pattern))
    }
}
