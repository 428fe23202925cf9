//! Parser engine driving grammar rules over an input stream.
//!
//! The engine owns the cursor, the active skipper and the memo cache of one
//! parse session. Rules call back into it to consume input, to probe
//! alternatives speculatively, and to build nodes through the factory.
//!
//! Failures are plain `Err` values. `test`, `test_any` and `test_all` turn
//! non-fatal failures into `false` and always roll the cursor and skipper
//! back; anything else propagates to the caller of `parse`.

use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, trace};

use crate::{
    ast::ast::AstFactory,
    errors::errors::{Error, ErrorImpl, MatchResult},
    grammar::grammar::{Grammar, Params, Rule},
    input::input::InputStream,
    Position,
};

use super::state::State;

/// A rule id with an optional skipper to use while the rule runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRef {
    pub id: String,
    pub skipper: Option<String>,
}

impl RuleRef {
    /// References rule `id`, run under whatever skipper is active.
    pub fn new(id: impl Into<String>) -> Self {
        RuleRef {
            id: id.into(),
            skipper: None,
        }
    }

    /// Runs the rule under skipper `skipper` instead.
    pub fn with_skipper(mut self, skipper: impl Into<String>) -> Self {
        self.skipper = Some(skipper.into());
        self
    }
}

impl From<&str> for RuleRef {
    fn from(id: &str) -> Self {
        RuleRef::new(id)
    }
}

impl From<String> for RuleRef {
    fn from(id: String) -> Self {
        RuleRef::new(id)
    }
}

/// Counters for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Calls to `test`, including cache hits.
    pub tests: usize,
    pub cache_hits: usize,
    /// Calls to `match_rule`/`match_with`.
    pub matches: usize,
}

/// The parser engine.
///
/// A `Parser` holds one parse session at a time: every call to `read`,
/// `read_str`, `parse` or `parse_str` replaces the input and discards the
/// active skipper and the memo cache. The grammar and factory are shared
/// and never modified, except for literal tokens the grammar registers on
/// first use.
pub struct Parser<N> {
    /// Rule and skipper tables
    grammar: Arc<Grammar<N>>,
    /// Builds nodes for successful matches
    factory: Arc<dyn AstFactory<Node = N>>,
    /// Directory file names are resolved against
    cwd: PathBuf,
    /// Current source and cursor
    input: InputStream,
    /// Name of the active skipper
    skipper: Option<String>,
    /// Outcome of each speculative test in this session, by offset then rule id
    cache: HashMap<usize, HashMap<String, bool>>,
    stats: ParseStats,
}

impl<N: 'static> Parser<N> {
    /// Creates a parser resolving file names against the process's current directory.
    pub fn new(grammar: Arc<Grammar<N>>, factory: Arc<dyn AstFactory<Node = N>>) -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Parser::with_cwd(grammar, factory, cwd)
    }

    /// Creates a parser resolving file names against `cwd`.
    ///
    /// # Arguments
    ///
    /// * `grammar` - Rules and skippers, shared with other parsers
    /// * `factory` - Builds the nodes rules return
    /// * `cwd` - Directory relative file names are joined to
    ///
    /// # Returns
    ///
    /// A parser with an empty input; call `parse` or `read` to start a session.
    pub fn with_cwd(
        grammar: Arc<Grammar<N>>,
        factory: Arc<dyn AstFactory<Node = N>>,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Parser {
            grammar,
            factory,
            cwd: cwd.into(),
            input: InputStream::from_str("<empty>", ""),
            skipper: None,
            cache: HashMap::new(),
            stats: ParseStats::default(),
        }
    }

    pub fn get_grammar(&self) -> &Arc<Grammar<N>> {
        &self.grammar
    }

    pub fn get_cwd(&self) -> &Path {
        &self.cwd
    }

    /// The cursor, for rules that consume input directly.
    pub fn input(&self) -> &InputStream {
        &self.input
    }

    /// Mutable cursor. Moving it past input a rule did not mean to consume
    /// is not undone unless the rule runs under `test`.
    pub fn input_mut(&mut self) -> &mut InputStream {
        &mut self.input
    }

    /// Position of the cursor.
    pub fn position(&self) -> Position {
        self.input.get_position()
    }

    /// Number of memoized test outcomes in this session.
    pub fn cache_size(&self) -> usize {
        self.cache.values().map(HashMap::len).sum()
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    // Sessions

    /// Loads `filename`, relative to the working directory, and starts a new session.
    pub fn read(&mut self, filename: impl AsRef<Path>) -> MatchResult<()> {
        let path = self.cwd.join(filename);
        let input = InputStream::from_file(&path)?;
        self.reset(input);
        Ok(())
    }

    /// Starts a new session over in-memory `content`.
    pub fn read_str(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.reset(InputStream::from_str(name, content));
    }

    fn reset(&mut self, input: InputStream) {
        self.input = input;
        self.skipper = None;
        self.cache.clear();
        self.stats = ParseStats::default();
    }

    /// Reads `filename` and matches `rule` against it.
    ///
    /// # Arguments
    ///
    /// * `filename` - File to parse, relative to the working directory
    /// * `rule` - Id of the start rule
    ///
    /// # Returns
    ///
    /// The node built by the start rule. A failure without a position is
    /// placed at the cursor where the start rule gave up.
    pub fn parse(&mut self, filename: impl AsRef<Path>, rule: &str) -> MatchResult<N> {
        self.read(filename)?;
        self.run(rule)
    }

    /// Like `parse`, over in-memory `content` named `name`.
    pub fn parse_str(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        rule: &str,
    ) -> MatchResult<N> {
        self.read_str(name, content);
        self.run(rule)
    }

    fn run(&mut self, rule: &str) -> MatchResult<N> {
        debug!("parsing {} with rule {:?}", self.input.source().name, rule);

        let result = self
            .match_rule(rule)
            .map_err(|error| error.or_at(self.input.get_position()));

        match &result {
            Ok(_) => debug!(
                "parsed {} ({} memo entries, {:?})",
                self.input.source().name,
                self.cache_size(),
                self.stats
            ),
            Err(error) => debug!(
                "failed to parse {}: {}",
                self.input.source().name,
                error.message()
            ),
        }

        result
    }

    /// A parser for included files: same grammar and factory, rooted at the
    /// directory of the current input file.
    pub fn subparser(&self) -> Parser<N> {
        let cwd = self
            .input
            .source()
            .path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| self.cwd.clone(), Path::to_path_buf);

        debug!("creating subparser rooted at {}", cwd.display());
        Parser::with_cwd(Arc::clone(&self.grammar), Arc::clone(&self.factory), cwd)
    }

    // AST

    /// Builds a node of `kind` at the cursor.
    pub fn make_ast(&self, kind: &str) -> N {
        self.factory.make(kind, &self.input.get_position())
    }

    pub fn make_ast_at(&self, kind: &str, position: &Position) -> N {
        self.factory.make(kind, position)
    }

    // Errors

    /// A syntax error at the cursor.
    pub fn error(&self, message: &str) -> Error {
        let message = if message.is_empty() {
            "Unknown error"
        } else {
            message
        };

        Error::new(
            ErrorImpl::Custom {
                message: message.to_string(),
            },
            self.input.get_position(),
        )
    }

    /// An `Expected` error at the cursor listing `ids`.
    pub fn expected(&self, ids: &[&str]) -> Error {
        Error::new(
            ErrorImpl::Expected {
                expected: ids.iter().map(|id| id.to_string()).collect(),
            },
            self.input.get_position(),
        )
    }

    /// Gives up on the current alternative without reporting anything.
    pub fn backtrace(&self) -> Error {
        Error::unpositioned(ErrorImpl::Backtrack)
    }

    fn unknown_skipper(&self, id: &str) -> Error {
        Error::new(
            ErrorImpl::UnknownSkipper { id: id.to_string() },
            self.input.get_position(),
        )
    }

    // Skippers

    /// Runs skipper `id`, or the active skipper, at the cursor.
    ///
    /// Without an active skipper there is nothing to skip. A skipper that
    /// fails is treated as having skipped nothing.
    pub fn skip(&mut self, id: Option<&str>) -> MatchResult<bool> {
        let id = match id.map(str::to_string).or_else(|| self.skipper.clone()) {
            Some(id) => id,
            None => return Ok(false),
        };

        let skipper = self
            .grammar
            .resolve_skipper(&id)
            .ok_or_else(|| self.unknown_skipper(&id))?;

        let state = self.get_state();
        match skipper(self) {
            Ok(skipped) => Ok(skipped),
            Err(error) if error.is_fatal() => Err(error),
            Err(_) => {
                self.set_state(&state);
                Ok(false)
            }
        }
    }

    /// Name of the active skipper, if any.
    pub fn get_skipper(&self) -> Option<&str> {
        self.skipper.as_deref()
    }

    /// Installs skipper `id` and skips once under it; returns the previous skipper.
    ///
    /// `None` (or an empty id) leaves everything as is.
    pub fn set_skipper(&mut self, id: Option<&str>) -> MatchResult<Option<String>> {
        let previous = self.skipper.clone();

        if let Some(id) = id.filter(|id| !id.is_empty()) {
            if !self.grammar.has_skipper(id) {
                return Err(self.unknown_skipper(id));
            }

            trace!("skipper {:?} -> {:?}", previous, id);
            self.skipper = Some(id.to_string());
            self.skip(None)?;
        }

        Ok(previous)
    }

    // State

    /// Snapshot of the cursor and the active skipper.
    pub fn get_state(&self) -> State {
        State {
            position: self.input.get_position(),
            skipper: self.skipper.clone(),
        }
    }

    /// Puts the cursor and skipper back. Nothing is skipped.
    pub fn set_state(&mut self, state: &State) {
        self.input.set_position(&state.position);
        self.skipper = state.skipper.clone();
    }

    // Rules

    /// Resolves `id` to a rule, registering a literal token if no rule has that name.
    pub fn get(&self, id: &str) -> Rule<N> {
        self.grammar.resolve_rule(id)
    }

    /// Matches `text` literally, even where a rule of the same name exists.
    pub fn literal(&mut self, text: &str) -> MatchResult<N> {
        let rule = self.grammar.add_token(text, text);
        rule(self, &Params::new())
    }

    /// Speculatively runs rule `id` at the cursor.
    ///
    /// The cursor and skipper are always restored. The outcome is memoized per
    /// offset for the rest of the session, so the rule body runs at most once
    /// per position. Fatal errors propagate and are not memoized.
    ///
    /// The memo is keyed by offset and rule id only. The active skipper is not
    /// part of the key: a rule that calls `skip(None)` is tested under whichever
    /// skipper was active the first time, and later tests at the same offset
    /// return that outcome even after `set_skipper`.
    ///
    /// # Returns
    ///
    /// Whether the rule matched, or a fatal error.
    pub fn test(&mut self, id: &str) -> MatchResult<bool> {
        self.stats.tests += 1;

        let offset = self.input.offset();
        let cached = self
            .cache
            .get(&offset)
            .and_then(|rules| rules.get(id))
            .copied();
        if let Some(cached) = cached {
            self.stats.cache_hits += 1;
            trace!("memo hit {:?} at {} -> {}", id, offset, cached);
            return Ok(cached);
        }

        let state = self.get_state();
        let rule = self.get(id);
        let outcome = rule(self, &Params::new());
        self.set_state(&state);

        let matched = match outcome {
            Ok(_) => true,
            Err(error) if error.is_fatal() => return Err(error),
            Err(_) => false,
        };

        trace!("memo miss {:?} at {} -> {}", id, offset, matched);
        self.cache
            .entry(offset)
            .or_default()
            .insert(id.to_string(), matched);
        Ok(matched)
    }

    /// Ordered choice: the first id whose `test` succeeds.
    pub fn test_any<'a>(&mut self, ids: &[&'a str]) -> MatchResult<Option<&'a str>> {
        for id in ids {
            if self.test(id)? {
                return Ok(Some(*id));
            }
        }

        Ok(None)
    }

    /// Whether every rule in `ids` matches in sequence from the cursor.
    ///
    /// State is restored afterwards either way. Not memoized.
    pub fn test_all(&mut self, ids: &[&str]) -> MatchResult<bool> {
        let state = self.get_state();
        let params = Params::new();

        let outcome = ids.iter().try_for_each(|id| {
            let rule = self.get(id);
            rule(self, &params).map(|_| ())
        });
        self.set_state(&state);

        match outcome {
            Ok(()) => Ok(true),
            Err(error) if error.is_fatal() => Err(error),
            Err(_) => Ok(false),
        }
    }

    /// Runs rule `rule` for real with no params; see `match_with`.
    pub fn match_rule(&mut self, rule: impl Into<RuleRef>) -> MatchResult<N> {
        self.match_with(rule, &Params::new())
    }

    /// Runs a rule for real, consuming input.
    ///
    /// A rule-scoped skipper is installed (skipping eagerly) for the duration
    /// of the rule; the previous skipper is put back afterwards whether or not
    /// the rule succeeded.
    ///
    /// # Arguments
    ///
    /// * `rule` - Rule id, optionally with a skipper to use while it runs
    /// * `params` - Passed through to the rule body
    ///
    /// # Returns
    ///
    /// The rule's node, or its error. An unknown rule-scoped skipper fails
    /// before the rule runs.
    pub fn match_with(&mut self, rule: impl Into<RuleRef>, params: &Params) -> MatchResult<N> {
        let RuleRef { id, skipper } = rule.into();
        self.stats.matches += 1;

        let previous = match skipper.as_deref() {
            Some(skipper) => Some(self.set_skipper(Some(skipper))?),
            None => None,
        };

        let rule = self.get(&id);
        let result = rule(self, params);

        if let Some(previous) = previous {
            self.skipper = previous;
        }

        result
    }

    /// Matches the first id whose `test` succeeds, or fails listing all of them.
    pub fn match_any(&mut self, ids: &[&str]) -> MatchResult<N> {
        for id in ids {
            if self.test(id)? {
                return self.match_rule(*id);
            }
        }

        Err(self.expected(ids))
    }
}
