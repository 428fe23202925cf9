use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use log::debug;

use crate::{errors::errors::MatchResult, parser::parser::Parser};

use super::skippers::register_default_skippers;

/// Named arguments a caller may hand to a rule.
pub type Params = HashMap<String, String>;

pub type Rule<N> = Arc<dyn Fn(&mut Parser<N>, &Params) -> MatchResult<N> + Send + Sync>;
/// Returns whether anything was consumed.
pub type Skipper<N> = Arc<dyn Fn(&mut Parser<N>) -> MatchResult<bool> + Send + Sync>;

// Lookup tables inside the grammar, registered before it is shared
pub type RuleLookup<N> = HashMap<String, Rule<N>>;
pub type SkipperLookup<N> = HashMap<String, Skipper<N>>;

/// Rule and skipper tables shared by every parse session.
///
/// `patterns` and `skippers` are fixed once the grammar is wrapped in an
/// `Arc`. `tokens` only ever grows: literal rules are added on first use
/// and an id, once registered, keeps its rule for the grammar's lifetime.
pub struct Grammar<N> {
    patterns: RuleLookup<N>,
    skippers: SkipperLookup<N>,
    tokens: RwLock<RuleLookup<N>>,
}

impl<N: 'static> Default for Grammar<N> {
    fn default() -> Self {
        Grammar::new()
    }
}

impl<N: 'static> Grammar<N> {
    pub fn new() -> Self {
        Grammar {
            patterns: HashMap::new(),
            skippers: HashMap::new(),
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// A grammar with the stock skippers from [`super::skippers`] registered.
    pub fn with_default_skippers() -> Self {
        let mut grammar = Grammar::new();
        register_default_skippers(&mut grammar);
        grammar
    }

    /// Registers a rule function under `name`.
    pub fn rule<F>(&mut self, name: &str, rule_fn: F) -> &mut Self
    where
        F: Fn(&mut Parser<N>, &Params) -> MatchResult<N> + Send + Sync + 'static,
    {
        self.patterns.insert(name.to_string(), Arc::new(rule_fn));
        self
    }

    /// Registers a skipper function under `name`.
    pub fn skipper<F>(&mut self, name: &str, skipper_fn: F) -> &mut Self
    where
        F: Fn(&mut Parser<N>) -> MatchResult<bool> + Send + Sync + 'static,
    {
        self.skippers.insert(name.to_string(), Arc::new(skipper_fn));
        self
    }

    pub fn has_rule(&self, id: &str) -> bool {
        self.patterns.contains_key(id)
    }

    pub fn has_skipper(&self, id: &str) -> bool {
        self.skippers.contains_key(id)
    }

    pub fn get_patterns(&self) -> &RuleLookup<N> {
        &self.patterns
    }

    pub fn get_skippers(&self) -> &SkipperLookup<N> {
        &self.skippers
    }

    pub fn token_count(&self) -> usize {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolves `id` to a rule. Unregistered ids become literal tokens.
    pub fn resolve_rule(&self, id: &str) -> Rule<N> {
        if let Some(rule) = self.patterns.get(id) {
            return Arc::clone(rule);
        }

        let existing = self
            .tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned();

        match existing {
            Some(rule) => rule,
            None => self.add_token(id, id),
        }
    }

    pub fn resolve_skipper(&self, id: &str) -> Option<Skipper<N>> {
        self.skippers.get(id).cloned()
    }

    /// Registers a rule matching exactly `literal` under `id`.
    ///
    /// If `id` is already registered the existing rule is returned unchanged.
    pub fn add_token(&self, id: &str, literal: &str) -> Rule<N> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(rule) = tokens.get(id) {
            return Arc::clone(rule);
        }

        debug!("registering literal token {:?} as {:?}", literal, id);
        let rule = literal_rule(literal.to_string());
        tokens.insert(id.to_string(), Arc::clone(&rule));
        rule
    }
}

/// Matches `literal` at the cursor, producing a node of kind `literal`.
fn literal_rule<N: 'static>(literal: String) -> Rule<N> {
    Arc::new(move |parser: &mut Parser<N>, _params: &Params| {
        let start = parser.position();
        if parser.input_mut().eat(&literal) {
            Ok(parser.make_ast_at(&literal, &start))
        } else {
            Err(parser.expected(&[literal.as_str()]))
        }
    })
}
