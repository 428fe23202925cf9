//! Unit tests for the grammar registry.

use std::{sync::Arc, thread};

use crate::{
    ast::ast::{Node, NodeFactory},
    grammar::grammar::{Grammar, Params},
    parser::parser::Parser,
};

use super::skippers::DEFAULT_SKIPPERS;

#[test]
fn test_registered_rule_wins_over_literal() {
    let mut grammar: Grammar<Node> = Grammar::new();
    grammar.rule("number", |p, _| {
        let start = p.position();
        let digits = p.input_mut().eat_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(p.expected(&["number"]));
        }
        Ok(p.make_ast_at("number", &start).with_value(digits))
    });

    let registered = grammar.resolve_rule("number");

    assert!(Arc::ptr_eq(&registered, &grammar.resolve_rule("number")));
    assert!(grammar.has_rule("number"));
    assert_eq!(grammar.token_count(), 0);
}

#[test]
fn test_unknown_id_becomes_literal_token() {
    let grammar: Grammar<Node> = Grammar::new();

    let first = grammar.resolve_rule("+");
    let second = grammar.resolve_rule("+");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(grammar.token_count(), 1);
    assert!(!grammar.has_rule("+"));
}

#[test]
fn test_add_token_keeps_first_definition() {
    let grammar = Arc::new(Grammar::<Node>::new());

    let first = grammar.add_token("plus", "+");
    let second = grammar.add_token("plus", "plus");
    assert!(Arc::ptr_eq(&first, &second));

    let mut parser = Parser::with_cwd(Arc::clone(&grammar), Arc::new(NodeFactory), ".");
    parser.read_str("test.pt", "+");
    let node = second(&mut parser, &Params::new()).unwrap();

    assert_eq!(node.kind, "+");
    assert!(parser.input().at_eof());
}

#[test]
fn test_literal_token_failure_names_literal() {
    let grammar = Arc::new(Grammar::<Node>::new());
    let mut parser = Parser::with_cwd(Arc::clone(&grammar), Arc::new(NodeFactory), ".");
    parser.read_str("test.pt", "end");

    let error = parser.match_rule("main").unwrap_err();

    assert_eq!(error.message(), "Expected: main");
    assert_eq!(error.get_position().map(|p| p.offset), Some(0));
}

#[test]
fn test_skippers_are_a_separate_namespace() {
    let mut grammar: Grammar<Node> = Grammar::with_default_skippers();
    grammar.rule("whitespace", |p, _| Ok(p.make_ast("whitespace-rule")));

    assert!(grammar.has_rule("whitespace"));
    assert!(grammar.has_skipper("whitespace"));
    assert!(grammar.resolve_skipper("missing").is_none());
    assert!(!grammar.has_rule("inline_whitespace"));
}

#[test]
fn test_default_skippers_registered() {
    let grammar: Grammar<Node> = Grammar::with_default_skippers();

    for name in DEFAULT_SKIPPERS {
        assert!(grammar.has_skipper(name), "missing skipper {}", name);
    }
    assert_eq!(grammar.get_skippers().len(), DEFAULT_SKIPPERS.len());
    assert!(grammar.get_patterns().is_empty());
}

#[test]
fn test_comment_skipper() {
    let grammar = Arc::new(Grammar::<Node>::with_default_skippers());
    let mut parser = Parser::with_cwd(grammar, Arc::new(NodeFactory), ".");
    parser.read_str("test.pt", "  // line\n  /* block\n */ x");

    assert!(parser.skip(Some("whitespace_and_comments")).unwrap());
    assert!(parser.input().starts_with("x"));
}

#[test]
fn test_concurrent_literal_registration() {
    let grammar = Arc::new(Grammar::<Node>::new());

    let rules: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let grammar = Arc::clone(&grammar);
                scope.spawn(move || grammar.resolve_rule(";"))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(grammar.token_count(), 1);
    for rule in &rules {
        assert!(Arc::ptr_eq(rule, &rules[0]));
    }
}
