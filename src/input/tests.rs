//! Unit tests for the input stream.

use std::path::Path;

use regex::Regex;

use super::input::InputStream;

#[test]
fn test_eat_literal() {
    let mut input = InputStream::from_str("test.pt", "module main");

    assert!(input.eat("module"));
    assert_eq!(input.offset(), 6);
    assert!(!input.eat("main"));
    assert_eq!(input.offset(), 6);
    assert!(input.eat(" main"));
    assert!(input.at_eof());
}

#[test]
fn test_peek_and_next() {
    let mut input = InputStream::from_str("test.pt", "aé");

    assert_eq!(input.peek(), Some('a'));
    assert_eq!(input.next(), Some('a'));
    assert_eq!(input.next(), Some('é'));
    assert_eq!(input.offset(), 3);
    assert_eq!(input.next(), None);
}

#[test]
fn test_line_and_column_tracking() {
    let mut input = InputStream::from_str("test.pt", "module :name\n\n    main");

    input.advance_n(18);
    let position = input.get_position();

    assert_eq!(position.offset, 18);
    assert_eq!(position.line, 3);
    assert_eq!(position.column, 5);
    assert!(input.starts_with("main"));
}

#[test]
fn test_set_position_restores_cursor() {
    let mut input = InputStream::from_str("test.pt", "one\ntwo\nthree");
    let saved = input.get_position();

    input.advance_n(8);
    assert_eq!(input.get_position().line, 3);

    input.set_position(&saved);
    assert_eq!(input.get_position(), saved);
    assert_eq!(input.get_position().line, 1);
    assert_eq!(input.get_position().column, 1);
    assert_eq!(input.rest(), "one\ntwo\nthree");
}

#[test]
fn test_eat_regex_is_anchored_at_cursor() {
    let mut input = InputStream::from_str("test.pt", "abc 123");
    let digits = Regex::new("[0-9]+").unwrap();

    assert_eq!(input.eat_regex(&digits), None);
    assert_eq!(input.offset(), 0);

    input.advance_n(4);
    assert_eq!(input.eat_regex(&digits), Some("123".to_string()));
    assert!(input.at_eof());
}

#[test]
fn test_anchored_regex_stops_at_cursor() {
    let mut input = InputStream::from_str("test.pt", "abc 123");
    let digits = InputStream::anchored("[0-9]+|x").unwrap();

    assert_eq!(digits.as_str(), r"\A(?:[0-9]+|x)");
    assert_eq!(input.eat_regex(&digits), None);

    input.advance_n(4);
    assert_eq!(input.eat_regex(&digits), Some("123".to_string()));
    assert!(input.at_eof());
}

#[test]
fn test_advance_inside_multibyte_char() {
    let mut input = InputStream::from_str("test.pt", "éa\nü");

    input.advance_n(1);
    assert_eq!(input.offset(), 2);
    assert_eq!(input.get_position().column, 2);
    assert_eq!(input.peek(), Some('a'));

    input.advance_n(3);
    assert_eq!(input.get_position().line, 2);
    assert_eq!(input.get_position().column, 2);
    assert!(input.at_eof());
}

#[test]
fn test_eat_while() {
    let mut input = InputStream::from_str("test.pt", "  \t\nfoo");

    assert_eq!(input.eat_while(char::is_whitespace), "  \t\n");
    assert_eq!(input.get_position().line, 2);
    assert_eq!(input.eat_while(char::is_alphabetic), "foo");
    assert_eq!(input.eat_while(char::is_alphabetic), "");
}

#[test]
fn test_advance_is_clamped() {
    let mut input = InputStream::from_str("test.pt", "ab");

    input.advance_n(10);
    assert_eq!(input.offset(), 2);
    assert!(input.at_eof());
}

#[test]
fn test_describe_location() {
    let mut input = InputStream::from_str("file.pt", "module :name\n\n    end");
    input.advance_n(18);

    let position = input.get_position();
    assert_eq!(
        input.describe_location(&position),
        "-> file.pt:3:5\n  |\n3 |     end\n  |     ^"
    );
}

#[test]
fn test_from_missing_file() {
    let error = InputStream::from_file(Path::new("does/not/exist.pt")).unwrap_err();

    assert!(error.is_fatal());
    assert_eq!(error.get_error_name(), "ReadFailed");
}
