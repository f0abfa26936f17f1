use super::*;
use crate::parse_items;
use atom_lexer::{tokenize, NoPragmas};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn parse_with(source: &str, syntax: &Syntax) -> Items {
    let tokens = tokenize(source, syntax, &mut NoPragmas).unwrap_or_default();
    parse_items(tokens, syntax)
}

fn parse(source: &str) -> Items {
    parse_with(source, &Syntax::default())
}

#[test]
fn flat_program() {
    assert_eq!(parse("3 4 add").to_string(), "(3 4 add)");
}

#[test]
fn nested_lists() {
    let items = parse("(1) (2) (a b) set");
    assert_eq!(items.len(), 4);
    assert_eq!(items.to_string(), "((1) (2) (a b) set)");
    assert_eq!(
        items.get(2),
        Some(Value::list(vec![Value::symbol("a"), Value::symbol("b")]))
    );
}

#[test]
fn empty_list() {
    assert_eq!(parse("()").to_string(), "(())");
}

#[test]
fn toggle_alternates() {
    assert_eq!(parse("|a b| c").to_string(), "((a b) c)");
    assert_eq!(parse("|a| |b|").to_string(), "((a) (b))");
}

#[test]
fn toggle_inside_parentheses() {
    assert_eq!(parse("(x |y| z)").to_string(), "((x (y) z))");
}

#[test]
fn missing_closer_returns_partial_list() {
    assert_eq!(parse("1 (2 (3").to_string(), "(1 (2 (3)))");
}

#[test]
fn stray_closer_ends_program() {
    assert_eq!(parse("1 ) 2 3").to_string(), "(1)");
}

#[test]
fn angle_bracket_variant() {
    let syntax = Syntax::default().with_angle_brackets();
    assert_eq!(parse_with("<a (b)>", &syntax).to_string(), "((a (b)))");
}

#[test]
fn apostrophe_toggle_variant() {
    let syntax = Syntax::default().with_apostrophe();
    assert_eq!(parse_with("'x' |y|", &syntax).to_string(), "((x) (y))");
}

#[test]
fn foreign_delimiter_becomes_symbol() {
    let tokens = vec![Token::Delimiter('<'), Token::Value(Value::Integer(1))];
    assert_eq!(
        parse_items(tokens, &Syntax::default()).to_string(),
        "(< 1)"
    );
}

fn splice(tokens: Vec<Token>) -> Token {
    Token::Splice(tokens)
}

#[test]
fn splice_joins_the_enclosing_list() {
    let tokens = vec![
        Token::Delimiter('('),
        Token::Value(Value::Integer(1)),
        splice(vec![Token::Value(Value::Integer(2)), Token::Value(Value::Integer(3))]),
        Token::Delimiter(')'),
    ];
    assert_eq!(parse_items(tokens, &Syntax::default()).to_string(), "((1 2 3))");
}

#[test]
fn stray_closer_in_a_splice_stays_inside_it() {
    let tokens = vec![
        Token::Delimiter('('),
        splice(vec![
            Token::Value(Value::Integer(1)),
            Token::Delimiter(')'),
            Token::Value(Value::Integer(9)),
        ]),
        Token::Value(Value::Integer(2)),
        Token::Delimiter(')'),
        Token::Value(Value::Integer(3)),
    ];
    assert_eq!(parse_items(tokens, &Syntax::default()).to_string(), "((1 2) 3)");
}

#[test]
fn unclosed_list_in_a_splice_ends_with_it() {
    let tokens = vec![
        splice(vec![Token::Delimiter('|'), Token::Value(Value::symbol("a"))]),
        Token::Delimiter('|'),
        Token::Value(Value::symbol("b")),
        Token::Delimiter('|'),
    ];
    assert_eq!(parse_items(tokens, &Syntax::default()).to_string(), "((a) (b))");
}

#[test]
fn deep_nesting() {
    let depth = 5_000;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let mut items = parse(&source);
    for _ in 0..depth {
        let inner = items.get(0).and_then(|value| value.as_list().cloned());
        assert!(inner.is_some());
        items = inner.unwrap_or_default();
    }
    assert_eq!(items.to_string(), "(x)");
}

fn tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        "[a-z][a-z-]{0,4}".prop_map(|s| Value::symbol(&s)),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(Value::list)
    })
}

proptest! {
    #[test]
    fn print_parse_round_trip(value in tree()) {
        let parsed = parse(&value.to_string());
        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(parsed.get(0), Some(value.clone()));
        prop_assert_eq!(parsed.to_string(), Items::single(value).to_string());
    }
}
