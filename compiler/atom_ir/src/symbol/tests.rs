use super::*;
use proptest::prelude::*;
use std::collections::HashMap;

#[test]
fn independently_built_symbols_are_equal() {
    let a = Symbol::new("foo");
    let b = Symbol::from(String::from("foo"));
    assert_eq!(a, b);
}

#[test]
fn equal_symbols_collide_as_keys() {
    let mut map = HashMap::new();
    map.insert(Symbol::new("foo"), 1);
    map.insert(Symbol::from("foo"), 2);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Symbol::new("foo")), Some(&2));
}

#[test]
fn lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(Symbol::new("bar"), 7);
    assert_eq!(map.get("bar"), Some(&7));
}

#[test]
fn display_is_raw_text() {
    assert_eq!(Symbol::new("evaluate-and-split").to_string(), "evaluate-and-split");
}

proptest! {
    #[test]
    fn equality_follows_text(a in "[a-z-]{1,8}", b in "[a-z-]{1,8}") {
        prop_assert_eq!(Symbol::new(a.as_str()) == Symbol::new(b.as_str()), a == b);
    }
}
