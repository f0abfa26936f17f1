use super::*;

#[test]
fn advance_steps_over_multibyte_chars() {
    let mut cursor = Cursor::new("éa");
    assert_eq!(cursor.current(), Some('é'));
    cursor.advance();
    assert_eq!(cursor.pos(), 2);
    assert_eq!(cursor.current(), Some('a'));
    cursor.advance();
    assert_eq!(cursor.current(), None);
    cursor.advance();
    assert_eq!(cursor.pos(), 3);
}

#[test]
fn eat_until_quote_stops_before_quote() {
    let mut cursor = Cursor::new("hello\" rest");
    assert_eq!(cursor.eat_until_quote(), "hello");
    assert_eq!(cursor.current(), Some('"'));
}

#[test]
fn eat_until_quote_runs_to_end() {
    let mut cursor = Cursor::new("no closer");
    assert_eq!(cursor.eat_until_quote(), "no closer");
    assert_eq!(cursor.current(), None);
}

#[test]
fn eat_while_and_slice() {
    let mut cursor = Cursor::new("abc def");
    let start = cursor.pos();
    cursor.eat_while(|c| !c.is_whitespace());
    assert_eq!(cursor.slice_from(start), "abc");
}
