use connect_four::{parse_column, parse_vote};

#[test]
fn test_parse_column() {
    assert_eq!(parse_column("3"), Some(3));
    assert_eq!(parse_column(" 9 \n"), Some(9));
    assert_eq!(parse_column("-1"), None);
    assert_eq!(parse_column("a"), None);
    assert_eq!(parse_column(""), None);
}

#[test]
fn test_parse_vote() {
    assert_eq!(parse_vote("y"), Some(true));
    assert_eq!(parse_vote("YES"), Some(true));
    assert_eq!(parse_vote(" n "), Some(false));
    assert_eq!(parse_vote("maybe"), None);
}
