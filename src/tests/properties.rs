//! Loading named values from `key=value` text.

use rstest::rstest;

use crate::properties::parse_properties;
use crate::*;

#[test]
fn pairs_are_split_on_the_separator() {
    let pairs = parse_properties("port=8080\n\nhost=localhost\r\nempty=\n").unwrap();
    assert_eq!(
        pairs,
        vec![
            (String::from("port"), String::from("8080")),
            (String::from("host"), String::from("localhost")),
            (String::from("empty"), String::new()),
        ]
    );
}

#[rstest]
#[case::no_separator("port=8080\nhost", 2, "host")]
#[case::two_separators("url=a=b", 1, "url=a=b")]
#[case::trailing_separator("port=8080\n\nport==", 3, "port==")]
#[case::whitespace_only("port=8080\n  \nhost=a", 2, "  ")]
fn malformed_lines_are_rejected(#[case] text: &str, #[case] line: usize, #[case] content: &str) {
    let err = parse_properties(text).unwrap_err();
    assert!(matches!(
        err,
        WiringError::MalformedProperty { line: l, content: ref c } if l == line && c == content
    ));
}

#[test]
fn malformed_text_registers_nothing() {
    let mut context = BringUpContext::new();
    assert!(context.load_properties("port=8080\nbroken").is_err());

    let count = context.load_properties("port=9090").expect("port is still free");
    assert_eq!(count, 1);
}

#[test]
fn duplicate_keys_are_rejected() {
    let mut context = BringUpContext::new();
    let err = context.load_properties("port=1\nport=2").unwrap_err();
    assert!(matches!(err, WiringError::DuplicateValue { ref name, .. } if name == "port"));
}

#[test]
fn loaded_values_are_injected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.properties");
    std::fs::write(&path, "db.url=postgres://localhost/app\n").unwrap();

    let db = shared(super::support::Database::default());
    let mut context = BringUpContext::new();
    assert_eq!(context.load_properties_file(&path).unwrap(), 1);
    context.register(db.clone()).unwrap();
    context.start().unwrap();

    assert_eq!(db.read().unwrap().url, "postgres://localhost/app");
}

#[test]
fn unreadable_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut context = BringUpContext::new();

    let err = context
        .load_properties_file(dir.path().join("missing.properties"))
        .unwrap_err();
    assert!(matches!(err, WiringError::Io { .. }));
}
