//! Edge case tests for vmtc-lex

use crate::*;
use proptest::prelude::*;

/// EDGE CASE: Empty source
#[test]
fn test_edge_empty_source() {
    let mut lexer = Lexer::new("");
    assert!(!lexer.has_next());
    assert!(lexer.next().is_none());
}

/// EDGE CASE: Only comments and whitespace
#[test]
fn test_edge_only_comments() {
    let mut lexer = Lexer::new("// a\n   // b\n\t\n");
    assert!(lexer.next().is_none());
}

/// EDGE CASE: Advance past end leaves no current command
#[test]
fn test_edge_advance_past_end() {
    let mut lexer = Lexer::new("add");
    lexer.advance().unwrap();
    lexer.advance().unwrap();
    assert!(lexer.command().is_none());
    assert!(lexer.command_kind().is_err());
}

/// EDGE CASE: Index at u32 boundary
#[test]
fn test_edge_huge_index() {
    assert!(Command::parse("push local 4294967295").is_ok());
    assert!(matches!(
        Command::parse("push local 4294967296"),
        Err(CommandError::InvalidIndex(_))
    ));
}

/// EDGE CASE: Keywords are case sensitive
#[test]
fn test_edge_case_sensitive_keywords() {
    assert!(Command::parse("PUSH constant 1").is_err());
    assert!(Command::parse("push Constant 1").is_err());
    assert!(Command::parse("Add").is_err());
}

/// EDGE CASE: Command word that merely contains another keyword
#[test]
fn test_edge_no_substring_matching() {
    // `if-goto` must not be mistaken for `goto`, nor `popcount` for `pop`.
    assert_eq!(Command::parse("if-goto X").unwrap().kind(), CommandKind::If);
    assert!(Command::parse("popcount").is_err());
}

/// EDGE CASE: Symbols with all allowed punctuation
#[test]
fn test_edge_symbol_punctuation() {
    let cmd = Command::parse("call Foo.bar$baz:qux_1 0").unwrap();
    assert_eq!(cmd.arg1().unwrap(), "Foo.bar$baz:qux_1");
}

fn segment_strategy() -> impl Strategy<Value = Segment> {
    prop::sample::select(Segment::ALL.to_vec())
}

proptest! {
    /// Comments and padding never change what a line means.
    #[test]
    fn prop_padding_and_comments_are_ignored(
        segment in segment_strategy(),
        index in 0u32..40_000,
        lead in "[ \t]{0,4}",
        gap in "[ \t]{1,4}",
        comment in "[a-zA-Z0-9 ]{0,16}",
    ) {
        let line = format!("{lead}push{gap}{segment}{gap}{index} // {comment}");
        let parsed: Vec<_> = Lexer::new(&line).collect::<Result<_>>().unwrap();
        prop_assert_eq!(parsed, vec![(1, Command::Push { segment, index })]);
    }

    /// Display output parses back to the same command.
    #[test]
    fn prop_display_parse(segment in segment_strategy(), index in 0u32..100_000) {
        let cmd = Command::Pop { segment, index };
        prop_assert_eq!(cmd.to_string().parse::<Command>().unwrap(), cmd);
    }

    /// Arbitrary text never panics the scanner.
    #[test]
    fn prop_scanner_never_panics(source in "\\PC{0,200}") {
        for item in Lexer::new(&source) {
            let _ = item;
        }
    }
}
