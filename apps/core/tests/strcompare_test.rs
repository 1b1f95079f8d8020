use quickwin_core::strcompare::{choice, exact, includes, progressive};

#[test]
fn empty_test_matches_any_target() {
    assert!(exact("", "anything"));
    assert!(includes("", "anything"));
    assert!(progressive("", "anything"));
    assert!(choice("", "anything"));
    assert!(exact("", ""));
}

#[test]
fn nonempty_test_never_matches_empty_target() {
    assert!(!exact("a", ""));
    assert!(!includes("a", ""));
    assert!(!progressive("a", ""));
    assert!(!choice("a", ""));
}

#[test]
fn progressive_requires_strictly_increasing_positions() {
    assert!(progressive("fce", "finance"));
    assert!(progressive("finance", "finance"));
    assert!(!progressive("ff", "finance"));
    assert!(!progressive("ecn", "finance"));
}

#[test]
fn progressive_is_case_insensitive() {
    assert!(progressive("FCE", "Finance"));
    assert!(progressive("fce", "FINANCE"));
}

#[test]
fn choice_literal_marker_switches_to_substring() {
    assert!(choice("fce", "finance"));
    assert!(!choice("'fce", "finance"));
    assert!(choice("'inan", "finance"));
    assert!(choice("'FIN", "finance"));
}

#[test]
fn includes_matches_anywhere() {
    assert!(includes("pad", "Notepad.exe"));
    assert!(includes("note", "Notepad.exe"));
    assert!(!includes("xyz", "Notepad.exe"));
}
