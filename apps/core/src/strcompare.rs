//! String comparison policies used to filter candidate rows.
//!
//! All comparisons are case-insensitive. An empty `test` matches any
//! `target`; a non-empty `test` never matches an empty `target`.

/// Leading marker that switches `choice` from progressive to substring
/// matching.
pub const LITERAL_MARKER: char = '\'';

/// Case-insensitive equality.
pub fn exact(test: &str, target: &str) -> bool {
    if test.is_empty() {
        return true;
    }
    if target.is_empty() {
        return false;
    }
    test.to_lowercase() == target.to_lowercase()
}

/// Case-insensitive substring containment.
pub fn includes(test: &str, target: &str) -> bool {
    if test.is_empty() {
        return true;
    }
    if target.is_empty() {
        return false;
    }
    target.to_lowercase().contains(&test.to_lowercase())
}

/// Ordered-subsequence match: every character of `test` must appear in
/// `target` at strictly increasing positions.
pub fn progressive(test: &str, target: &str) -> bool {
    if test.is_empty() {
        return true;
    }
    if target.is_empty() {
        return false;
    }

    let mut target_chars = target.chars().flat_map(char::to_lowercase);
    'test: for test_char in test.chars().flat_map(char::to_lowercase) {
        for target_char in target_chars.by_ref() {
            if target_char == test_char {
                continue 'test;
            }
        }
        return false;
    }
    true
}

/// Dispatch mode: a `test` starting with [`LITERAL_MARKER`] strips the marker
/// and performs a substring match, anything else is progressive.
pub fn choice(test: &str, target: &str) -> bool {
    if test.is_empty() {
        return true;
    }
    if target.is_empty() {
        return false;
    }
    match test.strip_prefix(LITERAL_MARKER) {
        Some(rest) => includes(rest, target),
        None => progressive(test, target),
    }
}
