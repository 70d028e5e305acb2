//! Common utility functions shared across the codebase.

use std::sync::LazyLock;

use regex::Regex;

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Checks if the text contains at least one character of the extraction target script
/// (CJK Unified Ideographs, including Extension A).
///
/// # Examples
///
/// ```
/// use glotmod::utils::contains_target_text;
///
/// assert!(contains_target_text("确认删除吗？"));
/// assert!(contains_target_text("Hello 世界"));
/// assert!(!contains_target_text("Hello"));
/// assert!(!contains_target_text("？！，"));
/// assert!(!contains_target_text(""));
/// ```
pub fn contains_target_text(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '\u{4e00}'..='\u{9fff}' | '\u{3400}'..='\u{4dbf}'))
}

/// Checks if `name` is a plain JavaScript identifier (ASCII subset).
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// Convert a path segment like `user-profile` or `UserProfile` to `userProfile`.
pub fn to_lower_camel(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for c in segment.chars() {
        if !c.is_ascii_alphanumeric() {
            upper_next = !out.is_empty();
            continue;
        }
        if out.is_empty() {
            out.push(c.to_ascii_lowercase());
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
