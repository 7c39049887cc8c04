//! `%` placeholder handling
//!
//! A single `%` marks a placeholder. `%%` is an escaped literal percent sign
//! and never counts as a placeholder.

/// Placeholder character
pub const PLACEHOLDER: char = '%';

/// Glob wildcard that stands in for a placeholder when searching `src/`
pub const GLOB_WILDCARD: &str = "*";

/// Find placeholder byte offsets in `s`, rightmost first.
///
/// Substituting in this order keeps the offsets of the placeholders that
/// are still pending valid.
pub fn locate(s: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut chars = s.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != PLACEHOLDER {
            continue;
        }
        if chars.peek().map(|(_, c)| *c) == Some(PLACEHOLDER) {
            chars.next(); // `%%`
        } else {
            positions.push(i);
        }
    }

    positions.reverse();
    positions
}

/// Check if `s` has at least one placeholder
pub fn has_placeholder(s: &str) -> bool {
    !locate(s).is_empty()
}

/// Replace every placeholder in `s` with `replacement`.
///
/// Escaped `%%` pairs are left untouched.
pub fn substitute(s: &str, replacement: &str) -> String {
    let mut result = s.to_string();
    for i in locate(s) {
        result.replace_range(i..i + PLACEHOLDER.len_utf8(), replacement);
    }
    result
}

/// Collapse escaped `%%` pairs into a literal `%`
pub fn unescape(s: &str) -> String {
    s.replace("%%", "%")
}

/// Turn a placeholder-bearing string into a glob pattern for `src/`
pub fn to_glob(s: &str) -> String {
    unescape(&substitute(s, GLOB_WILDCARD))
}
