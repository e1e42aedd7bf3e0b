//! UTF-8-safe label truncation.
//!
//! Selection controls cap option labels at a fixed byte budget, and
//! `&str[..n]` panics when `n` lands inside a multi-byte character. These
//! helpers snap to the nearest char boundary so truncation is always safe.

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
///
/// Returns the longest prefix of `s` whose byte length is at most
/// `max_bytes` and that does not split a multi-byte character.
#[inline]
#[must_use]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    // `floor_char_boundary` is nightly-only, so walk backward ourselves.
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate `s` and append `...` when the original exceeds `max_bytes`.
///
/// The returned string is at most `max_bytes` bytes long including the
/// ellipsis. Item names come from free-form user input, so this is applied
/// to every option label before it reaches a selection control.
#[must_use]
pub fn ellipsize(s: &str, max_bytes: usize) -> String {
    const ELLIPSIS: &str = "...";
    if s.len() <= max_bytes {
        return s.to_owned();
    }
    let budget = max_bytes.saturating_sub(ELLIPSIS.len());
    format!("{}{ELLIPSIS}", truncate_str(s, budget))
}
