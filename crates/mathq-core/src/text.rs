//! UTF-8–safe string truncation for log previews.
//!
//! User-submitted questions go through tracing at several points, and
//! `&str[..n]` panics when `n` falls inside a multi-byte character (math
//! questions are full of them: ², √, π). These helpers snap to the nearest
//! char boundary so truncation is always safe.

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
///
/// Returns the longest prefix of `s` whose byte length is ≤ `max_bytes`
/// and that does not split a multi-byte character.
#[inline]
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

/// Short preview of user text for log fields: at most `max_bytes` bytes,
/// with `"..."` appended when truncated.
pub fn preview(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_owned();
    }
    format!("{}...", truncate_str(s, max_bytes))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_within_limit() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn ascii_truncated() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn empty_string() {
        assert_eq!(truncate_str("", 5), "");
    }

    #[test]
    fn superscript_boundary_snaps_back() {
        // '²' (U+00B2) is 2 bytes: x(0) ²(1,2) +(3) 1(4)
        let s = "x²+1";
        assert_eq!(truncate_str(s, 2), "x");
        assert_eq!(truncate_str(s, 3), "x²");
    }

    #[test]
    fn sqrt_symbol_three_bytes() {
        // '√' (U+221A) is 3 bytes
        let s = "√2";
        assert_eq!(truncate_str(s, 1), "");
        assert_eq!(truncate_str(s, 2), "");
        assert_eq!(truncate_str(s, 3), "√");
    }

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("short", 50), "short");
    }

    #[test]
    fn preview_long_text_gets_ellipsis() {
        assert_eq!(preview("hello world", 5), "hello...");
    }

    #[test]
    fn preview_never_splits_chars() {
        let p = preview("∫∫∫∫", 4);
        assert_eq!(p, "∫...");
    }
}
