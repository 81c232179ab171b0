//! Word counting and statement truncation.

use std::borrow::Cow;

/// Suffix appended to truncated statements.
pub const TRUNCATION_MARKER: &str = "...";

/// Count whitespace-delimited words, ignoring empty tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncate `text` to at most `limit` words.
///
/// Text within the limit is returned borrowed and untouched. Longer text
/// becomes its first `limit` words joined by single spaces plus
/// [`TRUNCATION_MARKER`]. A `limit` of 0 disables truncation.
pub fn enforce_word_limit(text: &str, limit: usize) -> Cow<'_, str> {
    if limit == 0 || count_words(text) <= limit {
        return Cow::Borrowed(text);
    }

    let mut truncated = text
        .split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ");
    truncated.push_str(TRUNCATION_MARKER);
    Cow::Owned(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t "), 0);
        assert_eq!(count_words("one"), 1);
        assert_eq!(count_words("  one   two\nthree\t"), 3);
    }

    #[test]
    fn test_within_limit_is_identity() {
        let text = "  keep   my\nspacing ";
        let out = enforce_word_limit(text, 3);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert!(std::ptr::eq(out.as_ref(), text));
    }

    #[test]
    fn test_truncates_and_marks() {
        let out = enforce_word_limit("a b  c\nd e", 3);
        assert_eq!(out, "a b c...");
    }

    #[test]
    fn test_zero_limit_never_truncates() {
        let text = "one two three four";
        assert_eq!(enforce_word_limit(text, 0), text);
    }

    #[test]
    fn test_idempotent() {
        for (text, limit) in [
            ("the quick brown fox jumps over the lazy dog", 4),
            ("short", 4),
            ("exactly four words here", 4),
            ("a b c d e f", 1),
        ] {
            let once = enforce_word_limit(text, limit).into_owned();
            let twice = enforce_word_limit(&once, limit).into_owned();
            assert_eq!(once, twice, "text={text:?} limit={limit}");
            assert!(count_words(&once) <= limit);
        }
    }
}
