//! Plain-text helpers shared by the validator and the link inserter
//!
//! All functions here operate on Unicode characters rather than bytes so that
//! lengths reported to callers match what an editor shows, and slicing never
//! lands inside a multi-byte character.

use regex::Regex;
use std::sync::LazyLock;

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("ANY_TAG_RE: hardcoded regex is valid"));

/// Length of a string in Unicode characters.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Replace every tag-shaped token with a single space.
///
/// Best-effort: anything between `<` and the next `>` is treated as markup.
pub fn strip_tags(html: &str) -> String {
    ANY_TAG_RE.replace_all(html, " ").into_owned()
}

/// Count whitespace-separated words in the visible text of an HTML fragment.
pub fn visible_word_count(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// # Examples
/// ```
/// # use content_repair::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Shorten `s` to at most `max_chars` characters, cutting at the last
/// whitespace inside the limit and appending an ellipsis when anything was
/// removed.
///
/// # Examples
/// ```
/// # use content_repair::utils::string_utils::truncate_at_word;
/// assert_eq!(truncate_at_word("Hello wonderful world", 12), "Hello…");
/// assert_eq!(truncate_at_word("Short", 12), "Short");
/// ```
pub fn truncate_at_word(s: &str, max_chars: usize) -> String {
    let head = safe_truncate_chars(s, max_chars);
    if head.len() == s.len() {
        return s.to_string();
    }

    let cut = head.rfind(char::is_whitespace).unwrap_or(head.len());
    format!("{}…", head[..cut].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_counts_words() {
        let html = "<p>One <strong>two</strong></p><p>three</p>";
        assert_eq!(collapse_whitespace(&strip_tags(html)), "One two three");
        assert_eq!(visible_word_count(html), 3);
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len(""), 0);
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        assert_eq!(safe_truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_at_word("日本 語テキスト", 4), "日本…");
    }
}
