//! Best-effort tag-shape scanner.
//!
//! Recognizes `<name ...>` and `</name>` tokens where `name` is
//! `[a-z][a-z0-9]*` (case-insensitive). Comments, CDATA, doctype and
//! attributes are not interpreted: a `<` that does not start a tag of this
//! shape is plain text, and a `>` inside a quoted attribute ends the token.
//! Malformed input never produces an error, only fewer events.

use regex::{CaptureMatches, Regex};
use std::sync::LazyLock;

use crate::utils::SELF_CLOSING_TAGS;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>").expect("TAG_RE: hardcoded regex is valid")
});

/// One open or close tag found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    /// Lowercased tag name
    pub tag_name: String,
    pub is_closing: bool,
    /// Byte offset of the `<` that starts the token
    pub position: usize,
}

impl TagEvent {
    /// Whether the tag never takes a closing counterpart.
    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        is_self_closing(&self.tag_name)
    }
}

#[must_use]
pub fn is_self_closing(tag_name: &str) -> bool {
    SELF_CLOSING_TAGS.contains(&tag_name)
}

/// Lazy left-to-right iterator over the tag events of a markup string.
///
/// Restart by building a new scanner over the same input.
pub struct TagScanner<'h> {
    matches: CaptureMatches<'static, 'h>,
}

impl<'h> TagScanner<'h> {
    pub fn new(html: &'h str) -> Self {
        Self {
            matches: TAG_RE.captures_iter(html),
        }
    }
}

impl Iterator for TagScanner<'_> {
    type Item = TagEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.matches.next()?;
        let whole = caps.get(0)?;
        Some(TagEvent {
            tag_name: caps[2].to_ascii_lowercase(),
            is_closing: !caps[1].is_empty(),
            position: whole.start(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(html: &str) -> Vec<(String, bool)> {
        TagScanner::new(html)
            .map(|e| (e.tag_name, e.is_closing))
            .collect()
    }

    #[test]
    fn scans_open_and_close_tags_in_order() {
        let events = names(r#"<P class="x">Hi <B>there</b></p>"#);
        assert_eq!(
            events,
            vec![
                ("p".to_string(), false),
                ("b".to_string(), false),
                ("b".to_string(), true),
                ("p".to_string(), true),
            ]
        );
    }

    #[test]
    fn records_byte_positions() {
        let positions: Vec<usize> = TagScanner::new("ab<i>c</i>").map(|e| e.position).collect();
        assert_eq!(positions, vec![2, 6]);
    }

    #[test]
    fn ignores_text_that_is_not_tag_shaped() {
        assert!(names("1 < 2 and 3 > 2").is_empty());
        assert!(names("<!-- comment --><!DOCTYPE html>").is_empty());
        assert!(names("").is_empty());
    }

    #[test]
    fn self_closing_names_are_flagged() {
        let events: Vec<TagEvent> = TagScanner::new("<br/><img src=x><div>").collect();
        assert!(events[0].is_self_closing());
        assert!(events[1].is_self_closing());
        assert!(!events[2].is_self_closing());
    }
}
