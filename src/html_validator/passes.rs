//! Fixed, ordered string-rewrite passes applied after tag balancing.
//!
//! Every pass is a pure `&str -> Cow<str>` that returns `Cow::Borrowed` when it
//! finds nothing to rewrite, and every pass is idempotent.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::types::IssueKind;
use crate::utils::EXTERNAL_LINK_REL;

// ============================================================================
// Regex Patterns
// ============================================================================

// Tag-name boundaries match the scanner's, so `<br>` is never bold and
// `<b/>` or `</b >` are renamed exactly when the scanner counts them.
static BOLD_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<b\b([^>]*)>").expect("BOLD_OPEN_RE: hardcoded regex is valid")
});

static BOLD_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</b\b[^>]*>").expect("BOLD_CLOSE_RE: hardcoded regex is valid"));

static ITALIC_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<i\b([^>]*)>").expect("ITALIC_OPEN_RE: hardcoded regex is valid")
});

static ITALIC_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</i\b[^>]*>").expect("ITALIC_CLOSE_RE: hardcoded regex is valid")
});

/// `<strong><a ...>TEXT</strong></a>`: emphasis opened outside the link but
/// closed inside it. TEXT may not contain further markup.
static STRONG_AROUND_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<strong>(<a\s[^>]*>)([^<]*)</strong></a>")
        .expect("STRONG_AROUND_LINK_RE: hardcoded regex is valid")
});

static EM_AROUND_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<em>(<a\s[^>]*>)([^<]*)</em></a>")
        .expect("EM_AROUND_LINK_RE: hardcoded regex is valid")
});

static ANCHOR_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<a\s[^>]*>").expect("ANCHOR_TAG_RE: hardcoded regex is valid")
});

static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+class\s*=\s*(?:"[^"]*"|'[^']*')"#)
        .expect("CLASS_ATTR_RE: hardcoded regex is valid")
});

/// Single anchor tag with an `http...` href and no `rel=` anywhere in it.
///
/// Only ever run against one tag found by [`ANCHOR_TAG_RE`], which keeps the
/// lookahead bounded by the tag length.
static EXTERNAL_LINK_WITHOUT_REL_RE: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r#"(?i)^<a\s(?![^>]*\brel\s*=)[^>]*?\bhref\s*=\s*["']?http"#)
        .expect("EXTERNAL_LINK_WITHOUT_REL_RE: hardcoded regex is valid")
});

static EMPTY_PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<p>\s*</p>").expect("EMPTY_PARAGRAPH_RE: hardcoded regex is valid")
});

// ============================================================================
// Passes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationPass {
    BoldTags,
    ItalicTags,
    NestedFormatting,
    LinkClasses,
    ExternalLinkRel,
    EmptyParagraphs,
}

impl NormalizationPass {
    /// Execution order.
    pub const ALL: [NormalizationPass; 6] = [
        NormalizationPass::BoldTags,
        NormalizationPass::ItalicTags,
        NormalizationPass::NestedFormatting,
        NormalizationPass::LinkClasses,
        NormalizationPass::ExternalLinkRel,
        NormalizationPass::EmptyParagraphs,
    ];

    pub fn apply(self, html: &str) -> Cow<'_, str> {
        match self {
            Self::BoldTags => rename_tag(html, &BOLD_OPEN_RE, &BOLD_CLOSE_RE, "strong"),
            Self::ItalicTags => rename_tag(html, &ITALIC_OPEN_RE, &ITALIC_CLOSE_RE, "em"),
            Self::NestedFormatting => fix_emphasis_around_links(html),
            Self::LinkClasses => strip_link_classes(html),
            Self::ExternalLinkRel => add_external_link_rel(html),
            Self::EmptyParagraphs => remove_empty_paragraphs(html),
        }
    }

    /// Cosmetic rewrites are `Info`; rewrites that change structure are `Warning`.
    #[must_use]
    pub fn issue_kind(self) -> IssueKind {
        match self {
            Self::NestedFormatting => IssueKind::Warning,
            _ => IssueKind::Info,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::BoldTags => "Normalized <b> tags to <strong>",
            Self::ItalicTags => "Normalized <i> tags to <em>",
            Self::NestedFormatting => "Fixed improperly nested formatting tags",
            Self::LinkClasses => "Removed class attributes from links",
            Self::ExternalLinkRel => "Added rel=\"noopener noreferrer\" to external links",
            Self::EmptyParagraphs => "Removed empty paragraphs",
        }
    }
}

fn rename_tag<'h>(html: &'h str, open: &Regex, close: &Regex, to: &str) -> Cow<'h, str> {
    let opened = open.replace_all(html, |caps: &Captures| {
        format!("<{to}{}>", caps.get(1).map_or("", |m| m.as_str()))
    });
    if !close.is_match(&opened) {
        return opened;
    }
    let closing = format!("</{to}>");
    Cow::Owned(close.replace_all(&opened, closing.as_str()).into_owned())
}

fn fix_emphasis_around_links(html: &str) -> Cow<'_, str> {
    let fixed = STRONG_AROUND_LINK_RE.replace_all(html, "${1}<strong>${2}</strong></a>");
    if !EM_AROUND_LINK_RE.is_match(&fixed) {
        return fixed;
    }
    Cow::Owned(
        EM_AROUND_LINK_RE
            .replace_all(&fixed, "${1}<em>${2}</em></a>")
            .into_owned(),
    )
}

fn strip_link_classes(html: &str) -> Cow<'_, str> {
    if !ANCHOR_TAG_RE
        .find_iter(html)
        .any(|tag| CLASS_ATTR_RE.is_match(tag.as_str()))
    {
        return Cow::Borrowed(html);
    }

    ANCHOR_TAG_RE.replace_all(html, |caps: &Captures| {
        CLASS_ATTR_RE.replace_all(&caps[0], "").into_owned()
    })
}

fn needs_rel(tag: &str) -> bool {
    EXTERNAL_LINK_WITHOUT_REL_RE
        .is_match(tag)
        .unwrap_or_else(|e| {
            log::warn!("Skipping rel check on anchor tag: {e}");
            false
        })
}

fn add_external_link_rel(html: &str) -> Cow<'_, str> {
    if !ANCHOR_TAG_RE.find_iter(html).any(|tag| needs_rel(tag.as_str())) {
        return Cow::Borrowed(html);
    }

    ANCHOR_TAG_RE.replace_all(html, |caps: &Captures| {
        let tag = &caps[0];
        if !needs_rel(tag) {
            return tag.to_string();
        }
        // Attribute text between `<a` and `>`
        let attrs = tag[2..tag.len() - 1].trim();
        format!(r#"<a {attrs} rel="{EXTERNAL_LINK_REL}">"#)
    })
}

/// Removes `<p></p>` and whitespace-only paragraphs until none remain, so
/// paragraphs that only wrapped empty paragraphs go too.
///
/// Single left-to-right pass: the output never holds an empty paragraph, so
/// each `</p>` only has to look back past trailing whitespace for a `<p>`.
fn remove_empty_paragraphs(html: &str) -> Cow<'_, str> {
    if !EMPTY_PARAGRAPH_RE.is_match(html) {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len());
    for ch in html.chars() {
        out.push(ch);
        if ch != '>' || !ends_with_ignore_case(&out, "</p>") {
            continue;
        }
        let body = out[..out.len() - "</p>".len()].trim_end_matches(char::is_whitespace);
        if ends_with_ignore_case(body, "<p>") {
            let start = body.len() - "<p>".len();
            out.truncate(start);
        }
    }
    Cow::Owned(out)
}

fn ends_with_ignore_case(haystack: &str, suffix: &str) -> bool {
    haystack.len() >= suffix.len()
        && haystack.as_bytes()[haystack.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pass: NormalizationPass, html: &str) -> String {
        pass.apply(html).into_owned()
    }

    #[test]
    fn bold_and_italic_become_semantic_tags() {
        assert_eq!(run(NormalizationPass::BoldTags, "<b>x</b> <B class=\"k\">y</B>"), "<strong>x</strong> <strong class=\"k\">y</strong>");
        assert_eq!(run(NormalizationPass::ItalicTags, "<i>y</i><I>z</I>"), "<em>y</em><em>z</em>");
    }

    #[test]
    fn bold_pass_leaves_similar_tags_alone() {
        let html = "<br><body><blockquote>q</blockquote><img src=a><iframe></iframe>";
        assert!(matches!(NormalizationPass::BoldTags.apply(html), Cow::Borrowed(_)));
        assert!(matches!(NormalizationPass::ItalicTags.apply(html), Cow::Borrowed(_)));
    }

    #[test]
    fn emphasis_closed_inside_link_is_moved_inside() {
        assert_eq!(
            run(NormalizationPass::NestedFormatting, r#"<strong><a href="/x">Read</strong></a>"#),
            r#"<a href="/x"><strong>Read</strong></a>"#
        );
        assert_eq!(
            run(NormalizationPass::NestedFormatting, r#"<em><a href="/y">More</em></a>"#),
            r#"<a href="/y"><em>More</em></a>"#
        );
    }

    #[test]
    fn nested_fix_only_handles_the_exact_shape() {
        let html = r#"<strong><a href="/x">Read <span>it</span></strong></a>"#;
        assert!(matches!(NormalizationPass::NestedFormatting.apply(html), Cow::Borrowed(_)));
    }

    #[test]
    fn link_classes_are_stripped() {
        assert_eq!(
            run(NormalizationPass::LinkClasses, r#"<a class="btn" href="/a" class='x'>a</a><p class="keep">p</p>"#),
            r#"<a href="/a">a</a><p class="keep">p</p>"#
        );
    }

    #[test]
    fn external_links_get_rel_once() {
        assert_eq!(
            run(NormalizationPass::ExternalLinkRel, r#"<a href="http://ex.com">t</a>"#),
            r#"<a href="http://ex.com" rel="noopener noreferrer">t</a>"#
        );
        let existing = r#"<a href="https://ex.com" rel="nofollow">t</a>"#;
        assert!(matches!(NormalizationPass::ExternalLinkRel.apply(existing), Cow::Borrowed(_)));
        let internal = r#"<a href="/article/x">t</a>"#;
        assert!(matches!(NormalizationPass::ExternalLinkRel.apply(internal), Cow::Borrowed(_)));
    }

    #[test]
    fn empty_paragraphs_are_removed() {
        assert_eq!(run(NormalizationPass::EmptyParagraphs, "<p></p><p>content</p><p>  \n </p>"), "<p>content</p>");
        assert_eq!(run(NormalizationPass::EmptyParagraphs, "<p><p></p></p>x"), "x");
        assert_eq!(run(NormalizationPass::EmptyParagraphs, "<P> <p>\t</P> </p>y<p>z</p>"), "y<p>z</p>");
        assert_eq!(run(NormalizationPass::EmptyParagraphs, "<p>a<p></p></p>"), "<p>a</p>");
    }

    #[test]
    fn every_pass_is_idempotent() {
        let html = r#"<b><a class="c" href="http://a.io">A</b></a><i>i</i><p> </p><p><p></p></p>"#;
        for pass in NormalizationPass::ALL {
            let once = run(pass, html);
            let twice = run(pass, &once);
            assert_eq!(once, twice, "{pass:?} is not idempotent");
        }
    }
}
