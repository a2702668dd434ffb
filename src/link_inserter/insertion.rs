//! Inline link insertion and the related-articles footer.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::opportunities::LinkOpportunity;
use super::scoring::ScoredCandidate;
use crate::utils::ARTICLE_PATH_PREFIX;
use crate::utils::string_utils::truncate_at_word;

static ANCHOR_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<a[\s>]").expect("ANCHOR_OPEN_RE: hardcoded regex is valid"));

static ANCHOR_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</a\s*>").expect("ANCHOR_CLOSE_RE: hardcoded regex is valid"));

/// Excerpts in the footer are cut to this many characters.
const FOOTER_EXCERPT_CHARS: usize = 160;

/// Whether `index` falls between an `<a ...>` and its `</a>`.
///
/// Counts anchor opens and closes before `index`; any difference means an
/// anchor is still open there.
pub fn is_inside_anchor(html: &str, index: usize) -> bool {
    let before = &html[..index];
    ANCHOR_OPEN_RE.find_iter(before).count() != ANCHOR_CLOSE_RE.find_iter(before).count()
}

/// Whether `index` falls inside tag markup, such as an attribute value.
fn is_inside_tag(html: &str, index: usize) -> bool {
    let before = &html[..index];
    match (before.rfind('<'), before.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

#[must_use]
pub fn article_href(slug: &str) -> String {
    format!("{ARTICLE_PATH_PREFIX}{}", html_escape::encode_double_quoted_attribute(slug))
}

/// Rules applied while walking opportunities.
#[derive(Debug, Clone, Copy)]
pub struct InsertionLimits {
    pub max_links: usize,
    pub min_anchor_chars: usize,
}

/// Wrap the first clear occurrence of each opportunity's anchor text in a link
/// to its target, until `max_links` links have been placed.
///
/// An opportunity is skipped when its anchor text (case-insensitive) was
/// already linked, the anchor is too short, or the first whole-word match
/// sits inside an existing anchor. Matches inside tag markup (attribute
/// values, tag names) are skipped as well. Later occurrences are never tried.
/// One target can receive several links through different anchors.
pub fn insert_inline_links(
    content: &str,
    opportunities: &[LinkOpportunity],
    ranked: &[ScoredCandidate<'_>],
    limits: InsertionLimits,
) -> (String, usize) {
    let mut html = content.to_string();
    let mut used_anchors: HashSet<String> = HashSet::new();
    let mut inserted = 0;

    for opportunity in opportunities {
        if inserted >= limits.max_links {
            break;
        }

        let anchor = opportunity.anchor_text.trim();
        let anchor_key = anchor.to_lowercase();
        if anchor.chars().count() < limits.min_anchor_chars || used_anchors.contains(&anchor_key) {
            continue;
        }

        let pattern = format!(r"(?i)\b{}\b", regex::escape(anchor));
        let matcher = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                log::debug!("Skipping anchor '{anchor}': {e}");
                continue;
            }
        };

        let Some(found) = matcher.find(&html) else {
            continue;
        };
        if is_inside_anchor(&html, found.start()) || is_inside_tag(&html, found.start()) {
            continue;
        }

        let slug = &ranked[opportunity.target].candidate.slug;
        let link = format!(
            r#"<a href="{}" class="internal-link">{}</a>"#,
            article_href(slug),
            found.as_str()
        );
        let (start, end) = (found.start(), found.end());
        html.replace_range(start..end, &link);

        log::debug!("Linked '{anchor}' to {slug}");
        used_anchors.insert(anchor_key);
        inserted += 1;
    }

    (html, inserted)
}

/// `<h2>Related Articles</h2>` block listing the first `count` ranked
/// candidates, or `None` when nothing was ranked.
pub fn related_articles_footer(ranked: &[ScoredCandidate<'_>], count: usize) -> Option<String> {
    if ranked.is_empty() {
        return None;
    }

    let mut footer = String::from("\n<h2>Related Articles</h2>\n<ul class=\"related-articles\">\n");
    for scored in ranked.iter().take(count) {
        let candidate = scored.candidate;
        footer.push_str(&format!(
            "<li><a href=\"{}\">{}</a>",
            article_href(&candidate.slug),
            html_escape::encode_text(&candidate.title)
        ));
        if let Some(excerpt) = candidate.excerpt.as_deref().map(str::trim)
            && !excerpt.is_empty()
        {
            footer.push_str(" - ");
            footer.push_str(&html_escape::encode_text(&truncate_at_word(
                excerpt,
                FOOTER_EXCERPT_CHARS,
            )));
        }
        footer.push_str("</li>\n");
    }
    footer.push_str("</ul>");
    Some(footer)
}
