//! Internal link suggestions for article bodies.
//!
//! Signals (keywords, entities, headings) are pulled from the source article,
//! published candidates are scored by overlap, and the best anchor texts are
//! wrapped in links to their targets. A related-articles footer is appended
//! whenever any candidate scored.

pub mod insertion;
pub mod opportunities;
pub mod scoring;
pub mod signals;

use serde::{Deserialize, Serialize};

use crate::article_store::{DocumentStore, LinkCandidate};
use crate::utils::{
    LINK_CANDIDATE_LIMIT, MAX_INLINE_LINKS, MAX_SCORED_CANDIDATES, MIN_ANCHOR_LENGTH,
    RELATED_ARTICLES_SHOWN, WORDS_PER_LINK, visible_word_count,
};

pub use insertion::{InsertionLimits, insert_inline_links, related_articles_footer};
pub use opportunities::{LinkOpportunity, build_opportunities};
pub use scoring::{ScoredCandidate, rank_candidates, score_candidate};
pub use signals::{DocumentSignals, extract_signals};

/// Body of a link-insertion request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    pub content: String,
    pub title: String,
    #[serde(default)]
    pub current_article_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInsertion {
    pub content: String,
    pub links_inserted: usize,
    pub related_articles_found: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerLimits {
    /// Published articles fetched as candidates
    pub candidate_limit: usize,
    /// Scored candidates kept after ranking
    pub max_scored_candidates: usize,
    pub max_inline_links: usize,
    /// One inline link is allowed per this many visible words
    pub words_per_link: usize,
    pub min_anchor_length: usize,
    /// Entries in the related-articles footer
    pub related_articles_shown: usize,
}

impl Default for LinkerLimits {
    fn default() -> Self {
        Self {
            candidate_limit: LINK_CANDIDATE_LIMIT,
            max_scored_candidates: MAX_SCORED_CANDIDATES,
            max_inline_links: MAX_INLINE_LINKS,
            words_per_link: WORDS_PER_LINK,
            min_anchor_length: MIN_ANCHOR_LENGTH,
            related_articles_shown: RELATED_ARTICLES_SHOWN,
        }
    }
}

impl LinkerLimits {
    /// Inline links allowed for a body of `word_count` visible words.
    #[must_use]
    pub fn link_target(&self, word_count: usize) -> usize {
        self.max_inline_links.min(word_count / self.words_per_link.max(1))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InternalLinker {
    limits: LinkerLimits,
}

impl InternalLinker {
    pub fn new(limits: LinkerLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub fn limits(&self) -> &LinkerLimits {
        &self.limits
    }

    /// Score `candidates` against the article and rewrite its content.
    pub fn insert_links(&self, content: &str, title: &str, candidates: &[LinkCandidate]) -> LinkInsertion {
        let signals = extract_signals(title, content);
        let ranked = rank_candidates(&signals, candidates, self.limits.max_scored_candidates);
        let opportunities = build_opportunities(&signals, &ranked, content);

        let target = self.limits.link_target(visible_word_count(content));
        let (mut linked, links_inserted) = insert_inline_links(
            content,
            &opportunities,
            &ranked,
            InsertionLimits {
                max_links: target,
                min_anchor_chars: self.limits.min_anchor_length,
            },
        );

        if let Some(footer) = related_articles_footer(&ranked, self.limits.related_articles_shown) {
            linked.push_str(&footer);
        }

        log::debug!(
            "{} keywords, {} entities, {} headings; {} candidates scored, {links_inserted}/{target} links",
            signals.keywords.len(),
            signals.entities.len(),
            signals.headings.len(),
            ranked.len()
        );

        LinkInsertion {
            content: linked,
            links_inserted,
            related_articles_found: ranked.len(),
        }
    }

    /// Fetch candidates from `store` and insert links into the request body.
    pub async fn run<S: DocumentStore>(&self, store: &S, request: &LinkRequest) -> anyhow::Result<LinkInsertion> {
        let candidates = store
            .fetch_link_candidates(request.current_article_id.as_deref(), self.limits.candidate_limit)
            .await?;

        let insertion = self.insert_links(&request.content, &request.title, &candidates);
        tracing::info!(
            candidates = candidates.len(),
            links_inserted = insertion.links_inserted,
            related = insertion.related_articles_found,
            "Inserted internal links"
        );
        Ok(insertion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPICS: [&str; 10] = [
        "river", "mountain", "forest", "desert", "ocean", "valley", "island", "canyon", "glacier",
        "meadow",
    ];

    fn candidate(slug: &str, title: &str) -> LinkCandidate {
        LinkCandidate {
            id: slug.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: Some(format!("All about {title}")),
            tags: Vec::new(),
            primary_keyword: None,
        }
    }

    /// 10 topic words plus 340 short filler words.
    fn three_hundred_fifty_words() -> String {
        let filler = vec!["xyz"; 340].join(" ");
        format!("<p>{} {filler}</p>", TOPICS.join(" "))
    }

    #[test]
    fn link_target_scales_with_length() {
        let limits = LinkerLimits::default();
        assert_eq!(limits.link_target(99), 0);
        assert_eq!(limits.link_target(350), 3);
        assert_eq!(limits.link_target(5000), 8);
    }

    #[test]
    fn caps_links_by_word_count() {
        let content = three_hundred_fifty_words();
        assert_eq!(visible_word_count(&content), 350);

        let candidates: Vec<LinkCandidate> = TOPICS
            .iter()
            .map(|t| candidate(&format!("{t}-guide"), &format!("{t} guide")))
            .collect();

        let result = InternalLinker::default().insert_links(&content, "Nature notes", &candidates);
        assert_eq!(result.links_inserted, 3);
        assert_eq!(result.related_articles_found, 10);
        assert_eq!(result.content.matches(r#"class="internal-link""#).count(), 3);
        assert_eq!(result.content.matches("<li>").count(), 5);
    }

    #[test]
    fn no_scored_candidates_means_no_footer() {
        let content = three_hundred_fifty_words();
        let candidates = vec![candidate("cricket", "Cricket scores")];
        let result = InternalLinker::default().insert_links(&content, "Nature notes", &candidates);
        assert_eq!(result.content, content);
        assert_eq!(result.links_inserted, 0);
        assert_eq!(result.related_articles_found, 0);
    }

    #[test]
    fn short_articles_still_get_a_footer() {
        let content = "<p>The river floods every year.</p>";
        let candidates = vec![candidate("river-guide", "River guide")];
        let result = InternalLinker::default().insert_links(content, "Floods", &candidates);
        assert_eq!(result.links_inserted, 0);
        assert!(result.content.starts_with(content));
        assert!(result.content.contains(r#"<a href="/article/river-guide">River guide</a>"#));
    }

    #[test]
    fn request_uses_camel_case() {
        let request: LinkRequest =
            serde_json::from_str(r#"{"content":"<p>x</p>","title":"T","currentArticleId":"42"}"#).unwrap();
        assert_eq!(request.current_article_id.as_deref(), Some("42"));
    }
}
