//! Anchor-text candidates for each ranked target article.

use std::cmp::Reverse;

use super::scoring::ScoredCandidate;
use super::signals::{DocumentSignals, significant_words};

/// Keywords ranked above this position get the weaker keyword priority.
const STRONG_KEYWORD_RANKS: usize = 5;

/// A place where a link to `target` could be anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOpportunity {
    /// Index into the ranked candidate list
    pub target: usize,
    pub anchor_text: String,
    /// Lower is better
    pub priority: u8,
}

/// Build anchor-text opportunities for every ranked candidate, ordered by
/// priority and then by the candidate's relevance.
///
/// Per candidate, in order:
/// - source headings that mention a word from the candidate title (1)
/// - the first source entity contained in the candidate title (1)
/// - source keywords contained in the candidate title (2 for the top ranks, else 3)
/// - the candidate's primary keyword when it appears in the source (1 for
///   phrases, 2 for single words)
pub fn build_opportunities(
    signals: &DocumentSignals,
    ranked: &[ScoredCandidate<'_>],
    source_content: &str,
) -> Vec<LinkOpportunity> {
    let source_lower = source_content.to_lowercase();
    let mut opportunities = Vec::new();

    for (target, scored) in ranked.iter().enumerate() {
        let title = scored.candidate.title.to_lowercase();
        let title_words: Vec<String> = significant_words(&title).collect();
        let mut push = |anchor: &str, priority: u8| {
            opportunities.push(LinkOpportunity {
                target,
                anchor_text: anchor.to_string(),
                priority,
            });
        };

        for heading in &signals.headings {
            let heading_lower = heading.to_lowercase();
            if title_words.iter().any(|w| heading_lower.contains(w.as_str())) {
                push(heading.as_str(), 1);
            }
        }

        if let Some(entity) = signals
            .entities
            .iter()
            .find(|entity| title.contains(&entity.to_lowercase()))
        {
            push(entity.as_str(), 1);
        }

        for (rank, keyword) in signals.keywords.iter().enumerate() {
            if title.contains(keyword.as_str()) {
                push(keyword.as_str(), if rank < STRONG_KEYWORD_RANKS { 2 } else { 3 });
            }
        }

        if let Some(primary) = scored.candidate.primary_keyword.as_deref().map(str::trim)
            && !primary.is_empty()
            && source_lower.contains(&primary.to_lowercase())
        {
            let priority = if primary.contains(char::is_whitespace) { 1 } else { 2 };
            push(primary, priority);
        }
    }

    opportunities.sort_by_key(|opp| (opp.priority, Reverse(ranked[opp.target].score)));
    opportunities
}
