//! Relevance scoring of candidate articles against source signals.

use super::signals::DocumentSignals;
use crate::article_store::LinkCandidate;

const KEYWORD_WEIGHT: u32 = 10;
const ENTITY_WEIGHT: u32 = 15;
const HEADING_WEIGHT: u32 = 12;
const TAG_WEIGHT: u32 = 20;

/// A candidate that shares at least one signal with the source article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate<'c> {
    pub candidate: &'c LinkCandidate,
    pub score: u32,
}

/// Lowercased title, excerpt, tags and primary keyword joined by spaces.
fn searchable_text(candidate: &LinkCandidate) -> String {
    let mut parts: Vec<&str> = vec![candidate.title.as_str()];
    parts.extend(candidate.excerpt.as_deref());
    parts.extend(candidate.tags.iter().map(String::as_str));
    parts.extend(candidate.primary_keyword.as_deref());
    parts.join(" ").to_lowercase()
}

pub fn score_candidate(signals: &DocumentSignals, candidate: &LinkCandidate) -> u32 {
    let text = searchable_text(candidate);
    let tags: Vec<String> = candidate
        .tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut score = 0;
    for keyword in &signals.keywords {
        if text.contains(keyword.as_str()) {
            score += KEYWORD_WEIGHT;
        }
        if tags
            .iter()
            .any(|tag| tag.contains(keyword.as_str()) || keyword.contains(tag.as_str()))
        {
            score += TAG_WEIGHT;
        }
    }
    for entity in &signals.entities {
        if text.contains(&entity.to_lowercase()) {
            score += ENTITY_WEIGHT;
        }
    }
    for heading in &signals.headings {
        if text.contains(&heading.to_lowercase()) {
            score += HEADING_WEIGHT;
        }
    }
    score
}

/// Score every candidate, drop zero scores, and keep the best `limit`,
/// highest first. Equal scores keep their fetch order.
pub fn rank_candidates<'c>(
    signals: &DocumentSignals,
    candidates: &'c [LinkCandidate],
    limit: usize,
) -> Vec<ScoredCandidate<'c>> {
    let mut scored: Vec<ScoredCandidate<'c>> = candidates
        .iter()
        .map(|candidate| ScoredCandidate {
            candidate,
            score: score_candidate(signals, candidate),
        })
        .filter(|scored| scored.score > 0)
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}
