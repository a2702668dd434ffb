//! Keyword, entity and heading extraction from a source article.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{MAX_ENTITIES, MAX_KEYWORDS, collapse_whitespace, strip_tags};

/// Words ignored when building keyword frequencies and title-word sets.
///
/// Only words longer than three characters are ever considered, so short
/// function words are not listed.
pub const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "although", "among", "another",
    "because", "been", "before", "being", "below", "between", "both", "could", "does", "doing",
    "down", "during", "each", "either", "even", "every", "from", "further", "have", "having",
    "here", "hers", "herself", "himself", "into", "itself", "just", "like", "made", "make",
    "many", "more", "most", "much", "must", "neither", "only", "other", "ours", "ourselves",
    "over", "same", "should", "since", "some", "such", "than", "that", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "under", "until",
    "upon", "very", "want", "were", "what", "when", "where", "which", "while", "whom", "whose",
    "will", "with", "within", "without", "would", "your", "yours", "yourself", "yourselves",
];

/// Capitalized words that start sentences rather than names.
///
/// Stripped from the front of an entity match; a match left with fewer than
/// two words is discarded.
const COMMON_ENTITY_WORDS: &[&str] = &[
    "The", "This", "That", "These", "Those", "There", "Their", "They", "What", "When", "Where",
    "Which", "While", "Who", "Why", "How", "With", "From", "Into", "About", "After", "Before",
    "However", "Also", "Here", "It", "In", "On", "At", "For", "And", "But", "If", "As", "By",
    "Of", "To", "An", "Our", "We", "You", "Your", "Read", "Click",
];

static WORD_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("WORD_SPLIT_RE: hardcoded regex is valid"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").expect("ENTITY_RE: hardcoded regex is valid")
});

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([23])\b[^>]*>(.*?)</h[23]\s*>").expect("HEADING_RE: hardcoded regex is valid")
});

/// Signals extracted from one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSignals {
    /// Lowercase keywords, most frequent first
    pub keywords: Vec<String>,
    /// Capitalized multi-word phrases, most frequent first
    pub entities: Vec<String>,
    /// `<h2>`/`<h3>` text in document order
    pub headings: Vec<String>,
}

pub fn extract_signals(title: &str, content: &str) -> DocumentSignals {
    // The full stop keeps an entity from running from the title into the body.
    let text = format!("{title}. {}", strip_tags(content));
    DocumentSignals {
        keywords: extract_keywords(&text),
        entities: extract_entities(&text),
        headings: extract_headings(content),
    }
}

/// Lowercased words of `text` longer than three characters that are not
/// stop words, in order of appearance.
pub fn significant_words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_SPLIT_RE
        .split(text)
        .filter(|w| w.chars().count() > 3)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
}

pub fn extract_keywords(text: &str) -> Vec<String> {
    top_by_frequency(significant_words(text), MAX_KEYWORDS)
}

pub fn extract_entities(text: &str) -> Vec<String> {
    let phrases = ENTITY_RE.find_iter(text).filter_map(|m| {
        let words: Vec<&str> = m
            .as_str()
            .split_whitespace()
            .skip_while(|w| COMMON_ENTITY_WORDS.contains(w))
            .collect();
        (words.len() >= 2).then(|| words.join(" "))
    });
    top_by_frequency(phrases, MAX_ENTITIES)
}

pub fn extract_headings(content: &str) -> Vec<String> {
    HEADING_RE
        .captures_iter(content)
        .map(|caps| collapse_whitespace(&strip_tags(&caps[2])))
        .filter(|heading| !heading.is_empty())
        .collect()
}

/// Most frequent items first; ties keep first-appearance order.
fn top_by_frequency(items: impl Iterator<Item = String>, limit: usize) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        match index.get(&item) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(item.clone(), order.len());
                order.push((item, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().take(limit).map(|(item, _)| item).collect()
}
