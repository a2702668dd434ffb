//! Shared configuration constants for content_repair
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Tag names that never take a closing tag.
///
/// These are excluded from balance and depth tracking. The list is the
/// short editor-facing set, not the full HTML void-element table.
pub const SELF_CLOSING_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// Content larger than this (in characters) is flagged with a warning.
pub const MAX_CONTENT_LENGTH: usize = 500_000;

/// Hard ceiling for the quick validation gate (in characters).
pub const QUICK_MAX_CONTENT_LENGTH: usize = 1_000_000;

/// Nesting deeper than this is flagged with a warning.
pub const MAX_NESTING_DEPTH: usize = 20;

/// Allowed drift between open and close tag counts in the quick gate.
///
/// Real editor output is rarely perfectly balanced, so small differences
/// are accepted.
pub const QUICK_TAG_MISMATCH_TOLERANCE: usize = 3;

/// Value injected into external links that carry no `rel` attribute.
pub const EXTERNAL_LINK_REL: &str = "noopener noreferrer";

/// Maximum number of keywords kept from signal extraction
pub const MAX_KEYWORDS: usize = 20;

/// Maximum number of capitalized entities kept from signal extraction
pub const MAX_ENTITIES: usize = 15;

/// Number of published articles fetched as link candidates
pub const LINK_CANDIDATE_LIMIT: usize = 30;

/// Number of scored candidates kept after ranking
pub const MAX_SCORED_CANDIDATES: usize = 15;

/// Absolute cap on inline links inserted into one article
pub const MAX_INLINE_LINKS: usize = 8;

/// One inline link is allowed per this many words of content
pub const WORDS_PER_LINK: usize = 100;

/// Anchor texts shorter than this (in characters) are never linked
pub const MIN_ANCHOR_LENGTH: usize = 4;

/// Number of candidates listed in the related-articles footer
pub const RELATED_ARTICLES_SHOWN: usize = 5;

/// Path prefix for article URLs
pub const ARTICLE_PATH_PREFIX: &str = "/article/";

/// Default number of articles examined by one batch repair run
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Upper bound accepted for `batchSize`
pub const MAX_BATCH_SIZE: usize = 500;

/// Default HTTP bind address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 30450;

/// Request body limit for the HTTP service: 4MB
///
/// Comfortably above the quick-gate ceiling once JSON escaping is counted.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Status value marking an article as published
pub const PUBLISHED_STATUS: &str = "published";

/// SQLite database used when neither the CLI nor a config file names one
pub const DEFAULT_DATABASE_PATH: &str = "content_repair.sqlite";
