//! Read-only checks for content that should not be saved as-is.
//!
//! Nothing here rewrites markup; every issue is reported with `fixed: false`.

use regex::Regex;
use std::sync::LazyLock;

use super::nesting::max_nesting_depth;
use super::types::{Issue, IssueKind};
use super::ValidatorLimits;
use crate::utils::char_len;

/// `on<name>=` anywhere in the markup (onclick, onload, onerror, ...).
///
/// Not tied to tag boundaries, so `<svg/onload=...>` and handlers after a
/// quoted `>` are caught. Plain text such as "onclick = x" is flagged too.
pub(crate) static INLINE_HANDLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bon\w+\s*=").expect("INLINE_HANDLER_RE: hardcoded regex is valid")
});

#[must_use]
pub fn has_inline_event_handlers(html: &str) -> bool {
    INLINE_HANDLER_RE.is_match(html)
}

pub fn detect_critical_issues(html: &str, limits: &ValidatorLimits) -> Vec<Issue> {
    let mut issues = Vec::new();

    if has_inline_event_handlers(html) {
        log::warn!("Inline event handler attribute found in content");
        issues.push(Issue::unfixed(
            IssueKind::Error,
            "Inline event handlers detected (security risk)",
        ));
    }

    let length = char_len(html);
    if length > limits.max_content_length {
        issues.push(Issue::unfixed(
            IssueKind::Warning,
            format!("Content is very large ({length} characters)"),
        ));
    }

    let depth = max_nesting_depth(html);
    if depth > limits.max_nesting_depth {
        issues.push(Issue::unfixed(
            IssueKind::Warning,
            format!("Excessive nesting depth detected ({depth} levels)"),
        ));
    }

    issues
}
