//! Best-effort HTML validation and repair for editor-produced article markup.
//!
//! The pipeline is a fixed sequence:
//! 1. Append closing tags for anything left open ([`balancer`])
//! 2. Run the normalization passes in order ([`passes`])
//! 3. Scan the result for content that should block a save ([`detector`])
//!
//! This is a heuristic repair tool built on a regex tag scanner, not an HTML5
//! parser. Comments, CDATA and attributes containing `>` are not understood,
//! and tags closed in the wrong place are not moved.

pub mod balancer;
pub mod detector;
pub mod nesting;
pub mod passes;
pub mod scanner;
pub mod types;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::utils::{
    MAX_CONTENT_LENGTH, MAX_NESTING_DEPTH, QUICK_MAX_CONTENT_LENGTH, QUICK_TAG_MISMATCH_TOLERANCE,
    char_len,
};

pub use balancer::balance_tags;
pub use detector::{detect_critical_issues, has_inline_event_handlers};
pub use nesting::{NestingTracker, max_nesting_depth, residual_stack};
pub use passes::NormalizationPass;
pub use scanner::{TagEvent, TagScanner};
pub use types::{Issue, IssueKind, ValidationResult, ValidationStats};

/// Thresholds used by the critical-issue detector and the quick gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorLimits {
    pub max_content_length: usize,
    pub quick_max_content_length: usize,
    pub max_nesting_depth: usize,
    pub quick_tag_mismatch_tolerance: usize,
}

impl Default for ValidatorLimits {
    fn default() -> Self {
        Self {
            max_content_length: MAX_CONTENT_LENGTH,
            quick_max_content_length: QUICK_MAX_CONTENT_LENGTH,
            max_nesting_depth: MAX_NESTING_DEPTH,
            quick_tag_mismatch_tolerance: QUICK_TAG_MISMATCH_TOLERANCE,
        }
    }
}

/// One stage of the shared repair pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairStep {
    UnclosedTags,
    Normalize(NormalizationPass),
}

impl RepairStep {
    #[must_use]
    pub fn issue_kind(self) -> IssueKind {
        match self {
            Self::UnclosedTags => IssueKind::Warning,
            Self::Normalize(pass) => pass.issue_kind(),
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::UnclosedTags => "Fixed unclosed HTML tags",
            Self::Normalize(pass) => pass.message(),
        }
    }

    #[must_use]
    pub fn to_issue(self) -> Issue {
        Issue::fixed(self.issue_kind(), self.message())
    }
}

/// Repaired markup plus the stages that changed it, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub repaired: String,
    pub applied: Vec<RepairStep>,
}

impl RepairOutcome {
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Upper bound on normalization rounds. A later pass can expose work for an
/// earlier one (removing `<p></p>` can complete a mis-nested link), so rounds
/// repeat until nothing changes.
const MAX_NORMALIZATION_ROUNDS: usize = 4;

/// Balance tags, then run the normalization passes until they settle.
///
/// This is the single repair implementation shared by the interactive
/// validator and the batch repair job. Each stage appears at most once in
/// `applied`, in pipeline order.
pub fn repair_content(html: &str) -> RepairOutcome {
    let mut applied = Vec::new();

    let mut current = match balance_tags(html) {
        Cow::Owned(balanced) => {
            applied.push(RepairStep::UnclosedTags);
            balanced
        }
        Cow::Borrowed(_) => html.to_string(),
    };

    let mut changed = [false; NormalizationPass::ALL.len()];
    for _ in 0..MAX_NORMALIZATION_ROUNDS {
        let mut round_changed = false;
        for (index, pass) in NormalizationPass::ALL.into_iter().enumerate() {
            let rewritten = match pass.apply(&current) {
                Cow::Owned(next) if next != current => Some(next),
                _ => None,
            };
            if let Some(next) = rewritten {
                log::trace!("{pass:?} rewrote content");
                changed[index] = true;
                round_changed = true;
                current = next;
            }
        }
        if !round_changed {
            break;
        }
    }

    applied.extend(
        NormalizationPass::ALL
            .into_iter()
            .zip(changed)
            .filter_map(|(pass, hit)| hit.then_some(RepairStep::Normalize(pass))),
    );

    RepairOutcome {
        repaired: current,
        applied,
    }
}

/// Validator bound to a set of thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlValidator {
    limits: ValidatorLimits,
}

impl HtmlValidator {
    pub fn new(limits: ValidatorLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub fn limits(&self) -> &ValidatorLimits {
        &self.limits
    }

    /// Repair `html` and report what was fixed and what still needs attention.
    ///
    /// Never fails: malformed input always yields a result.
    pub fn validate(&self, html: &str) -> ValidationResult {
        let outcome = repair_content(html);

        let mut issues: Vec<Issue> = outcome.applied.iter().map(|step| step.to_issue()).collect();
        issues.extend(detect_critical_issues(&outcome.repaired, &self.limits));

        let stats = ValidationStats {
            original_length: char_len(html),
            repaired_length: char_len(&outcome.repaired),
            changes_applied: outcome.applied.len(),
        };

        ValidationResult::new(outcome.repaired, issues, stats)
    }

    /// Cheap heuristic gate with no repair.
    ///
    /// Rejects empty input, inline event handlers, oversized content, and
    /// markup whose open and close tag counts drift apart by more than the
    /// configured tolerance. Not authoritative.
    pub fn quick_validate(&self, html: &str) -> bool {
        if html.is_empty() || has_inline_event_handlers(html) {
            return false;
        }
        if char_len(html) > self.limits.quick_max_content_length {
            return false;
        }

        let (mut open, mut self_closing, mut close) = (0usize, 0usize, 0usize);
        for event in TagScanner::new(html) {
            if event.is_closing {
                close += 1;
                continue;
            }
            open += 1;
            if event.is_self_closing() || ends_with_slash(html, event.position) {
                self_closing += 1;
            }
        }

        open.abs_diff(self_closing + close) <= self.limits.quick_tag_mismatch_tolerance
    }
}

/// Whether the tag token starting at `start` is written `<... />`.
fn ends_with_slash(html: &str, start: usize) -> bool {
    html[start..]
        .find('>')
        .is_some_and(|end| html[start..start + end].ends_with('/'))
}

/// Run the full pipeline with default thresholds.
pub fn validate_and_repair_html(html: &str) -> ValidationResult {
    HtmlValidator::default().validate(html)
}

/// Quick gate with default thresholds.
pub fn quick_validate_html(html: &str) -> bool {
    HtmlValidator::default().quick_validate(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_unclosed_legacy_bold() {
        let result = validate_and_repair_html("<p>Hello <b>world");
        assert_eq!(result.repaired(), "<p>Hello <strong>world</strong></p>");
        assert!(result.is_valid());

        let messages: Vec<(IssueKind, &str)> = result
            .issues()
            .iter()
            .map(|i| (i.kind, i.message.as_str()))
            .collect();
        assert_eq!(
            messages,
            vec![
                (IssueKind::Warning, "Fixed unclosed HTML tags"),
                (IssueKind::Info, "Normalized <b> tags to <strong>"),
            ]
        );
        assert_eq!(result.stats().changes_applied, 2);
        assert_eq!(result.stats().original_length, 17);
        assert_eq!(result.stats().repaired_length, 35);
    }

    #[test]
    fn clean_input_passes_through_untouched() {
        let html = "<p>Nothing to do here.</p>";
        let result = validate_and_repair_html(html);
        assert_eq!(result.repaired(), html);
        assert!(result.issues().is_empty());
        assert_eq!(result.stats().changes_applied, 0);
    }

    #[test]
    fn inline_handlers_invalidate_the_result() {
        let html = r#"<div onclick="x()">hi</div>"#;
        assert!(!validate_and_repair_html(html).is_valid());
        assert!(!quick_validate_html(html));
    }

    #[test]
    fn second_run_applies_no_changes() {
        let html = r#"<div><b><a class="x" href="http://a.io">A</b></a><p></p><i>t"#;
        let first = validate_and_repair_html(html);
        let second = validate_and_repair_html(first.repaired());
        assert_eq!(second.repaired(), first.repaired());
        assert_eq!(second.stats().changes_applied, 0);
    }

    #[test]
    fn later_passes_can_unlock_earlier_ones() {
        let outcome = repair_content(r#"<strong><a href="/y">T</strong><p></p></a>"#);
        assert_eq!(outcome.repaired, r#"<a href="/y"><strong>T</strong></a></strong>"#);
        assert_eq!(
            outcome.applied,
            vec![
                RepairStep::UnclosedTags,
                RepairStep::Normalize(NormalizationPass::NestedFormatting),
                RepairStep::Normalize(NormalizationPass::EmptyParagraphs),
            ]
        );
        assert!(!repair_content(&outcome.repaired).changed());
    }

    #[test]
    fn quick_gate_tolerates_small_drift() {
        assert!(quick_validate_html("<p>one<p>two<p>three"));
        assert!(!quick_validate_html("<div><div><div><div>deep"));
        assert!(quick_validate_html("<p>a<br/>b<img src=x /></p>"));
        assert!(!quick_validate_html(""));
    }

    #[test]
    fn quick_gate_rejects_oversized_content() {
        let validator = HtmlValidator::new(ValidatorLimits {
            quick_max_content_length: 10,
            ..ValidatorLimits::default()
        });
        assert!(!validator.quick_validate("<p>too long</p>"));
        assert!(validator.quick_validate("<p>ok</p>"));
    }
}
