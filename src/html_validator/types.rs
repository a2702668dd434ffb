//! Report types produced by the validation pipeline

use serde::{Deserialize, Serialize};

/// Severity of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Error,
    Warning,
    Info,
}

/// A single finding from the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    /// Whether the pipeline already repaired the problem in `repaired`
    pub fixed: bool,
}

impl Issue {
    pub fn fixed(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fixed: true,
        }
    }

    pub fn unfixed(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fixed: false,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == IssueKind::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    /// Input length in characters
    pub original_length: usize,
    /// Output length in characters
    pub repaired_length: usize,
    /// Number of pipeline stages that altered the markup
    pub changes_applied: usize,
}

/// Outcome of [`validate_and_repair_html`](super::validate_and_repair_html).
///
/// `is_valid` is derived from `issues` when the value is built and cannot be
/// set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    repaired: String,
    issues: Vec<Issue>,
    stats: ValidationStats,
}

impl ValidationResult {
    pub(crate) fn new(repaired: String, issues: Vec<Issue>, stats: ValidationStats) -> Self {
        let is_valid = !issues.iter().any(Issue::is_error);
        Self {
            is_valid,
            repaired,
            issues,
            stats,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub fn repaired(&self) -> &str {
        &self.repaired
    }

    #[must_use]
    pub fn into_repaired(self) -> String {
        self.repaired
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    #[must_use]
    pub fn stats(&self) -> &ValidationStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ValidationStats {
        ValidationStats {
            original_length: 0,
            repaired_length: 0,
            changes_applied: 0,
        }
    }

    #[test]
    fn validity_is_derived_from_error_issues() {
        let warnings = vec![Issue::fixed(IssueKind::Warning, "w"), Issue::fixed(IssueKind::Info, "i")];
        assert!(ValidationResult::new(String::new(), warnings, stats()).is_valid());

        let with_error = vec![Issue::unfixed(IssueKind::Error, "e")];
        assert!(!ValidationResult::new(String::new(), with_error, stats()).is_valid());
    }

    #[test]
    fn serializes_with_wire_names() {
        let result = ValidationResult::new(
            "<p>x</p>".to_string(),
            vec![Issue::fixed(IssueKind::Info, "Removed empty paragraphs")],
            stats(),
        );
        let json = serde_json::to_value(&result).expect("serializable");
        assert_eq!(json["isValid"], true);
        assert_eq!(json["issues"][0]["type"], "info");
        assert_eq!(json["issues"][0]["fixed"], true);
        assert_eq!(json["stats"]["changesApplied"], 0);
    }
}
