//! Batch repair of stored article content.
//!
//! Loads published articles, runs the shared repair pipeline on each, and
//! writes back only the ones that changed. Dry runs (the default) never write.

use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::article_store::{Article, ArticleSelection, DocumentStore};
use crate::html_validator::repair_content;
use crate::utils::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, char_len};

fn default_dry_run() -> bool {
    true
}

/// Body of a batch repair request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequest {
    /// Restrict the batch to these ids; absent or empty means all
    #[serde(default)]
    pub article_ids: Option<Vec<String>>,
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

impl Default for RepairRequest {
    fn default() -> Self {
        Self {
            article_ids: None,
            dry_run: true,
            batch_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResult {
    pub article_id: String,
    pub title: String,
    pub had_issues: bool,
    pub issues_fixed: Vec<String>,
    pub original_length: usize,
    pub repaired_length: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairSummary {
    pub total_checked: usize,
    pub articles_with_issues: usize,
    /// Successful writes; always zero for dry runs
    pub articles_repaired: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResponse {
    pub success: bool,
    pub dry_run: bool,
    pub summary: RepairSummary,
    pub results: Vec<RepairResult>,
}

#[derive(Debug, Clone, Copy)]
pub struct RepairJob {
    default_batch_size: usize,
    max_batch_size: usize,
}

impl Default for RepairJob {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE)
    }
}

impl RepairJob {
    pub fn new(default_batch_size: usize, max_batch_size: usize) -> Self {
        Self {
            default_batch_size,
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// Requested batch size, or the default, clamped to `1..=max_batch_size`.
    #[must_use]
    pub fn effective_batch_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_batch_size)
            .clamp(1, self.max_batch_size)
    }

    /// Run one batch.
    ///
    /// Only the initial fetch can fail the run. A failed write is recorded as
    /// an `Error: ...` entry on that article and the batch carries on.
    pub async fn run<S: DocumentStore>(&self, store: &S, request: &RepairRequest) -> anyhow::Result<RepairResponse> {
        let run_id = Uuid::new_v4();
        let batch_size = self.effective_batch_size(request.batch_size);
        let span = tracing::info_span!("repair_batch", %run_id, dry_run = request.dry_run, batch_size);

        async move {
            let selection = ArticleSelection::from_ids(request.article_ids.clone());
            let articles = store.fetch_published(&selection, batch_size).await?;
            tracing::info!(count = articles.len(), "Checking articles");

            let mut summary = RepairSummary {
                total_checked: articles.len(),
                ..RepairSummary::default()
            };
            let mut results = Vec::with_capacity(articles.len());

            for article in &articles {
                let (result, written) = self.repair_one(store, article, request.dry_run).await;
                if result.had_issues {
                    summary.articles_with_issues += 1;
                }
                if written {
                    summary.articles_repaired += 1;
                }
                results.push(result);
            }

            tracing::info!(
                checked = summary.total_checked,
                with_issues = summary.articles_with_issues,
                repaired = summary.articles_repaired,
                "Repair batch finished"
            );

            Ok(RepairResponse {
                success: true,
                dry_run: request.dry_run,
                summary,
                results,
            })
        }
        .instrument(span)
        .await
    }

    /// Repair one article, persisting it unless `dry_run`. Returns the report
    /// and whether a write succeeded.
    async fn repair_one<S: DocumentStore>(&self, store: &S, article: &Article, dry_run: bool) -> (RepairResult, bool) {
        let outcome = repair_content(&article.content);
        let mut result = RepairResult {
            article_id: article.id.clone(),
            title: article.title.clone(),
            had_issues: outcome.changed(),
            issues_fixed: outcome
                .applied
                .iter()
                .map(|step| step.message().to_string())
                .collect(),
            original_length: char_len(&article.content),
            repaired_length: char_len(&outcome.repaired),
        };

        if dry_run || !result.had_issues {
            return (result, false);
        }

        match store.update_content(&article.id, &outcome.repaired).await {
            Ok(()) => {
                tracing::debug!(article_id = %article.id, "Saved repaired content");
                (result, true)
            }
            Err(e) => {
                tracing::error!(article_id = %article.id, error = %format!("{e:#}"), "Failed to save repaired content");
                result.issues_fixed.push(format!("Error: {e:#}"));
                (result, false)
            }
        }
    }
}
