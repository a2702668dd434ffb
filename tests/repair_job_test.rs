mod common;

use anyhow::Result;
use common::create_seeded_store;
use content_repair::repair_job::{RepairJob, RepairRequest};

const SEEDED_TIMESTAMP: &str = "2024-01-01T00:00:00+00:00";

#[tokio::test]
async fn test_dry_run_reports_without_writing() -> Result<()> {
    let (_dir, store) = create_seeded_store().await?;

    let response = RepairJob::default().run(&store, &RepairRequest::default()).await?;

    assert!(response.success);
    assert!(response.dry_run);
    assert_eq!(response.summary.total_checked, 3);
    assert_eq!(response.summary.articles_with_issues, 2);
    assert_eq!(response.summary.articles_repaired, 0);

    let a3 = response
        .results
        .iter()
        .find(|r| r.article_id == "a3")
        .expect("a3 checked");
    assert_eq!(
        a3.issues_fixed,
        vec![
            "Removed class attributes from links",
            "Added rel=\"noopener noreferrer\" to external links",
            "Removed empty paragraphs",
        ]
    );

    let a1 = store.get_article("a1").await?.expect("a1 exists");
    assert_eq!(a1.content, "<p>Hello <b>world");
    assert_eq!(a1.updated_at.as_deref(), Some(SEEDED_TIMESTAMP));

    store.close().await;
    Ok(())
}

#[tokio::test]
async fn test_apply_writes_only_changed_articles() -> Result<()> {
    let (_dir, store) = create_seeded_store().await?;
    let job = RepairJob::default();
    let request = RepairRequest {
        dry_run: false,
        ..RepairRequest::default()
    };

    let response = job.run(&store, &request).await?;
    assert!(!response.dry_run);
    assert_eq!(response.summary.articles_repaired, 2);

    let a1 = store.get_article("a1").await?.expect("a1 exists");
    assert_eq!(a1.content, "<p>Hello <strong>world</strong></p>");
    assert_ne!(a1.updated_at.as_deref(), Some(SEEDED_TIMESTAMP));

    let a3 = store.get_article("a3").await?.expect("a3 exists");
    assert_eq!(
        a3.content,
        r#"<a href="https://example.com" rel="noopener noreferrer">Pass</a>"#
    );

    let clean = store.get_article("a2").await?.expect("a2 exists");
    assert_eq!(clean.updated_at.as_deref(), Some(SEEDED_TIMESTAMP));

    let draft = store.get_article("a4").await?.expect("a4 exists");
    assert_eq!(draft.content, "<i>unfinished");

    // A second pass finds nothing left to fix.
    let again = job.run(&store, &request).await?;
    assert_eq!(again.summary.articles_with_issues, 0);
    assert_eq!(again.summary.articles_repaired, 0);

    store.close().await;
    Ok(())
}

#[tokio::test]
async fn test_selection_and_batch_size() -> Result<()> {
    let (_dir, store) = create_seeded_store().await?;
    let job = RepairJob::default();

    let selected = RepairRequest {
        article_ids: Some(vec!["a3".to_string(), "a4".to_string()]),
        ..RepairRequest::default()
    };
    let response = job.run(&store, &selected).await?;
    let ids: Vec<&str> = response.results.iter().map(|r| r.article_id.as_str()).collect();
    assert_eq!(ids, vec!["a3"]);

    let limited = RepairRequest {
        batch_size: Some(1),
        ..RepairRequest::default()
    };
    let response = job.run(&store, &limited).await?;
    assert_eq!(response.summary.total_checked, 1);
    assert_eq!(response.results[0].article_id, "a1");

    store.close().await;
    Ok(())
}

#[tokio::test]
async fn test_response_serializes_with_wire_names() -> Result<()> {
    let (_dir, store) = create_seeded_store().await?;
    let response = RepairJob::default().run(&store, &RepairRequest::default()).await?;

    let json = serde_json::to_value(&response)?;
    assert_eq!(json["dryRun"], true);
    assert_eq!(json["summary"]["totalChecked"], 3);
    assert_eq!(json["summary"]["articlesWithIssues"], 2);
    assert_eq!(json["results"][0]["articleId"], "a1");
    assert_eq!(json["results"][0]["hadIssues"], true);
    assert_eq!(json["results"][0]["originalLength"], 17);

    store.close().await;
    Ok(())
}
