//! Test utilities and helper functions for the content_repair test suite

use anyhow::Result;
use content_repair::article_store::{Article, ArticleStore};
use tempfile::TempDir;

/// Opens a fresh store in a temporary directory.
///
/// Keep the `TempDir` alive for as long as the store is used.
#[allow(dead_code)]
pub async fn create_test_store() -> Result<(TempDir, ArticleStore)> {
    let dir = TempDir::new()?;
    let store = ArticleStore::open(&dir.path().join("articles.sqlite")).await?;
    Ok((dir, store))
}

/// Published article with the given content.
#[allow(dead_code)]
pub fn create_article(id: &str, title: &str, content: &str) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        excerpt: Some(format!("An article about {}", title.to_lowercase())),
        content: content.to_string(),
        tags: Vec::new(),
        primary_keyword: None,
        status: "published".to_string(),
        updated_at: Some("2024-01-01T00:00:00+00:00".to_string()),
    }
}

/// Store seeded with two broken articles, one clean one and one broken draft.
#[allow(dead_code)]
pub async fn create_seeded_store() -> Result<(TempDir, ArticleStore)> {
    let (dir, store) = create_test_store().await?;
    store
        .upsert_article(&create_article("a1", "Monsoon Patterns", "<p>Hello <b>world"))
        .await?;
    store
        .upsert_article(&create_article("a2", "River Systems", "<p>Rivers</p>"))
        .await?;
    store
        .upsert_article(&create_article(
            "a3",
            "Mountain Passes",
            r#"<p></p><a class="btn" href="https://example.com">Pass</a>"#,
        ))
        .await?;
    let mut draft = create_article("a4", "Draft Notes", "<i>unfinished");
    draft.status = "draft".to_string();
    store.upsert_article(&draft).await?;
    Ok((dir, store))
}

/// `count` words of visible text: `topics` first, then short filler.
#[allow(dead_code)]
pub fn words_with_topics(topics: &[&str], count: usize) -> String {
    let filler = vec!["xyz"; count.saturating_sub(topics.len())].join(" ");
    format!("<p>{} {filler}</p>", topics.join(" "))
}
