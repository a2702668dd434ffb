//! SQLite-backed article store.
//!
//! The repair job and the link inserter only need a narrow contract:
//! - select published articles (all, by id, or all but one)
//! - overwrite an article's content and refresh its `updated_at`
//!
//! That contract is the [`DocumentStore`] trait. [`ArticleStore`] implements it
//! over a WAL-mode SQLite pool and adds the seeding operations the CLI uses.

mod types;

pub use types::{Article, ArticleSelection, LinkCandidate};

use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result, bail};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;

use crate::utils::PUBLISHED_STATUS;

/// SQL schema for the article database
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    excerpt TEXT,
    content TEXT NOT NULL,
    -- JSON array of strings
    tags TEXT NOT NULL DEFAULT '[]',
    primary_keyword TEXT,
    status TEXT NOT NULL DEFAULT 'published',
    updated_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_articles_status ON articles(status);
"#;

const ARTICLE_COLUMNS: &str =
    "id, title, slug, excerpt, content, tags, primary_keyword, status, updated_at";

type ArticleRow = (
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
);

/// Ids bound per `IN (...)` query. SQLite caps bound variables near 999.
const ID_CHUNK_SIZE: usize = 500;

type CandidateRow = (String, String, String, Option<String>, String, Option<String>);

/// Read/write contract consumed by the repair job and the link inserter.
pub trait DocumentStore: Send + Sync {
    /// Published articles matching `selection`, at most `limit`, ordered by id.
    fn fetch_published(
        &self,
        selection: &ArticleSelection,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Article>>> + Send;

    /// Published articles other than `exclude_id`, reduced for link scoring.
    fn fetch_link_candidates(
        &self,
        exclude_id: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<LinkCandidate>>> + Send;

    /// Replace an article's content and refresh its `updated_at`.
    fn update_content(&self, id: &str, content: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct ArticleStore {
    pool: SqlitePool,
}

impl ArticleStore {
    /// Open the database at `path`, creating it and its schema if missing.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open SQLite database {}", path.display()))?;

        sqlx::query(SCHEMA_SQL)
            .execute(&pool)
            .await
            .context("Failed to initialize database schema")?;

        log::debug!("Opened article store at {}", path.display());
        Ok(Self { pool })
    }

    /// Insert or replace an article.
    pub async fn upsert_article(&self, article: &Article) -> Result<()> {
        let tags = serde_json::to_string(&article.tags).context("Failed to encode tags")?;

        sqlx::query(
            r#"
            INSERT INTO articles (id, title, slug, excerpt, content, tags, primary_keyword, status, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                slug = excluded.slug,
                excerpt = excluded.excerpt,
                content = excluded.content,
                tags = excluded.tags,
                primary_keyword = excluded.primary_keyword,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&article.id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&tags)
        .bind(&article.primary_keyword)
        .bind(&article.status)
        .bind(&article.updated_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert article {}", article.id))?;

        Ok(())
    }

    pub async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?");
        let row: Option<ArticleRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load article {id}"))?;

        row.map(article_from_row).transpose()
    }

    pub async fn article_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count articles")?;
        Ok(row.0)
    }

    /// Load a JSON array of articles in a single transaction.
    ///
    /// Returns the number of articles written.
    pub async fn import_json(&self, json: &str) -> Result<usize> {
        let articles: Vec<Article> =
            serde_json::from_str(json).context("Articles file is not a JSON array of articles")?;

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;
        for article in &articles {
            let tags = serde_json::to_string(&article.tags).context("Failed to encode tags")?;
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO articles (id, title, slug, excerpt, content, tags, primary_keyword, status, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&article.id)
            .bind(&article.title)
            .bind(&article.slug)
            .bind(&article.excerpt)
            .bind(&article.content)
            .bind(&tags)
            .bind(&article.primary_keyword)
            .bind(&article.status)
            .bind(&article.updated_at)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to import article {}", article.id))?;
        }
        tx.commit().await.context("Failed to commit import")?;

        log::info!("Imported {} articles", articles.len());
        Ok(articles.len())
    }

    /// Published rows for `ids`, queried in chunks and merged in id order.
    async fn published_rows_by_id(&self, ids: &[String], limit: i64) -> sqlx::Result<Vec<ArticleRow>> {
        let mut rows = Vec::new();
        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let query = format!(
                "SELECT {ARTICLE_COLUMNS} FROM articles WHERE status = ? AND id IN ({placeholders}) ORDER BY id LIMIT ?"
            );
            let mut q = sqlx::query_as::<_, ArticleRow>(&query).bind(PUBLISHED_STATUS);
            for id in chunk {
                q = q.bind(id);
            }
            rows.extend(q.bind(limit).fetch_all(&self.pool).await?);
        }

        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows.dedup_by(|a, b| a.0 == b.0);
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl DocumentStore for ArticleStore {
    async fn fetch_published(&self, selection: &ArticleSelection, limit: usize) -> Result<Vec<Article>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<ArticleRow> = match selection {
            ArticleSelection::All => {
                let query = format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles WHERE status = ? ORDER BY id LIMIT ?"
                );
                sqlx::query_as::<_, ArticleRow>(&query)
                    .bind(PUBLISHED_STATUS)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
            }
            ArticleSelection::Excluding(id) => {
                let query = format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles WHERE status = ? AND id != ? ORDER BY id LIMIT ?"
                );
                sqlx::query_as::<_, ArticleRow>(&query)
                    .bind(PUBLISHED_STATUS)
                    .bind(id)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
            }
            ArticleSelection::Only(ids) => self.published_rows_by_id(ids, limit).await,
        }
        .context("Failed to query published articles")?;

        rows.into_iter().map(article_from_row).collect()
    }

    async fn fetch_link_candidates(
        &self,
        exclude_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LinkCandidate>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, title, slug, excerpt, tags, primary_keyword
            FROM articles
            WHERE status = ? AND (? IS NULL OR id != ?)
            ORDER BY id
            LIMIT ?
            "#,
        )
        .bind(PUBLISHED_STATUS)
        .bind(exclude_id)
        .bind(exclude_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query link candidates")?;

        rows.into_iter()
            .map(|(id, title, slug, excerpt, tags, primary_keyword)| {
                Ok(LinkCandidate {
                    tags: decode_tags(&id, &tags)?,
                    id,
                    title,
                    slug,
                    excerpt,
                    primary_keyword,
                })
            })
            .collect()
    }

    async fn update_content(&self, id: &str, content: &str) -> Result<()> {
        let updated_at = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query("UPDATE articles SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(&updated_at)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to update article {id}"))?;

        if result.rows_affected() == 0 {
            bail!("Article {id} not found");
        }
        Ok(())
    }
}

fn decode_tags(id: &str, raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("Article {id} has malformed tags"))
}

fn article_from_row(row: ArticleRow) -> Result<Article> {
    let (id, title, slug, excerpt, content, tags, primary_keyword, status, updated_at) = row;
    Ok(Article {
        tags: decode_tags(&id, &tags)?,
        id,
        title,
        slug,
        excerpt,
        content,
        primary_keyword,
        status,
        updated_at,
    })
}
