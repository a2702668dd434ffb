//! HTTP service exposing the repair job, link inserter and validator.
//!
//! Every endpoint speaks JSON and answers CORS preflights for any origin.

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use errors::ApiError;

use crate::article_store::ArticleStore;
use crate::config::ServiceConfig;
use crate::html_validator::HtmlValidator;
use crate::link_inserter::InternalLinker;
use crate::repair_job::RepairJob;

/// Shared state for every request.
pub struct AppState {
    pub store: ArticleStore,
    pub validator: HtmlValidator,
    pub linker: InternalLinker,
    pub repair_job: RepairJob,
}

impl AppState {
    pub fn new(store: ArticleStore, config: &ServiceConfig) -> Self {
        Self {
            store,
            validator: HtmlValidator::new(*config.validator_limits()),
            linker: InternalLinker::new(*config.linker_limits()),
            repair_job: RepairJob::new(config.default_batch_size(), config.max_batch_size()),
        }
    }
}

pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Cors requires a `Default` response body, so it sits inside the body limit.
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors)
        .layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/repair-article-content", post(handlers::repair_article_content))
        .route("/auto-insert-internal-links", post(handlers::auto_insert_internal_links))
        .route("/validate-html", post(handlers::validate_html))
        .route("/health", get(handlers::health))
        .layer(middleware)
        .with_state(state)
}

/// Open the store and serve until Ctrl-C.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let store = ArticleStore::open(config.database_path()).await?;
    let state = Arc::new(AppState::new(store.clone(), &config));
    let app = router(state, config.max_body_bytes());

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, database = %config.database_path().display(), "Content repair service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down HTTP server");
        })
        .await
        .context("HTTP server failed")?;

    store.close().await;
    Ok(())
}
