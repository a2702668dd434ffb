//! Route handlers.
//!
//! Bodies are taken as raw bytes and decoded here so every malformed body,
//! whatever its content type, gets the same 400 `{"error": ...}` shape.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::errors::ApiError;
use crate::html_validator::ValidationResult;
use crate::link_inserter::{LinkInsertion, LinkRequest};
use crate::repair_job::{RepairRequest, RepairResponse};

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub html: String,
}

/// Full validation result plus the quick gate's verdict on the input.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    #[serde(flatten)]
    pub result: ValidationResult,
    pub quick_valid: bool,
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST /repair-article-content`. An empty body runs a default dry run.
pub async fn repair_article_content(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RepairResponse>, ApiError> {
    let request: RepairRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RepairRequest::default()
    } else {
        parse_body(&body)?
    };

    let response = state.repair_job.run(&state.store, &request).await?;
    Ok(Json(response))
}

/// `POST /auto-insert-internal-links`
pub async fn auto_insert_internal_links(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<LinkInsertion>, ApiError> {
    let request: LinkRequest = parse_body(&body)?;
    let insertion = state.linker.run(&state.store, &request).await?;
    Ok(Json(insertion))
}

/// `POST /validate-html`
pub async fn validate_html(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ValidateResponse>, ApiError> {
    let request: ValidateRequest = parse_body(&body)?;
    let quick_valid = state.validator.quick_validate(&request.html);
    let result = state.validator.validate(&request.html);
    Ok(Json(ValidateResponse { result, quick_valid }))
}
