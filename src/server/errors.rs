//! Error responses for the HTTP service

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure of a single request, rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be used
    #[error("{0}")]
    BadRequest(String),

    /// Store or other internal failure
    #[error("{0:#}")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal(error)
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        match &self {
            Self::BadRequest(_) => tracing::warn!(%status, "Rejected request: {message}"),
            Self::Internal(_) => tracing::error!(%status, "Request failed: {message}"),
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        let internal: ApiError = anyhow::anyhow!("boom").into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_message_includes_cause_chain() {
        let err: Result<(), std::io::Error> = Err(std::io::Error::other("disk gone"));
        let api: ApiError = err.context("Failed to query published articles").unwrap_err().into();
        assert_eq!(api.to_string(), "Failed to query published articles: disk gone");
    }
}
