use std::path::PathBuf;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while loading reference data or classifying a transcript
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Missing or invalid startup configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Reference table could not be read or parsed
    #[error("reference data error in {path:?}: {reason}")]
    ReferenceData { path: PathBuf, reason: String },

    /// Upstream LLM request failed or returned an unusable body
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM output did not satisfy the expected structured contract
    #[error("schema violation: {0}")]
    SchemaViolation(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

impl ClassifierError {
    pub fn reference(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ReferenceData {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Llm(_) | Self::SchemaViolation(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::ReferenceData { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        Self::Llm(err.to_string())
    }
}

impl IntoResponse for ClassifierError {
    fn into_response(self) -> Response {
        tracing::error!("Classification failed: {}", self);
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
