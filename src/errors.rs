use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised by the assistant gateway and the model provider.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Validation(String),
    /// Non-success status or an unusable body from the model API.
    #[error("{detail}")]
    Upstream {
        status: Option<u16>,
        detail: String,
    },
}

impl AssistantError {
    pub fn upstream_status(status: u16) -> Self {
        AssistantError::Upstream {
            status: Some(status),
            detail: format!("Gemini API error: {}", status),
        }
    }

    pub fn invalid_response() -> Self {
        AssistantError::Upstream {
            status: None,
            detail: "Invalid response from Gemini API".to_string(),
        }
    }
}

/// Failures of the portfolio/tracked-coin/conversation stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Conflict(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Assistant error: {0}")]
    Assistant(AssistantError),
}

/// Body of every error response: `{ "error": ..., "details": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("Not found", msg.as_str())),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new("Invalid request", msg.as_str())),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("Conflict", msg.as_str())),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Unauthorized", "Please sign in to continue."),
            ),
            AppError::Assistant(AssistantError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("Invalid request", msg.as_str()))
            }
            AppError::Assistant(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Internal server error", err.to_string()),
            ),
            // Database details stay in the server log.
            AppError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Internal server error", "Storage is temporarily unavailable"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Store(other),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Store(StoreError::Db(value))
    }
}

impl From<AssistantError> for AppError {
    fn from(value: AssistantError) -> Self {
        AppError::Assistant(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}
