use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api-key", post(check_api_key))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeySubmission {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyAccepted {
    pub success: bool,
    pub message: String,
}

fn validate_api_key(api_key: &str) -> Result<(), AppError> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Validation("API key is required".to_string()));
    }
    if !api_key.starts_with("AIza") {
        return Err(AppError::Validation("Invalid Gemini API key format".to_string()));
    }
    Ok(())
}

/// Format check only. The key is neither stored nor echoed back.
pub async fn check_api_key(
    payload: Result<Json<ApiKeySubmission>, JsonRejection>,
) -> Result<Json<ApiKeyAccepted>, AppError> {
    let Json(data) = payload?;
    info!("POST /api/setup/api-key - Checking API key format");
    validate_api_key(&data.api_key).map_err(|e| {
        warn!("Rejected API key submission: {}", e);
        e
    })?;

    Ok(Json(ApiKeyAccepted {
        success: true,
        message: "Key format looks valid. Set GEMINI_API_KEY in the server environment and restart the service."
            .to_string(),
    }))
}
