use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Claims carried by a session token. `sub` is the owner id used for all data scoping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
}

pub fn extract_bearer_token(authorization: &str) -> Result<&str, String> {
    let parts: Vec<&str> = authorization.split_whitespace().collect();
    if parts.len() != 2 {
        return Err("Invalid Authorization header format".to_string());
    }
    if parts[0] != "Bearer" {
        return Err("Expected Bearer scheme in Authorization header".to_string());
    }
    Ok(parts[1])
}

/// Verify an HS256 token and return its subject.
pub fn verify_token(token: &str, secret: &str) -> Result<Uuid, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims.sub)
        .map_err(|e| format!("Invalid token: {}", e))
}

/// The caller's identity, if any. A missing or unusable token yields an anonymous viewer.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<Uuid>);

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Viewer(None));
        };
        let Some(secret) = state.jwt_secret.as_deref() else {
            warn!("Bearer token received but JWT_SECRET is not configured");
            return Ok(Viewer(None));
        };

        let user_id = header
            .to_str()
            .map_err(|e| e.to_string())
            .and_then(|value| extract_bearer_token(value).map(str::to_string))
            .and_then(|token| verify_token(&token, secret));

        match user_id {
            Ok(id) => Ok(Viewer(Some(id))),
            Err(e) => {
                debug!("Treating request as anonymous: {}", e);
                Ok(Viewer(None))
            }
        }
    }
}

/// A signed-in caller. Rejects with 401 otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Viewer::from_request_parts(parts, state).await? {
            Viewer(Some(id)) => Ok(AuthUser(id)),
            Viewer(None) => Err(AppError::Unauthorized),
        }
    }
}
