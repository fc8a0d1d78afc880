//! Auth API endpoints: token issuance and logout.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::auth;
use crate::errors::AppError;
use crate::AppState;

/// Body for token issuance.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub email: String,
}

/// POST /api/auth/token - Sign a JWT for the given email and set it as an
/// httpOnly cookie.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Response, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    let secret = state
        .config
        .jwt_secret
        .as_deref()
        .ok_or_else(|| AppError::Internal("JWT secret is not configured".to_string()))?;

    let token = auth::create_token(&request.email, secret)?;
    let cookie = auth::auth_cookie(&token, state.config.secure_cookies);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| AppError::Internal("Invalid cookie value".to_string()))?,
    );

    tracing::debug!("Issued auth token for {}", request.email);

    Ok((
        StatusCode::OK,
        headers,
        Json(serde_json::json!({ "success": true })),
    )
        .into_response())
}

/// POST /api/auth/logout - Clear the auth cookie.
pub async fn logout(State(state): State<AppState>) -> Result<Response, AppError> {
    let cookie = auth::clear_auth_cookie(state.config.secure_cookies);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| AppError::Internal("Invalid cookie value".to_string()))?,
    );

    Ok((
        StatusCode::OK,
        headers,
        Json(serde_json::json!({ "success": true })),
    )
        .into_response())
}
