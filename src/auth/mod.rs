//! JWT cookie authentication module.
//!
//! Tokens are HS256-signed and carried in an `httpOnly` cookie named
//! `token`, so the browser attaches them on credentialed CORS requests but
//! scripts cannot read them.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{codes, AppError, ErrorDetails, ErrorResponse};

/// Name of the auth cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Token lifetime, matching the original deployment's year-long sessions.
const TOKEN_TTL_DAYS: i64 = 365;

/// Claims carried in the auth token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: usize,
}

/// Sign a token for the given email.
pub fn create_token(email: &str, secret: &str) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(TOKEN_TTL_DAYS))
        .ok_or_else(|| AppError::Internal("Failed to calculate token expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        email: email.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token creation failed: {}", e)))
}

/// Verify a token and return its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

/// Build the Set-Cookie value that installs the auth cookie.
pub fn auth_cookie(token: &str, secure: bool) -> String {
    // SameSite=None is required for cross-site frontends, and browsers only
    // accept it together with Secure
    if secure {
        format!("{}={}; HttpOnly; Secure; SameSite=None; Path=/", TOKEN_COOKIE, token)
    } else {
        format!("{}={}; HttpOnly; SameSite=Strict; Path=/", TOKEN_COOKIE, token)
    }
}

/// Build the Set-Cookie value that clears the auth cookie.
pub fn clear_auth_cookie(secure: bool) -> String {
    if secure {
        format!(
            "{}=; HttpOnly; Secure; SameSite=None; Path=/; Max-Age=0",
            TOKEN_COOKIE
        )
    } else {
        format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", TOKEN_COOKIE)
    }
}

/// Extract a cookie value from a Cookie header string.
fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// JWT authentication layer for protected routes.
///
/// Verifies the token cookie and stashes the [`Claims`] in request
/// extensions for handlers to consume.
pub async fn jwt_auth_layer(secret: Option<String>, mut request: Request, next: Next) -> Response {
    let Some(secret) = secret else {
        return unauthorized_response("Authentication is not configured");
    };

    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| cookie_value(cookies, TOKEN_COOKIE))
        .map(|s| s.to_string());

    let Some(token) = token else {
        return unauthorized_response("Missing auth token");
    };

    match verify_token(&token, &secret) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(_) => unauthorized_response("Invalid or expired token"),
    }
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = create_token("v@example.com", "test-secret").unwrap();
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.email, "v@example.com");
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = create_token("v@example.com", "test-secret").unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_token_garbage_rejected() {
        assert!(verify_token("not-a-jwt", "test-secret").is_err());
    }

    #[test]
    fn test_cookie_value_found() {
        assert_eq!(
            cookie_value("a=1; token=abc.def.ghi; b=2", "token"),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_cookie_value_missing() {
        assert_eq!(cookie_value("a=1; b=2", "token"), None);
    }

    #[test]
    fn test_cookie_value_prefix_not_matched() {
        assert_eq!(cookie_value("token2=abc", "token"), None);
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let dev = auth_cookie("abc", false);
        assert!(dev.contains("HttpOnly"));
        assert!(dev.contains("SameSite=Strict"));
        assert!(!dev.contains("Secure"));

        let prod = auth_cookie("abc", true);
        assert!(prod.contains("Secure"));
        assert!(prod.contains("SameSite=None"));
    }
}
