// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

/// The identity carried inside the token payload.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TokenUser {
    pub id: i64,
}

/// JWT claims: `{ user: { id }, exp }`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    pub user: TokenUser,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a token for the given user id, valid for `expiration_seconds`.
pub fn sign_token(user_id: i64, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::ServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        user: TokenUser { id: user_id },
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::ServerError(e.to_string()))
}

/// Verifies and decodes a token string.
///
/// Fails on a bad signature or an expired `exp`, both mapped to the same
/// client-visible message.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Token is not valid".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the `x-auth-token` header.
/// If valid, injects `Claims` into the request extensions for handlers to use.
/// If absent or invalid, responds 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("x-auth-token")
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized(
            "No token, authorization denied".to_string(),
        ))?;

    let claims = verify_token(token, &state.config.jwt_secret)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn sign_and_verify_roundtrip() {
        let token = sign_token(42, SECRET, 3600).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user.id, 42);
    }

    #[test]
    fn token_identifies_exactly_one_user() {
        let token_a = sign_token(1, SECRET, 3600).unwrap();
        let token_b = sign_token(2, SECRET, 3600).unwrap();
        assert_ne!(
            verify_token(&token_a, SECRET).unwrap().user.id,
            verify_token(&token_b, SECRET).unwrap().user.id
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_token(7, SECRET, 3600).unwrap();
        assert!(verify_token(&token, "a-different-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected_despite_valid_signature() {
        // Expiry far enough in the past to clear the default leeway.
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            user: TokenUser { id: 7 },
            exp: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_err());
    }
}
