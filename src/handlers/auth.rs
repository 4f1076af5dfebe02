// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, TokenResponse, User},
    utils::{hash::verify_password, jwt::Claims, jwt::sign_token},
};

/// Authenticates a user and returns a signed token.
///
/// An unknown email and a wrong password produce the same message, so the
/// response does not reveal which half of the credentials failed.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::from_validation(validation_errors));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, avatar, created_at FROM users WHERE email = ?",
    )
    .bind(&payload.email)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::Validation(vec!["Invalid credentials".to_string()]))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::Validation(vec!["Invalid credentials".to_string()]));
    }

    let token = sign_token(user.id, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(TokenResponse { token }))
}

/// Returns the caller's user record. The password hash is excluded by the
/// model's serialization rules.
pub async fn current_user(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, avatar, created_at FROM users WHERE id = ?",
    )
    .bind(claims.user.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
