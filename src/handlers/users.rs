// src/handlers/users.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{RegisterRequest, TokenResponse},
    utils::{gravatar::gravatar_url, hash::hash_password, jwt::sign_token},
};

/// Registers a new user.
///
/// Derives the Gravatar avatar from the email, hashes the password with
/// Argon2, and returns a signed token so the caller is logged in right away.
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::from_validation(validation_errors));
    }

    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
        .bind(&payload.email)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Validation(vec!["User already exists".to_string()]));
    }

    let avatar = gravatar_url(&payload.email);
    let hashed_password = hash_password(&payload.password)?;

    let user_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (name, email, password, avatar, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&hashed_password)
    .bind(&avatar)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // Unique-violation backstop for a concurrent registration with the
        // same email.
        if e.to_string().contains("UNIQUE constraint") {
            AppError::Validation(vec!["User already exists".to_string()])
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    let token = sign_token(user_id, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(TokenResponse { token }))
}
