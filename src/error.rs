// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error. The detail is logged, never sent to the client.
    ServerError(String),

    // 400 Bad Request (business rules, e.g. liking a post twice)
    BadRequest(String),

    // 400 Bad Request with field-level messages
    Validation(Vec<String>),

    // 401 Unauthorized. Ownership failures use this variant too: a non-owner
    // mutating a record gets the same status as a missing token.
    Unauthorized(String),

    // 404 Not Found (malformed identifiers fold in here as well)
    NotFound(String),
}

impl AppError {
    /// Flattens `validator` output into the wire-level messages array.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ServerError(detail) => {
                tracing::error!("Internal server error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "msg": "Server Error" }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "msg": msg })),
            AppError::Validation(messages) => {
                let errors: Vec<_> = messages.iter().map(|m| json!({ "msg": m })).collect();
                (StatusCode::BAD_REQUEST, json!({ "errors": errors }))
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "msg": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "msg": msg })),
        };

        (status, Json(body)).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::ServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::ServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ServerError(err.to_string())
    }
}
