// src/handlers/posts.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::post::{Comment, CreateCommentRequest, CreatePostRequest, Like, Post, PostRow},
    models::user::User,
    utils::{html::sanitize_text, jwt::Claims},
};

/// Likes for a post, newest first.
async fn load_likes(pool: &SqlitePool, post_id: i64) -> Result<Vec<Like>, AppError> {
    Ok(sqlx::query_as::<_, Like>(
        "SELECT id, user_id FROM post_likes WHERE post_id = ? ORDER BY id DESC",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?)
}

/// Comments for a post, newest first.
async fn load_comments(pool: &SqlitePool, post_id: i64) -> Result<Vec<Comment>, AppError> {
    Ok(sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, text, name, avatar, created_at
        FROM comments
        WHERE post_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?)
}

async fn assemble_post(pool: &SqlitePool, row: PostRow) -> Result<Post, AppError> {
    let likes = load_likes(pool, row.id).await?;
    let comments = load_comments(pool, row.id).await?;
    Ok(row.into_post(likes, comments))
}

/// Fetches a post row, folding malformed and unknown ids into the same 404.
async fn find_post_row(pool: &SqlitePool, id: &str) -> Result<PostRow, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::NotFound("Post not found".to_string()))?;

    sqlx::query_as::<_, PostRow>(
        "SELECT id, user_id, text, name, avatar, created_at FROM posts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Post not found".to_string()))
}

/// Create a post. The author name/avatar snapshot is looked up server-side,
/// never trusted from the request body.
pub async fn create_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::from_validation(validation_errors));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, avatar, created_at FROM users WHERE id = ?",
    )
    .bind(claims.user.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let text = sanitize_text(&payload.text);

    let row = sqlx::query_as::<_, PostRow>(
        r#"
        INSERT INTO posts (user_id, text, name, avatar, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, text, name, avatar, created_at
        "#,
    )
    .bind(claims.user.id)
    .bind(&text)
    .bind(&user.name)
    .bind(&user.avatar)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await?;

    Ok(Json(row.into_post(Vec::new(), Vec::new())))
}

/// List all posts, newest first, with likes and comments embedded.
pub async fn get_posts(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, PostRow>(
        "SELECT id, user_id, text, name, avatar, created_at FROM posts ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(&pool)
    .await?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        posts.push(assemble_post(&pool, row).await?);
    }

    Ok(Json(posts))
}

/// Get a single post by id.
pub async fn get_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = find_post_row(&pool, &id).await?;
    let post = assemble_post(&pool, row).await?;

    Ok(Json(post))
}

/// Delete a post. Only its author may do so.
pub async fn delete_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = find_post_row(&pool, &id).await?;

    if row.user_id != claims.user.id {
        return Err(AppError::Unauthorized("User not authorized".to_string()));
    }

    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(row.id)
        .execute(&pool)
        .await?;

    Ok(Json(serde_json::json!({ "msg": "Post removed" })))
}

/// Like a post. Liking a post the caller already liked is rejected rather
/// than silently deduplicated; the unique index backstops concurrent calls.
pub async fn like_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = find_post_row(&pool, &id).await?;

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM post_likes WHERE post_id = ? AND user_id = ?",
    )
    .bind(row.id)
    .bind(claims.user.id)
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Post already liked".to_string()));
    }

    sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES (?, ?)")
        .bind(row.id)
        .bind(claims.user.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint") {
                AppError::BadRequest("Post already liked".to_string())
            } else {
                AppError::from(e)
            }
        })?;

    tx.commit().await?;

    Ok(Json(load_likes(&pool, row.id).await?))
}

/// Remove the caller's like from a post. Unliking a post that was never
/// liked is rejected symmetrically.
pub async fn unlike_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = find_post_row(&pool, &id).await?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM post_likes WHERE post_id = ? AND user_id = ?",
    )
    .bind(row.id)
    .bind(claims.user.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::BadRequest(
        "Post has not yet been liked".to_string(),
    ))?;

    sqlx::query("DELETE FROM post_likes WHERE id = ?")
        .bind(existing)
        .execute(&pool)
        .await?;

    Ok(Json(load_likes(&pool, row.id).await?))
}

/// Add a comment to a post, with the commenter's snapshot looked up
/// server-side. Returns the updated comments array, newest first.
pub async fn add_comment(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::from_validation(validation_errors));
    }

    let row = find_post_row(&pool, &id).await?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, avatar, created_at FROM users WHERE id = ?",
    )
    .bind(claims.user.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let text = sanitize_text(&payload.text);

    sqlx::query(
        r#"
        INSERT INTO comments (post_id, user_id, text, name, avatar, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(row.id)
    .bind(claims.user.id)
    .bind(&text)
    .bind(&user.name)
    .bind(&user.avatar)
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await?;

    Ok(Json(load_comments(&pool, row.id).await?))
}

/// Remove a comment, located by the comment's own id. Only the comment's
/// author may remove it. Returns the updated comments array.
pub async fn delete_comment(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let row = find_post_row(&pool, &id).await?;

    let comment_id: i64 = comment_id
        .parse()
        .map_err(|_| AppError::NotFound("Comment does not exist".to_string()))?;

    let comment_owner = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM comments WHERE id = ? AND post_id = ?",
    )
    .bind(comment_id)
    .bind(row.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Comment does not exist".to_string()))?;

    if comment_owner != claims.user.id {
        return Err(AppError::Unauthorized("User not authorized".to_string()));
    }

    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(comment_id)
        .execute(&pool)
        .await?;

    Ok(Json(load_comments(&pool, row.id).await?))
}
