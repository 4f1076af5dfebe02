// src/models/post.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A single like. Each user appears at most once per post.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Like {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
}

/// An embedded comment, carrying the author snapshot taken when it was
/// written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub text: String,
    pub name: String,
    pub avatar: String,
    #[serde(rename = "date")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The full post document as it appears on the wire, with likes and comments
/// embedded (both newest-first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub text: String,
    /// Author name snapshot, looked up server-side at creation.
    pub name: String,
    /// Author avatar snapshot, looked up server-side at creation.
    pub avatar: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    #[serde(rename = "date")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Raw 'posts' row; likes and comments are assembled separately.
#[derive(Debug, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PostRow {
    pub fn into_post(self, likes: Vec<Like>, comments: Vec<Comment>) -> Post {
        Post {
            id: self.id,
            user_id: self.user_id,
            text: self.text,
            name: self.name,
            avatar: self.avatar,
            likes,
            comments,
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a post.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

/// DTO for adding a comment.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}
