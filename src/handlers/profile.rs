// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::profile::{
        AddEducationRequest, AddExperienceRequest, Education, Experience, Profile, ProfileRow,
        UpsertProfileRequest, parse_skills,
    },
    state::AppState,
    utils::{github, html::sanitize_text, jwt::Claims},
};

const PROFILE_ROW_QUERY: &str = r#"
    SELECT p.id, p.user_id, u.name AS user_name, u.avatar AS user_avatar,
           p.status, p.company, p.website, p.location, p.bio, p.github_username,
           p.skills, p.social, p.updated_at
    FROM profiles p
    JOIN users u ON u.id = p.user_id
"#;

/// Loads the fully assembled profile for a user, or `None` if the user has
/// never created one.
pub(crate) async fn load_profile(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<Profile>, AppError> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!("{} WHERE p.user_id = ?", PROFILE_ROW_QUERY))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Some(assemble_profile(pool, row).await?)),
        None => Ok(None),
    }
}

/// Attaches the experience and education lists (most-recent-first) to a raw
/// profile row.
async fn assemble_profile(pool: &SqlitePool, row: ProfileRow) -> Result<Profile, AppError> {
    let experience = sqlx::query_as::<_, Experience>(
        r#"
        SELECT id, title, company, location, from_date, to_date, current, description
        FROM experiences
        WHERE profile_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(row.id)
    .fetch_all(pool)
    .await?;

    let education = sqlx::query_as::<_, Education>(
        r#"
        SELECT id, school, degree, field_of_study, from_date, to_date, current, description
        FROM educations
        WHERE profile_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(row.id)
    .fetch_all(pool)
    .await?;

    Ok(row.into_profile(experience, education)?)
}

/// Get the caller's profile.
pub async fn my_profile(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let profile = load_profile(&pool, claims.user.id)
        .await?
        .ok_or(AppError::NotFound(
            "There is no profile for this user".to_string(),
        ))?;

    Ok(Json(profile))
}

/// Create or update the caller's profile.
///
/// The skills list is re-derived on every call by splitting the submitted
/// comma-separated string and trimming whitespace.
pub async fn upsert_profile(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::from_validation(validation_errors));
    }

    let skills = serde_json::to_string(&parse_skills(&payload.skills))?;
    let social = serde_json::to_string(&payload.social_links())?;
    let bio = payload.bio.as_deref().map(sanitize_text);

    sqlx::query(
        r#"
        INSERT INTO profiles
            (user_id, status, company, website, location, bio, github_username,
             skills, social, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id) DO UPDATE SET
            status = excluded.status,
            company = excluded.company,
            website = excluded.website,
            location = excluded.location,
            bio = excluded.bio,
            github_username = excluded.github_username,
            skills = excluded.skills,
            social = excluded.social,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(claims.user.id)
    .bind(&payload.status)
    .bind(&payload.company)
    .bind(&payload.website)
    .bind(&payload.location)
    .bind(&bio)
    .bind(&payload.github_username)
    .bind(&skills)
    .bind(&social)
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await?;

    let profile = load_profile(&pool, claims.user.id)
        .await?
        .ok_or(AppError::ServerError("profile missing after upsert".to_string()))?;

    Ok(Json(profile))
}

/// List all profiles, each populated with the owner's name and avatar.
pub async fn list_profiles(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!("{} ORDER BY p.id", PROFILE_ROW_QUERY))
        .fetch_all(&pool)
        .await?;

    let mut profiles = Vec::with_capacity(rows.len());
    for row in rows {
        profiles.push(assemble_profile(&pool, row).await?);
    }

    Ok(Json(profiles))
}

/// Get a profile by user id. A malformed id is indistinguishable from a
/// missing profile.
pub async fn profile_by_user(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id: i64 = user_id
        .parse()
        .map_err(|_| AppError::NotFound("Profile not found".to_string()))?;

    let profile = load_profile(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Delete the caller's account: posts, profile, then the user record. The
/// schema cascades likes, comments and sub-records.
pub async fn delete_account(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM posts WHERE user_id = ?")
        .bind(claims.user.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM profiles WHERE user_id = ?")
        .bind(claims.user.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(claims.user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(serde_json::json!({ "msg": "User deleted" })))
}

/// Returns the caller's profile id, or 404 if no profile exists yet.
async fn caller_profile_id(pool: &SqlitePool, user_id: i64) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound(
            "There is no profile for this user".to_string(),
        ))
}

/// Add an experience entry to the caller's profile. Entries are listed
/// most-recent-first.
pub async fn add_experience(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddExperienceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::from_validation(validation_errors));
    }

    let profile_id = caller_profile_id(&pool, claims.user.id).await?;

    sqlx::query(
        r#"
        INSERT INTO experiences
            (profile_id, title, company, location, from_date, to_date, current, description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(profile_id)
    .bind(&payload.title)
    .bind(&payload.company)
    .bind(&payload.location)
    .bind(payload.from_date)
    .bind(payload.to_date)
    .bind(payload.current)
    .bind(&payload.description)
    .execute(&pool)
    .await?;

    let profile = load_profile(&pool, claims.user.id)
        .await?
        .ok_or(AppError::ServerError("profile missing after insert".to_string()))?;

    Ok(Json(profile))
}

/// Remove an experience entry by its own id. Only the profile owner may
/// remove it.
pub async fn delete_experience(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(exp_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exp_id: i64 = exp_id
        .parse()
        .map_err(|_| AppError::NotFound("Experience not found".to_string()))?;

    let owner = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT p.user_id
        FROM experiences e
        JOIN profiles p ON p.id = e.profile_id
        WHERE e.id = ?
        "#,
    )
    .bind(exp_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Experience not found".to_string()))?;

    if owner != claims.user.id {
        return Err(AppError::Unauthorized("User not authorized".to_string()));
    }

    sqlx::query("DELETE FROM experiences WHERE id = ?")
        .bind(exp_id)
        .execute(&pool)
        .await?;

    let profile = load_profile(&pool, claims.user.id)
        .await?
        .ok_or(AppError::ServerError("profile missing after delete".to_string()))?;

    Ok(Json(profile))
}

/// Add an education entry to the caller's profile.
pub async fn add_education(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddEducationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::from_validation(validation_errors));
    }

    let profile_id = caller_profile_id(&pool, claims.user.id).await?;

    sqlx::query(
        r#"
        INSERT INTO educations
            (profile_id, school, degree, field_of_study, from_date, to_date, current, description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(profile_id)
    .bind(&payload.school)
    .bind(&payload.degree)
    .bind(&payload.field_of_study)
    .bind(payload.from_date)
    .bind(payload.to_date)
    .bind(payload.current)
    .bind(&payload.description)
    .execute(&pool)
    .await?;

    let profile = load_profile(&pool, claims.user.id)
        .await?
        .ok_or(AppError::ServerError("profile missing after insert".to_string()))?;

    Ok(Json(profile))
}

/// Remove an education entry by its own id.
pub async fn delete_education(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(edu_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let edu_id: i64 = edu_id
        .parse()
        .map_err(|_| AppError::NotFound("Education not found".to_string()))?;

    let owner = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT p.user_id
        FROM educations e
        JOIN profiles p ON p.id = e.profile_id
        WHERE e.id = ?
        "#,
    )
    .bind(edu_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Education not found".to_string()))?;

    if owner != claims.user.id {
        return Err(AppError::Unauthorized("User not authorized".to_string()));
    }

    sqlx::query("DELETE FROM educations WHERE id = ?")
        .bind(edu_id)
        .execute(&pool)
        .await?;

    let profile = load_profile(&pool, claims.user.id)
        .await?
        .ok_or(AppError::ServerError("profile missing after delete".to_string()))?;

    Ok(Json(profile))
}

/// Proxy the five most recently created repositories for a GitHub user.
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let repos = github::fetch_user_repos(&state.http, &state.config, &username).await?;

    Ok(Json(repos))
}
