// src/client/actions.rs

//! The sync layer: each function performs exactly one network call, then
//! dispatches either the mapped success transition(s) or an error transition,
//! plus one alert per server-side field validation message. There are no
//! retries; a failed call surfaces immediately through the alert slice.
//!
//! Navigation after profile writes and the confirmation prompt before account
//! deletion belong to the view layer and are deliberately absent here.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::models::post::{Comment, CreateCommentRequest, CreatePostRequest, Like, Post};
use crate::models::profile::{
    AddEducationRequest, AddExperienceRequest, GithubRepo, Profile, UpsertProfileRequest,
};
use crate::models::user::{LoginRequest, RegisterRequest, TokenResponse, User};

use super::api::{ApiClient, ApiError};
use super::store::{ALERT_TIMEOUT, Action, Alert, AlertSeverity, RequestError, Store};

/// Shows an alert and schedules its removal after `timeout`. Exactly one
/// removal task is spawned per alert, keyed by the alert's unique id, so
/// interleaved dispatches cannot expire someone else's alert.
pub fn set_alert_with_timeout(
    store: &Arc<Store>,
    msg: impl Into<String>,
    severity: AlertSeverity,
    timeout: Duration,
) -> Uuid {
    let id = Uuid::new_v4();
    store.dispatch(Action::SetAlert(Alert {
        id,
        msg: msg.into(),
        severity,
    }));

    // The deadline is fixed here, at dispatch time, so the removal fires
    // exactly `timeout` after the alert appeared no matter when the task
    // first gets polled.
    let deadline = tokio::time::Instant::now() + timeout;
    let store = Arc::clone(store);
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        store.dispatch(Action::RemoveAlert(id));
    });

    id
}

pub fn set_alert(store: &Arc<Store>, msg: impl Into<String>, severity: AlertSeverity) -> Uuid {
    set_alert_with_timeout(store, msg, severity, ALERT_TIMEOUT)
}

fn alert_field_errors(store: &Arc<Store>, err: &ApiError) {
    for msg in &err.field_errors {
        set_alert(store, msg.clone(), AlertSeverity::Danger);
    }
}

fn request_error(err: &ApiError) -> RequestError {
    RequestError {
        message: err.message.clone(),
        status: err.status,
    }
}

/// Fetches the caller's user record with the stored token, settling the auth
/// slice either way.
pub async fn load_user(store: &Arc<Store>, api: &ApiClient) {
    if let Some(token) = store.auth().token {
        api.set_token(Some(token));
    }

    match api.get::<User>("/api/auth").await {
        Ok(user) => store.dispatch(Action::UserLoaded(user)),
        Err(_) => store.dispatch(Action::AuthError),
    }
}

pub async fn register(store: &Arc<Store>, api: &ApiClient, payload: &RegisterRequest) {
    match api.post::<TokenResponse, _>("/api/users", payload).await {
        Ok(res) => {
            api.set_token(Some(res.token.clone()));
            store.dispatch(Action::RegisterSuccess { token: res.token });
            load_user(store, api).await;
        }
        Err(err) => {
            alert_field_errors(store, &err);
            store.dispatch(Action::RegisterFail);
        }
    }
}

pub async fn login(store: &Arc<Store>, api: &ApiClient, payload: &LoginRequest) {
    match api.post::<TokenResponse, _>("/api/auth", payload).await {
        Ok(res) => {
            api.set_token(Some(res.token.clone()));
            store.dispatch(Action::LoginSuccess { token: res.token });
            load_user(store, api).await;
        }
        Err(err) => {
            alert_field_errors(store, &err);
            store.dispatch(Action::LoginFail);
        }
    }
}

/// Purely client-side: discard the token and clear profile state. The server
/// keeps no session to invalidate.
pub fn logout(store: &Arc<Store>, api: &ApiClient) {
    api.set_token(None);
    store.dispatch(Action::ClearProfile);
    store.dispatch(Action::Logout);
}

pub async fn get_current_profile(store: &Arc<Store>, api: &ApiClient) {
    match api.get::<Profile>("/api/profile/me").await {
        Ok(profile) => store.dispatch(Action::GetProfile(profile)),
        Err(err) => store.dispatch(Action::ProfileError(request_error(&err))),
    }
}

pub async fn get_profiles(store: &Arc<Store>, api: &ApiClient) {
    store.dispatch(Action::ClearProfile);

    match api.get::<Vec<Profile>>("/api/profile").await {
        Ok(profiles) => store.dispatch(Action::GetProfiles(profiles)),
        Err(err) => store.dispatch(Action::ProfileError(request_error(&err))),
    }
}

pub async fn get_profile_by_id(store: &Arc<Store>, api: &ApiClient, user_id: i64) {
    match api.get::<Profile>(&format!("/api/profile/user/{}", user_id)).await {
        Ok(profile) => store.dispatch(Action::GetProfile(profile)),
        Err(err) => store.dispatch(Action::ProfileError(request_error(&err))),
    }
}

pub async fn get_github_repos(store: &Arc<Store>, api: &ApiClient, username: &str) {
    match api
        .get::<Vec<GithubRepo>>(&format!("/api/profile/github/{}", username))
        .await
    {
        Ok(repos) => store.dispatch(Action::GetRepos(repos)),
        Err(err) => store.dispatch(Action::ProfileError(request_error(&err))),
    }
}

/// Create or update the caller's profile. `editing` only changes the alert
/// wording.
pub async fn create_or_update_profile(
    store: &Arc<Store>,
    api: &ApiClient,
    payload: &UpsertProfileRequest,
    editing: bool,
) {
    match api.post::<Profile, _>("/api/profile", payload).await {
        Ok(profile) => {
            store.dispatch(Action::GetProfile(profile));
            let msg = if editing { "Profile Updated" } else { "Profile Created" };
            set_alert(store, msg, AlertSeverity::Success);
        }
        Err(err) => {
            alert_field_errors(store, &err);
            store.dispatch(Action::ProfileError(request_error(&err)));
        }
    }
}

pub async fn add_experience(store: &Arc<Store>, api: &ApiClient, payload: &AddExperienceRequest) {
    match api.put_json::<Profile, _>("/api/profile/experience", payload).await {
        Ok(profile) => {
            store.dispatch(Action::UpdateProfile(profile));
            set_alert(store, "Experience Added", AlertSeverity::Success);
        }
        Err(err) => {
            alert_field_errors(store, &err);
            store.dispatch(Action::ProfileError(request_error(&err)));
        }
    }
}

pub async fn add_education(store: &Arc<Store>, api: &ApiClient, payload: &AddEducationRequest) {
    match api.put_json::<Profile, _>("/api/profile/education", payload).await {
        Ok(profile) => {
            store.dispatch(Action::UpdateProfile(profile));
            set_alert(store, "Education Added", AlertSeverity::Success);
        }
        Err(err) => {
            alert_field_errors(store, &err);
            store.dispatch(Action::ProfileError(request_error(&err)));
        }
    }
}

pub async fn delete_experience(store: &Arc<Store>, api: &ApiClient, exp_id: i64) {
    match api
        .delete::<Profile>(&format!("/api/profile/experience/{}", exp_id))
        .await
    {
        Ok(profile) => {
            store.dispatch(Action::UpdateProfile(profile));
            set_alert(store, "Experience Removed", AlertSeverity::Success);
        }
        Err(err) => store.dispatch(Action::ProfileError(request_error(&err))),
    }
}

pub async fn delete_education(store: &Arc<Store>, api: &ApiClient, edu_id: i64) {
    match api
        .delete::<Profile>(&format!("/api/profile/education/{}", edu_id))
        .await
    {
        Ok(profile) => {
            store.dispatch(Action::UpdateProfile(profile));
            set_alert(store, "Education Removed", AlertSeverity::Success);
        }
        Err(err) => store.dispatch(Action::ProfileError(request_error(&err))),
    }
}

/// Deletes the account and everything under it. Callers are expected to have
/// confirmed with the user first.
pub async fn delete_account(store: &Arc<Store>, api: &ApiClient) {
    match api.delete::<serde_json::Value>("/api/profile").await {
        Ok(_) => {
            api.set_token(None);
            store.dispatch(Action::ClearProfile);
            store.dispatch(Action::Logout);
            set_alert(
                store,
                "Your account has been permanently deleted",
                AlertSeverity::Success,
            );
        }
        Err(err) => store.dispatch(Action::ProfileError(request_error(&err))),
    }
}

pub async fn get_posts(store: &Arc<Store>, api: &ApiClient) {
    match api.get::<Vec<Post>>("/api/posts").await {
        Ok(posts) => store.dispatch(Action::GetPosts(posts)),
        Err(err) => store.dispatch(Action::PostError(request_error(&err))),
    }
}

pub async fn get_post(store: &Arc<Store>, api: &ApiClient, id: i64) {
    match api.get::<Post>(&format!("/api/posts/{}", id)).await {
        Ok(post) => store.dispatch(Action::GetPost(post)),
        Err(err) => store.dispatch(Action::PostError(request_error(&err))),
    }
}

pub async fn add_post(store: &Arc<Store>, api: &ApiClient, payload: &CreatePostRequest) {
    match api.post::<Post, _>("/api/posts", payload).await {
        Ok(post) => {
            store.dispatch(Action::AddPost(post));
            set_alert(store, "Post Created", AlertSeverity::Success);
        }
        Err(err) => {
            alert_field_errors(store, &err);
            store.dispatch(Action::PostError(request_error(&err)));
        }
    }
}

pub async fn delete_post(store: &Arc<Store>, api: &ApiClient, id: i64) {
    match api.delete::<serde_json::Value>(&format!("/api/posts/{}", id)).await {
        Ok(_) => {
            store.dispatch(Action::DeletePost(id));
            set_alert(store, "Post Removed", AlertSeverity::Success);
        }
        Err(err) => store.dispatch(Action::PostError(request_error(&err))),
    }
}

pub async fn add_like(store: &Arc<Store>, api: &ApiClient, id: i64) {
    match api.put::<Vec<Like>>(&format!("/api/posts/like/{}", id)).await {
        Ok(likes) => store.dispatch(Action::UpdateLikes { id, likes }),
        Err(err) => store.dispatch(Action::PostError(request_error(&err))),
    }
}

pub async fn remove_like(store: &Arc<Store>, api: &ApiClient, id: i64) {
    match api.put::<Vec<Like>>(&format!("/api/posts/unlike/{}", id)).await {
        Ok(likes) => store.dispatch(Action::UpdateLikes { id, likes }),
        Err(err) => store.dispatch(Action::PostError(request_error(&err))),
    }
}

pub async fn add_comment(
    store: &Arc<Store>,
    api: &ApiClient,
    post_id: i64,
    payload: &CreateCommentRequest,
) {
    match api
        .post::<Vec<Comment>, _>(&format!("/api/posts/comment/{}", post_id), payload)
        .await
    {
        Ok(comments) => {
            store.dispatch(Action::AddComment(comments));
            set_alert(store, "Comment Added", AlertSeverity::Success);
        }
        Err(err) => {
            alert_field_errors(store, &err);
            store.dispatch(Action::PostError(request_error(&err)));
        }
    }
}

pub async fn delete_comment(store: &Arc<Store>, api: &ApiClient, post_id: i64, comment_id: i64) {
    match api
        .delete::<Vec<Comment>>(&format!("/api/posts/comment/{}/{}", post_id, comment_id))
        .await
    {
        Ok(_) => {
            store.dispatch(Action::RemoveComment(comment_id));
            set_alert(store, "Comment Removed", AlertSeverity::Success);
        }
        Err(err) => store.dispatch(Action::PostError(request_error(&err))),
    }
}
