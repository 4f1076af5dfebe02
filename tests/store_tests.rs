// tests/store_tests.rs

use std::sync::Arc;
use std::time::Duration;

use devconnect::client::actions::{set_alert, set_alert_with_timeout};
use devconnect::client::store::{
    Action, AlertSeverity, MemoryTokenStorage, RequestError, Store, TokenStorage,
};
use devconnect::models::post::{Comment, Like, Post};
use devconnect::models::profile::{Profile, ProfileUser, SocialLinks};
use devconnect::models::user::User;

fn sample_user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password: String::new(),
        avatar: "https://www.gravatar.com/avatar/0".to_string(),
        created_at: chrono::Utc::now(),
    }
}

fn sample_profile(id: i64, user_id: i64, name: &str) -> Profile {
    Profile {
        id,
        user: ProfileUser {
            id: user_id,
            name: name.to_string(),
            avatar: "https://www.gravatar.com/avatar/0".to_string(),
        },
        status: "Developer".to_string(),
        company: None,
        website: None,
        location: None,
        bio: None,
        github_username: None,
        skills: vec!["rust".to_string()],
        social: SocialLinks::default(),
        experience: Vec::new(),
        education: Vec::new(),
        updated_at: chrono::Utc::now(),
    }
}

fn sample_post(id: i64, user_id: i64) -> Post {
    Post {
        id,
        user_id,
        text: format!("post {}", id),
        name: "Ada".to_string(),
        avatar: "https://www.gravatar.com/avatar/0".to_string(),
        likes: Vec::new(),
        comments: Vec::new(),
        created_at: chrono::Utc::now(),
    }
}

fn new_store() -> Arc<Store> {
    Store::new(Arc::new(MemoryTokenStorage::default()))
}

#[tokio::test(start_paused = true)]
async fn alert_is_visible_immediately_and_expires_alone() {
    let store = new_store();

    let short = set_alert(&store, "Profile Updated", AlertSeverity::Success);
    let long = set_alert_with_timeout(
        &store,
        "Invalid credentials",
        AlertSeverity::Danger,
        Duration::from_millis(8000),
    );

    // Present right after dispatch.
    let alerts = store.alerts();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].id, short);
    assert_eq!(alerts[0].msg, "Profile Updated");

    // Let the removal tasks register their timers, then cross the default
    // timeout. Only the short alert may disappear.
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(5001)).await;
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let alerts = store.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, long);

    tokio::time::advance(Duration::from_millis(3000)).await;
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    assert!(store.alerts().is_empty());
}

#[tokio::test]
async fn login_success_authenticates_and_persists_the_token() {
    let storage = Arc::new(MemoryTokenStorage::default());
    let store = Store::new(storage.clone() as Arc<dyn TokenStorage>);

    store.dispatch(Action::LoginSuccess {
        token: "signed.jwt.token".to_string(),
    });

    let auth = store.auth();
    assert_eq!(auth.authenticated, Some(true));
    assert!(!auth.loading);
    assert_eq!(auth.token.as_deref(), Some("signed.jwt.token"));
    assert_eq!(storage.load().as_deref(), Some("signed.jwt.token"));

    store.dispatch(Action::UserLoaded(sample_user(1, "Ada")));
    let auth = store.auth();
    assert_eq!(auth.user.as_ref().map(|u| u.name.as_str()), Some("Ada"));
    assert_eq!(auth.token.as_deref(), Some("signed.jwt.token"));
}

#[tokio::test]
async fn auth_failure_clears_the_stored_token() {
    let storage = Arc::new(MemoryTokenStorage::default());
    storage.save("stale.jwt.token");

    let store = Store::new(storage.clone() as Arc<dyn TokenStorage>);
    assert_eq!(store.auth().token.as_deref(), Some("stale.jwt.token"));

    store.dispatch(Action::AuthError);

    let auth = store.auth();
    assert_eq!(auth.token, None);
    assert_eq!(auth.authenticated, Some(false));
    assert!(storage.load().is_none());
}

#[tokio::test]
async fn logout_clears_session_but_not_other_slices_lists() {
    let store = new_store();
    store.dispatch(Action::LoginSuccess {
        token: "signed.jwt.token".to_string(),
    });
    store.dispatch(Action::GetPosts(vec![sample_post(1, 7)]));

    store.dispatch(Action::ClearProfile);
    store.dispatch(Action::Logout);

    assert_eq!(store.auth().token, None);
    assert_eq!(store.auth().authenticated, Some(false));
    // The posts list is untouched by auth transitions.
    assert_eq!(store.posts().posts.len(), 1);
}

#[tokio::test]
async fn profile_error_clears_the_current_profile() {
    let store = new_store();
    store.dispatch(Action::GetProfile(sample_profile(1, 7, "Stranger")));
    assert!(store.profile().profile.is_some());

    store.dispatch(Action::ProfileError(RequestError {
        message: "Unauthorized".to_string(),
        status: Some(401),
    }));

    let profile = store.profile();
    assert!(profile.profile.is_none());
    assert_eq!(profile.error.as_ref().map(|e| e.status), Some(Some(401)));
    assert!(!profile.loading);
}

#[tokio::test]
async fn no_stale_profile_between_clear_and_next_load() {
    let store = new_store();

    // A stranger's profile was viewed earlier.
    store.dispatch(Action::GetProfiles(vec![sample_profile(1, 7, "Stranger")]));
    store.dispatch(Action::GetProfile(sample_profile(1, 7, "Stranger")));

    store.dispatch(Action::ClearProfile);
    let cleared = store.profile();
    assert!(cleared.profile.is_none());
    assert!(cleared.repos.is_empty());

    store.dispatch(Action::GetProfile(sample_profile(2, 9, "Me")));
    let loaded = store.profile();
    assert_eq!(loaded.profile.as_ref().map(|p| p.user.id), Some(9));
}

#[tokio::test]
async fn posts_prepend_delete_and_update_likes_only_the_matching_post() {
    let store = new_store();

    store.dispatch(Action::GetPosts(vec![sample_post(2, 7), sample_post(1, 7)]));
    store.dispatch(Action::AddPost(sample_post(3, 7)));

    let posts = store.posts().posts;
    assert_eq!(
        posts.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );

    store.dispatch(Action::UpdateLikes {
        id: 2,
        likes: vec![Like { id: 10, user_id: 9 }],
    });
    let posts = store.posts().posts;
    assert!(posts.iter().find(|p| p.id == 2).unwrap().likes.len() == 1);
    assert!(posts.iter().find(|p| p.id == 3).unwrap().likes.is_empty());
    assert!(posts.iter().find(|p| p.id == 1).unwrap().likes.is_empty());

    store.dispatch(Action::DeletePost(2));
    let posts = store.posts().posts;
    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 1]);
}

#[tokio::test]
async fn comment_transitions_only_touch_the_single_post() {
    let store = new_store();

    store.dispatch(Action::GetPost(sample_post(5, 7)));

    let comment = |id: i64, text: &str| Comment {
        id,
        user_id: 9,
        text: text.to_string(),
        name: "Eve".to_string(),
        avatar: "https://www.gravatar.com/avatar/0".to_string(),
        created_at: chrono::Utc::now(),
    };

    store.dispatch(Action::AddComment(vec![
        comment(2, "second"),
        comment(1, "first"),
    ]));
    let post = store.posts().post.unwrap();
    assert_eq!(post.comments.len(), 2);

    store.dispatch(Action::RemoveComment(1));
    let post = store.posts().post.unwrap();
    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].id, 2);
}
