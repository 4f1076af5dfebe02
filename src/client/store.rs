// src/client/store.rs

//! The state container. One mutex guards all slices, so transitions are
//! serialized; each slice is replaced wholesale by a pure reducer and never
//! mutated in place. Late responses from abandoned views are harmless for the
//! same reason: a transition is an idempotent replacement, not a patch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::post::{Comment, Like, Post};
use crate::models::profile::{GithubRepo, Profile};
use crate::models::user::User;

/// How long an alert stays visible unless removed explicitly.
pub const ALERT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Success,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub id: Uuid,
    pub msg: String,
    pub severity: AlertSeverity,
}

/// What a failed request leaves behind in a slice.
#[derive(Debug, Clone)]
pub struct RequestError {
    pub message: String,
    pub status: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct AuthSlice {
    pub token: Option<String>,
    /// `None` until the first auth-related response settles it.
    pub authenticated: Option<bool>,
    pub loading: bool,
    pub user: Option<User>,
}

#[derive(Debug, Clone)]
pub struct ProfileSlice {
    pub profile: Option<Profile>,
    pub profiles: Vec<Profile>,
    pub repos: Vec<GithubRepo>,
    pub loading: bool,
    pub error: Option<RequestError>,
}

impl Default for ProfileSlice {
    fn default() -> Self {
        Self {
            profile: None,
            profiles: Vec::new(),
            repos: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostSlice {
    pub posts: Vec<Post>,
    pub post: Option<Post>,
    pub loading: bool,
    pub error: Option<RequestError>,
}

impl Default for PostSlice {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            post: None,
            loading: true,
            error: None,
        }
    }
}

/// Every intent the container understands. Reducers ignore actions that do
/// not concern their slice.
#[derive(Debug, Clone)]
pub enum Action {
    // auth
    UserLoaded(User),
    LoginSuccess { token: String },
    RegisterSuccess { token: String },
    AuthError,
    LoginFail,
    RegisterFail,
    Logout,

    // alerts
    SetAlert(Alert),
    RemoveAlert(Uuid),

    // profile
    GetProfile(Profile),
    UpdateProfile(Profile),
    GetProfiles(Vec<Profile>),
    GetRepos(Vec<GithubRepo>),
    ProfileError(RequestError),
    ClearProfile,

    // posts
    GetPosts(Vec<Post>),
    GetPost(Post),
    AddPost(Post),
    DeletePost(i64),
    UpdateLikes { id: i64, likes: Vec<Like> },
    AddComment(Vec<Comment>),
    RemoveComment(i64),
    PostError(RequestError),
}

fn reduce_auth(state: &AuthSlice, action: &Action) -> AuthSlice {
    match action {
        Action::UserLoaded(user) => AuthSlice {
            token: state.token.clone(),
            authenticated: Some(true),
            loading: false,
            user: Some(user.clone()),
        },
        Action::LoginSuccess { token } | Action::RegisterSuccess { token } => AuthSlice {
            token: Some(token.clone()),
            authenticated: Some(true),
            loading: false,
            user: state.user.clone(),
        },
        Action::AuthError | Action::LoginFail | Action::RegisterFail | Action::Logout => {
            AuthSlice {
                token: None,
                authenticated: Some(false),
                loading: false,
                user: state.user.clone(),
            }
        }
        _ => state.clone(),
    }
}

fn reduce_alerts(state: &[Alert], action: &Action) -> Vec<Alert> {
    match action {
        Action::SetAlert(alert) => {
            let mut next = state.to_vec();
            next.push(alert.clone());
            next
        }
        Action::RemoveAlert(id) => state.iter().filter(|a| a.id != *id).cloned().collect(),
        _ => state.to_vec(),
    }
}

fn reduce_profile(state: &ProfileSlice, action: &Action) -> ProfileSlice {
    match action {
        Action::GetProfile(profile) | Action::UpdateProfile(profile) => ProfileSlice {
            profile: Some(profile.clone()),
            loading: false,
            ..state.clone()
        },
        Action::GetProfiles(profiles) => ProfileSlice {
            profiles: profiles.clone(),
            loading: false,
            ..state.clone()
        },
        Action::GetRepos(repos) => ProfileSlice {
            repos: repos.clone(),
            ..state.clone()
        },
        // Clearing the current profile here keeps a previously viewed
        // stranger's profile from leaking into a newly authenticated session.
        Action::ProfileError(error) => ProfileSlice {
            error: Some(error.clone()),
            loading: false,
            profile: None,
            ..state.clone()
        },
        Action::ClearProfile => ProfileSlice {
            profile: None,
            repos: Vec::new(),
            loading: false,
            ..state.clone()
        },
        _ => state.clone(),
    }
}

fn reduce_posts(state: &PostSlice, action: &Action) -> PostSlice {
    match action {
        Action::GetPosts(posts) => PostSlice {
            posts: posts.clone(),
            loading: false,
            ..state.clone()
        },
        Action::GetPost(post) => PostSlice {
            post: Some(post.clone()),
            loading: false,
            ..state.clone()
        },
        Action::AddPost(post) => {
            let mut posts = Vec::with_capacity(state.posts.len() + 1);
            posts.push(post.clone());
            posts.extend(state.posts.iter().cloned());
            PostSlice {
                posts,
                loading: false,
                ..state.clone()
            }
        }
        Action::DeletePost(id) => PostSlice {
            posts: state.posts.iter().filter(|p| p.id != *id).cloned().collect(),
            loading: false,
            ..state.clone()
        },
        Action::UpdateLikes { id, likes } => PostSlice {
            posts: state
                .posts
                .iter()
                .map(|p| {
                    if p.id == *id {
                        Post {
                            likes: likes.clone(),
                            ..p.clone()
                        }
                    } else {
                        p.clone()
                    }
                })
                .collect(),
            loading: false,
            ..state.clone()
        },
        Action::AddComment(comments) => PostSlice {
            post: state.post.as_ref().map(|p| Post {
                comments: comments.clone(),
                ..p.clone()
            }),
            loading: false,
            ..state.clone()
        },
        Action::RemoveComment(comment_id) => PostSlice {
            post: state.post.as_ref().map(|p| Post {
                comments: p
                    .comments
                    .iter()
                    .filter(|c| c.id != *comment_id)
                    .cloned()
                    .collect(),
                ..p.clone()
            }),
            loading: false,
            ..state.clone()
        },
        Action::PostError(error) => PostSlice {
            error: Some(error.clone()),
            loading: false,
            ..state.clone()
        },
        _ => state.clone(),
    }
}

/// Durable home for the session token. Injected so tests and embedders can
/// choose where (or whether) tokens survive a restart.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Keeps the token for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn save(&self, token: &str) {
        *self.token.lock() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock() = None;
    }
}

/// Stores the token in a file, surviving restarts.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Option<String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn save(&self, token: &str) {
        if let Err(e) = std::fs::write(&self.path, token) {
            tracing::warn!("failed to persist session token: {}", e);
        }
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to clear session token: {}", e);
            }
        }
    }
}

#[derive(Debug, Clone)]
struct StoreState {
    auth: AuthSlice,
    alerts: Vec<Alert>,
    profile: ProfileSlice,
    posts: PostSlice,
}

/// The container itself. Constructed once, shared by reference; all updates
/// flow through [`Store::dispatch`].
pub struct Store {
    state: Mutex<StoreState>,
    storage: Arc<dyn TokenStorage>,
}

impl Store {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Arc<Self> {
        let token = storage.load();
        Arc::new(Self {
            state: Mutex::new(StoreState {
                auth: AuthSlice {
                    token,
                    authenticated: None,
                    loading: true,
                    user: None,
                },
                alerts: Vec::new(),
                profile: ProfileSlice::default(),
                posts: PostSlice::default(),
            }),
            storage,
        })
    }

    /// Applies one action to every slice. The token side effect happens here,
    /// in the dispatch layer, so the reducers stay pure.
    pub fn dispatch(&self, action: Action) {
        {
            let mut state = self.state.lock();
            state.auth = reduce_auth(&state.auth, &action);
            state.alerts = reduce_alerts(&state.alerts, &action);
            state.profile = reduce_profile(&state.profile, &action);
            state.posts = reduce_posts(&state.posts, &action);
        }

        match &action {
            Action::LoginSuccess { token } | Action::RegisterSuccess { token } => {
                self.storage.save(token)
            }
            Action::AuthError | Action::LoginFail | Action::RegisterFail | Action::Logout => {
                self.storage.clear()
            }
            _ => {}
        }
    }

    pub fn auth(&self) -> AuthSlice {
        self.state.lock().auth.clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.state.lock().alerts.clone()
    }

    pub fn profile(&self) -> ProfileSlice {
        self.state.lock().profile.clone()
    }

    pub fn posts(&self) -> PostSlice {
        self.state.lock().posts.clone()
    }
}
