// src/routes.rs

use std::path::Path;

use axum::{
    Router, http::Method, middleware,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, posts, profile, users},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (users, auth, profile, posts).
/// * Applies the auth middleware to the private routes only.
/// * Applies global middleware (Trace, CORS) and, when the configured client
///   build directory exists, serves it for non-API paths with an index.html
///   fallback.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static("x-auth-token"),
        ]);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let users_routes = Router::new().route("/", post(users::register));

    let auth_routes = Router::new().route("/", post(auth::login)).merge(
        Router::new()
            .route("/", get(auth::current_user))
            .route_layer(require_auth.clone()),
    );

    let profile_routes = Router::new()
        .route("/", get(profile::list_profiles))
        .route("/user/{user_id}", get(profile::profile_by_user))
        .route("/github/{username}", get(profile::github_repos))
        .merge(
            Router::new()
                .route("/me", get(profile::my_profile))
                .route(
                    "/",
                    post(profile::upsert_profile).delete(profile::delete_account),
                )
                .route("/experience", put(profile::add_experience))
                .route("/experience/{exp_id}", delete(profile::delete_experience))
                .route("/education", put(profile::add_education))
                .route("/education/{edu_id}", delete(profile::delete_education))
                .route_layer(require_auth.clone()),
        );

    let posts_routes = Router::new()
        .route("/", get(posts::get_posts).post(posts::create_post))
        .route("/{id}", get(posts::get_post).delete(posts::delete_post))
        .route("/like/{id}", put(posts::like_post))
        .route("/unlike/{id}", put(posts::unlike_post))
        .route("/comment/{id}", post(posts::add_comment))
        .route("/comment/{id}/{comment_id}", delete(posts::delete_comment))
        .route_layer(require_auth);

    let mut router = Router::new()
        .nest("/api/users", users_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/posts", posts_routes);

    // SPA fallback: serve the production client build for everything else.
    let client_dir = Path::new(&state.config.client_dir);
    if client_dir.is_dir() {
        let index = client_dir.join("index.html");
        router = router.fallback_service(ServeDir::new(client_dir).fallback(ServeFile::new(index)));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
