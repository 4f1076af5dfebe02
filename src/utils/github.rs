// src/utils/github.rs

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::USER_AGENT;

use crate::{config::Config, error::AppError, models::profile::GithubRepo};

/// Shape of a GitHub login: alphanumeric with inner hyphens, max 39 chars.
/// Anything else short-circuits to "not found" before touching the network,
/// the same way malformed record ids fold into 404 elsewhere.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{0,38}$").expect("valid regex literal"));

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Fetches the five most recently created public repositories for a user.
///
/// A non-2xx upstream response is reported as "No GitHub profile found"
/// rather than leaking upstream status detail.
pub async fn fetch_user_repos(
    http: &reqwest::Client,
    config: &Config,
    username: &str,
) -> Result<Vec<GithubRepo>, AppError> {
    if !is_valid_username(username) {
        return Err(AppError::NotFound("No GitHub profile found".to_string()));
    }

    let mut request = http
        .get(format!("https://api.github.com/users/{}/repos", username))
        .query(&[("per_page", "5"), ("sort", "created:asc")])
        .header(USER_AGENT, "devconnect");

    if let (Some(id), Some(secret)) = (&config.github_client_id, &config.github_client_secret) {
        request = request.query(&[("client_id", id.as_str()), ("client_secret", secret.as_str())]);
    }

    let response = request
        .send()
        .await
        .map_err(|e| AppError::ServerError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AppError::NotFound("No GitHub profile found".to_string()));
    }

    response
        .json::<Vec<GithubRepo>>()
        .await
        .map_err(|e| AppError::ServerError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_logins() {
        assert!(is_valid_username("octocat"));
        assert!(is_valid_username("rust-lang"));
        assert!(is_valid_username("a"));
    }

    #[test]
    fn rejects_path_traversal_shapes() {
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("a/b"));
        assert!(!is_valid_username("..%2f"));
        assert!(!is_valid_username("-leading-hyphen"));
    }
}
