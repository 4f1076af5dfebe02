// src/models/profile.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// The owner summary embedded in every profile response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUser {
    pub id: i64,
    pub name: String,
    pub avatar: String,
}

/// Per-platform links. Only the populated entries appear on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// A work history entry. Listed most-recent-first.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    #[serde(rename = "from")]
    pub from_date: NaiveDate,
    #[serde(rename = "to")]
    pub to_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// An education entry. Listed most-recent-first.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Education {
    pub id: i64,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    #[serde(rename = "from")]
    pub from_date: NaiveDate,
    #[serde(rename = "to")]
    pub to_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// The full profile document as it appears on the wire: one per user,
/// populated with the owner's name and avatar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user: ProfileUser,
    pub status: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Raw 'profiles' row joined with its owner. Skills and social links are
/// stored as JSON text and decoded during assembly.
#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_avatar: String,
    pub status: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub skills: String,
    pub social: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ProfileRow {
    pub fn into_profile(
        self,
        experience: Vec<Experience>,
        education: Vec<Education>,
    ) -> Result<Profile, serde_json::Error> {
        Ok(Profile {
            id: self.id,
            user: ProfileUser {
                id: self.user_id,
                name: self.user_name,
                avatar: self.user_avatar,
            },
            status: self.status,
            company: self.company,
            website: self.website,
            location: self.location,
            bio: self.bio,
            github_username: self.github_username,
            skills: serde_json::from_str(&self.skills)?,
            social: serde_json::from_str(&self.social)?,
            experience,
            education,
            updated_at: self.updated_at,
        })
    }
}

/// DTO for the create/update ("upsert") operation.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,

    /// Comma-separated; re-derived into the stored list on every upsert.
    #[validate(length(min = 1, message = "Skills is required"))]
    pub skills: String,

    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,

    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl UpsertProfileRequest {
    pub fn social_links(&self) -> SocialLinks {
        SocialLinks {
            youtube: self.youtube.clone(),
            twitter: self.twitter.clone(),
            facebook: self.facebook.clone(),
            linkedin: self.linkedin.clone(),
            instagram: self.instagram.clone(),
        }
    }
}

/// DTO for adding an experience entry.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddExperienceRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,

    pub location: Option<String>,

    #[validate(required(message = "From date is required"))]
    #[serde(rename = "from")]
    pub from_date: Option<NaiveDate>,

    #[serde(rename = "to")]
    pub to_date: Option<NaiveDate>,

    #[serde(default)]
    pub current: bool,

    pub description: Option<String>,
}

/// DTO for adding an education entry.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddEducationRequest {
    #[validate(length(min = 1, message = "School is required"))]
    pub school: String,

    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,

    #[validate(length(min = 1, message = "Field of study is required"))]
    pub field_of_study: String,

    #[validate(required(message = "From date is required"))]
    #[serde(rename = "from")]
    pub from_date: Option<NaiveDate>,

    #[serde(rename = "to")]
    pub to_date: Option<NaiveDate>,

    #[serde(default)]
    pub current: bool,

    pub description: Option<String>,
}

/// The subset of a GitHub repository the profile page renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubRepo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub watchers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
}

/// Splits a comma-separated skills string into the stored list, trimming
/// whitespace and dropping empty segments. Idempotent on already-trimmed
/// input.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_are_split_and_trimmed() {
        assert_eq!(parse_skills("go, rust , ts"), vec!["go", "rust", "ts"]);
    }

    #[test]
    fn split_trim_is_idempotent() {
        let once = parse_skills("go, rust , ts");
        let twice = parse_skills(&once.join(","));
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(parse_skills("go,,rust, "), vec!["go", "rust"]);
    }

    #[test]
    fn social_links_omit_unset_platforms() {
        let links = SocialLinks {
            twitter: Some("https://twitter.com/dev".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&links).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["twitter"], "https://twitter.com/dev");
    }
}
