//! GitHub repository-listing proxy.
//!
//! One outbound call per request, fixed page size, no pagination and no
//! caching. GitHub's status codes are mapped to caller-facing outcomes
//! rather than passed through raw.

pub mod handlers;

use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;

const GITHUB_API_URL: &str = "https://api.github.com";
/// Fixed page size; we never paginate past the first page.
const PER_PAGE: u32 = 30;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub user not found")]
    UserNotFound,

    #[error("GitHub rate limit exceeded")]
    RateLimited,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error (status {status})")]
    Upstream { status: u16 },
}

impl From<GithubError> for AppError {
    fn from(e: GithubError) -> Self {
        match e {
            GithubError::UserNotFound => AppError::NotFound(e.to_string()),
            GithubError::RateLimited => AppError::RateLimited(e.to_string()),
            GithubError::Http(_) | GithubError::Upstream { .. } => {
                AppError::Upstream(e.to_string())
            }
        }
    }
}

/// Raw repository object as GitHub returns it (only the fields we keep).
#[derive(Debug, Deserialize)]
struct GithubRepo {
    name: String,
    description: Option<String>,
    language: Option<String>,
    stargazers_count: u64,
    html_url: String,
    updated_at: Option<String>,
}

/// Reshaped repository entry returned to our callers.
#[derive(Debug, Serialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub url: String,
    pub updated_at: Option<String>,
}

impl From<GithubRepo> for RepoSummary {
    fn from(repo: GithubRepo) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            language: repo.language,
            stars: repo.stargazers_count,
            url: repo.html_url,
            updated_at: repo.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RepoListing {
    pub repos: Vec<RepoSummary>,
    pub total_count: usize,
    pub rate_limit_remaining: Option<u64>,
}

/// Maps a non-success GitHub status to our error taxonomy.
/// GitHub signals primary-rate-limit rejections as 403.
fn classify_status(status: StatusCode) -> GithubError {
    match status.as_u16() {
        404 => GithubError::UserNotFound,
        403 => GithubError::RateLimited,
        other => GithubError::Upstream { status: other },
    }
}

/// Client for GitHub's REST API. Stateless and safely shared across requests.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
}

impl GithubClient {
    pub fn new() -> Self {
        Self {
            // GitHub rejects requests without a User-Agent
            client: Client::builder()
                .user_agent(concat!("skill-navigator-api/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Lists a user's public repositories, newest-updated first.
    pub async fn list_user_repos(
        &self,
        username: &str,
        token: Option<&str>,
    ) -> Result<RepoListing, GithubError> {
        let url = format!("{GITHUB_API_URL}/users/{username}/repos");
        self.fetch_repos(&url, token).await
    }

    /// Lists the repositories of the account the token belongs to,
    /// including private ones the token can see.
    pub async fn list_own_repos(&self, token: &str) -> Result<RepoListing, GithubError> {
        let url = format!("{GITHUB_API_URL}/user/repos");
        self.fetch_repos(&url, Some(token)).await
    }

    async fn fetch_repos(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<RepoListing, GithubError> {
        let mut request = self
            .client
            .get(url)
            .query(&[("per_page", PER_PAGE.to_string()), ("sort", "updated".to_string())])
            .header(header::ACCEPT, "application/vnd.github+json");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let rate_limit_remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let raw: Vec<GithubRepo> = response.json().await?;
        let repos: Vec<RepoSummary> = raw.into_iter().map(RepoSummary::from).collect();

        Ok(RepoListing {
            total_count: repos.len(),
            repos,
            rate_limit_remaining,
        })
    }
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}
