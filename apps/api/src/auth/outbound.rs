//! Descope management-API client for outbound (provider-managed) tokens.
//!
//! Descope stores third-party access tokens on the user's behalf; we fetch
//! the user's GitHub token by subject id so `/github/user-repos` can call
//! GitHub as the caller's connected account.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;

const DESCOPE_MGMT_URL: &str = "https://api.descope.com/v1/mgmt/outbound/app/user/token/latest";
/// Fixed outbound app id under which GitHub tokens are stored.
const GITHUB_APP_ID: &str = "github";

#[derive(Debug, Error)]
pub enum OutboundError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Management API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<OutboundError> for AppError {
    fn from(e: OutboundError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    #[serde(rename = "appId")]
    app_id: &'a str,
    #[serde(rename = "userId")]
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<OutboundToken>,
}

#[derive(Debug, Deserialize)]
struct OutboundToken {
    #[serde(rename = "accessToken")]
    access_token: String,
}

/// Client for Descope's outbound-token management endpoint. Authenticates
/// with `{project_id}:{management_key}` as the bearer credential.
#[derive(Clone)]
pub struct OutboundTokens {
    client: Client,
    project_id: String,
    management_key: String,
}

impl OutboundTokens {
    pub fn new(project_id: String, management_key: String) -> Self {
        Self {
            client: Client::new(),
            project_id,
            management_key,
        }
    }

    /// Fetches the caller's stored GitHub access token.
    /// Returns `Ok(None)` when the user has no linked GitHub account.
    pub async fn github_token(&self, user_id: &str) -> Result<Option<String>, OutboundError> {
        let response = self
            .client
            .post(DESCOPE_MGMT_URL)
            .bearer_auth(format!("{}:{}", self.project_id, self.management_key))
            .json(&TokenRequest {
                app_id: GITHUB_APP_ID,
                user_id,
            })
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OutboundError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await?;
        Ok(body.token.map(|t| t.access_token))
    }
}
