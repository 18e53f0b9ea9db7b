//! Axum route handlers for the GitHub proxy API.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::auth::Principal;
use crate::errors::AppError;
use crate::github::RepoListing;
use crate::state::AppState;

/// GET /github/repos/:username
///
/// Proxies GitHub's public repository listing for `username`. GitHub's
/// 404/403 become 404/429 on our side; anything else is a 502.
pub async fn handle_list_repos(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(username): Path<String>,
) -> Result<Json<RepoListing>, AppError> {
    // Use the caller's linked token when we can get one so the request
    // counts against their rate limit instead of ours.
    let token = match &state.outbound {
        Some(outbound) => outbound.github_token(&principal.subject_id).await?,
        None => None,
    };

    let listing = state
        .github
        .list_user_repos(&username, token.as_deref())
        .await?;

    Ok(Json(listing))
}

/// GET /github/user-repos
///
/// Lists the caller's own repositories through their Descope-managed GitHub
/// token. 400 when the integration is off or no GitHub account is linked.
pub async fn handle_user_repos(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<RepoListing>, AppError> {
    let outbound = state.outbound.as_ref().ok_or_else(|| {
        AppError::InvalidInput("GitHub integration is not configured".to_string())
    })?;

    let token = outbound
        .github_token(&principal.subject_id)
        .await?
        .ok_or_else(|| AppError::InvalidInput("No linked GitHub account".to_string()))?;

    let listing = state.github.list_own_repos(&token).await?;

    Ok(Json(listing))
}
