//! Axum route handler for the analysis API.

use axum::{extract::State, Extension, Json};
use serde_json::Value;

use crate::analysis::{analyze, AnalyzeRequest};
use crate::auth::Principal;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /analyze (also mounted at /api/analyze)
///
/// Runs the career-analysis pipeline. The principal is present only when
/// the auth gate verified a token; anonymous requests are allowed unless
/// `REQUIRE_AUTH` is set.
pub async fn handle_analyze(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Value>, AppError> {
    if request.career_goal.trim().is_empty() {
        return Err(AppError::InvalidInput("career_goal is required".to_string()));
    }

    let provider = state
        .completions
        .as_deref()
        .ok_or(AppError::ProviderUnavailable)?;

    let principal = principal.as_ref().map(|Extension(p)| p);
    let result = analyze(provider, request, principal).await?;

    Ok(Json(result))
}
