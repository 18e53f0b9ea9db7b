//! Axum route handler for token verification.

use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::auth::bearer_token;
use crate::state::AppState;

/// POST /auth/verify
///
/// Verifies the bearer token and echoes the decoded identity. Unlike other
/// routes this reports failure in-band as `{valid: false, error}` with a 401
/// rather than through the shared error body.
pub async fn handle_verify(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let verified = bearer_token(&headers).and_then(|token| state.verifier.verify(token));

    match verified {
        Ok(principal) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "user": {
                    "id": principal.subject_id,
                    "email": principal.email,
                    "name": principal.name,
                }
            })),
        ),
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "valid": false, "error": e.to_string() })),
        ),
    }
}
