use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / and GET /api/health
/// Reports liveness plus which downstream integrations are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "Server is running",
        "endpoints": ["/analyze", "/auth/verify", "/github/repos/{username}", "/github/user-repos"],
        "auth_configured": state.config.descope_project_id.is_some(),
        "openai_configured": state.completions.is_some(),
    }))
}
