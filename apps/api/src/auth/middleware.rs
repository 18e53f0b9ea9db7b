//! Auth as an explicit pipeline stage: middleware consumes the request,
//! produces a `Principal` in the request extensions or a 401, independent of
//! route registration.

use axum::{extract::Request, extract::State, middleware::Next, response::Response};

use crate::auth::bearer_token;
use crate::errors::AppError;
use crate::state::AppState;

/// Rejects the request unless it carries a bearer token the verifier accepts.
/// On success the `Principal` is inserted into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let principal = state.verifier.verify(token)?;

    tracing::debug!(subject = %principal.subject_id, "request authenticated");
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Auth gate for routes whose auth requirement is a deployment flag.
///
/// A valid token always attaches a `Principal`. When `require_auth` is off,
/// missing or invalid credentials are ignored and the request proceeds
/// anonymously; when it is on they are a 401.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verified = bearer_token(request.headers())
        .and_then(|token| state.verifier.verify(token));

    match verified {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
        }
        Err(e) if state.config.require_auth => return Err(e.into()),
        Err(_) => {}
    }

    Ok(next.run(request).await)
}
