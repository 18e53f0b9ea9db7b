pub mod health;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::analysis;
use crate::auth;
use crate::auth::middleware::{auth_gate, require_auth};
use crate::github;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Auth on /analyze is a deployment flag; the GitHub proxy always
    // requires a verified principal.
    let analyze_routes = Router::new()
        .route("/analyze", post(analysis::handlers::handle_analyze))
        .route("/api/analyze", post(analysis::handlers::handle_analyze))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate));

    let github_routes = Router::new()
        .route(
            "/github/repos/:username",
            get(github::handlers::handle_list_repos),
        )
        .route("/github/user-repos", get(github::handlers::handle_user_repos))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        .route("/auth/verify", post(auth::handlers::handle_verify))
        .merge(analyze_routes)
        .merge(github_routes)
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "available_endpoints": [
                "/",
                "/analyze",
                "/auth/verify",
                "/github/repos/{username}",
                "/github/user-repos"
            ]
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Principal, TokenVerifier, VerifyError};
    use crate::completion::{CompletionError, CompletionProvider};
    use crate::config::Config;
    use crate::github::GithubClient;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct ScriptedProvider {
        output: String,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn returning(output: &str) -> Arc<Self> {
            Arc::new(Self {
                output: output.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    /// Verifier double accepting exactly one token.
    struct StaticVerifier;

    const GOOD_TOKEN: &str = "good-token";

    impl TokenVerifier for StaticVerifier {
        fn verify(&self, token: &str) -> Result<Principal, VerifyError> {
            if token == GOOD_TOKEN {
                Ok(Principal {
                    subject_id: "U123".to_string(),
                    email: Some("dev@example.com".to_string()),
                    name: Some("Dev User".to_string()),
                })
            } else {
                Err(VerifyError::InvalidToken)
            }
        }
    }

    fn test_config(require_auth: bool) -> Config {
        Config {
            openai_api_key: None,
            descope_project_id: Some("P2abc".to_string()),
            descope_management_key: None,
            require_auth,
            demo_token: None,
            port: 0,
            environment: "development".to_string(),
            allowed_origins: Vec::new(),
            rust_log: "info".to_string(),
        }
    }

    fn test_app(provider: Option<Arc<ScriptedProvider>>, require_auth: bool) -> Router {
        let state = AppState {
            completions: provider.map(|p| p as Arc<dyn CompletionProvider>),
            verifier: Arc::new(StaticVerifier),
            github: GithubClient::new(),
            outbound: None,
            config: test_config(require_auth),
        };
        build_router(state)
    }

    fn post_json(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const VALID_OUTPUT: &str =
        r#"{"summary": "ok", "top_suggestions": ["a", "b", "c"], "score": 80}"#;

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let app = test_app(Some(ScriptedProvider::returning(VALID_OUTPUT)), false);
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "Server is running");
        assert_eq!(body["auth_configured"], true);
        assert_eq!(body["openai_configured"], true);
    }

    #[tokio::test]
    async fn test_analyze_empty_goal_is_400_without_provider_call() {
        let provider = ScriptedProvider::returning(VALID_OUTPUT);
        let app = test_app(Some(provider.clone()), false);

        let response = app
            .oneshot(post_json("/analyze", r#"{"career_goal": "  "}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        let body = body_json(response).await;
        assert_eq!(body["error"], "career_goal is required");
    }

    #[tokio::test]
    async fn test_analyze_success_returns_provider_result() {
        let app = test_app(Some(ScriptedProvider::returning(VALID_OUTPUT)), false);

        let response = app
            .oneshot(post_json(
                "/api/analyze",
                r#"{"career_goal": "Backend Engineer", "linkedin_skills": ["Python", "SQL"], "github_repos": []}"#,
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["top_suggestions"].as_array().unwrap().len(), 3);
        assert_eq!(body["score"], 80);
    }

    #[tokio::test]
    async fn test_analyze_attaches_user_from_token() {
        let app = test_app(Some(ScriptedProvider::returning(VALID_OUTPUT)), false);

        let response = app
            .oneshot(post_json(
                "/analyze",
                r#"{"career_goal": "Backend Engineer"}"#,
                Some(GOOD_TOKEN),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user"], "dev@example.com");
    }

    #[tokio::test]
    async fn test_analyze_non_json_output_echoes_raw() {
        let raw = "I'd be happy to help with that!";
        let app = test_app(Some(ScriptedProvider::returning(raw)), false);

        let response = app
            .oneshot(post_json("/analyze", r#"{"career_goal": "SRE"}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["raw"], raw);
    }

    #[tokio::test]
    async fn test_analyze_without_provider_is_500() {
        let app = test_app(None, false);

        let response = app
            .oneshot(post_json("/analyze", r#"{"career_goal": "SRE"}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Completion provider is not configured");
    }

    #[tokio::test]
    async fn test_analyze_auth_required_rejects_anonymous() {
        let provider = ScriptedProvider::returning(VALID_OUTPUT);
        let app = test_app(Some(provider.clone()), true);

        let response = app
            .oneshot(post_json("/analyze", r#"{"career_goal": "SRE"}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_auth_required_accepts_valid_token() {
        let app = test_app(Some(ScriptedProvider::returning(VALID_OUTPUT)), true);

        let response = app
            .oneshot(post_json(
                "/analyze",
                r#"{"career_goal": "SRE"}"#,
                Some(GOOD_TOKEN),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_verify_without_header_is_401() {
        let app = test_app(None, false);

        let response = app
            .oneshot(post_json("/auth/verify", "", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn test_verify_with_valid_token_echoes_identity() {
        let app = test_app(None, false);

        let response = app
            .oneshot(post_json("/auth/verify", "", Some(GOOD_TOKEN)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["user"]["id"], "U123");
        assert_eq!(body["user"]["name"], "Dev User");
    }

    #[tokio::test]
    async fn test_github_routes_require_bearer_token() {
        let app = test_app(None, false);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/github/user-repos")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let app = test_app(None, false);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Endpoint not found");
        assert!(body["available_endpoints"].is_array());
    }
}
