mod analysis;
mod auth;
mod completion;
mod config;
mod errors;
mod github;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::outbound::OutboundTokens;
use crate::auth::DescopeVerifier;
use crate::completion::{CompletionProvider, OpenAiClient};
use crate::config::Config;
use crate::github::GithubClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skill Navigator API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the completion provider
    let completions: Option<Arc<dyn CompletionProvider>> = match &config.openai_api_key {
        Some(key) => {
            info!("completion provider configured (model: {})", completion::MODEL);
            Some(Arc::new(OpenAiClient::new(key.clone())))
        }
        None => {
            warn!("OPENAI_API_KEY not set — /analyze will fail until configured");
            None
        }
    };

    // Initialize the token verifier
    match &config.descope_project_id {
        Some(project_id) => info!("auth configured for project {project_id}"),
        None => warn!("DESCOPE_PROJECT_ID not set — token verification will reject everything"),
    }
    let verifier = Arc::new(DescopeVerifier::new(
        config.descope_project_id.clone(),
        config.demo_token.clone(),
    ));

    // Initialize the Descope outbound-token client (needs both credentials)
    let outbound = match (&config.descope_project_id, &config.descope_management_key) {
        (Some(project_id), Some(management_key)) => {
            info!("outbound GitHub tokens enabled");
            Some(OutboundTokens::new(
                project_id.clone(),
                management_key.clone(),
            ))
        }
        _ => None,
    };

    let state = AppState {
        completions,
        verifier,
        github: GithubClient::new(),
        outbound,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive CORS in development; restricted to the configured origins in
/// production.
fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.is_production() {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    }
}
