use std::sync::Arc;

use crate::auth::outbound::OutboundTokens;
use crate::auth::TokenVerifier;
use crate::completion::CompletionProvider;
use crate::config::Config;
use crate::github::GithubClient;

/// Shared application state injected into all route handlers via Axum
/// extractors. Everything here is stateless and safely reusable across
/// concurrent requests.
#[derive(Clone)]
pub struct AppState {
    /// Completion provider, absent when no API key is configured.
    /// Trait object so tests can inject a scripted double.
    pub completions: Option<Arc<dyn CompletionProvider>>,
    /// Bearer-token verifier. Trait object for the same reason.
    pub verifier: Arc<dyn TokenVerifier>,
    pub github: GithubClient,
    /// Descope outbound-token client; present only with a management key.
    pub outbound: Option<OutboundTokens>,
    pub config: Config,
}
