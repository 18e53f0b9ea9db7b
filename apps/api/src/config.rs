use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Every downstream credential is optional: the service starts without them
/// and the affected routes fail per-request instead (the health endpoint
/// reports which integrations are live). Feature flags collapse the
/// historical deployment variants into one binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion provider credential. Absent ⇒ `/analyze` returns 500.
    pub openai_api_key: Option<String>,
    /// Descope project id; expected token issuer is
    /// `https://api.descope.com/{project_id}`.
    pub descope_project_id: Option<String>,
    /// Descope management key. Presence enables `/github/user-repos`.
    pub descope_management_key: Option<String>,
    /// Gate `/analyze` behind bearer auth.
    pub require_auth: bool,
    /// Fixed opaque token accepted as a demo principal, bypassing the verifier.
    pub demo_token: Option<String>,
    pub port: u16,
    /// `production` restricts CORS to `allowed_origins`.
    pub environment: String,
    pub allowed_origins: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            descope_project_id: optional_env("DESCOPE_PROJECT_ID"),
            descope_management_key: optional_env("DESCOPE_MANAGEMENT_KEY"),
            require_auth: flag_env("REQUIRE_AUTH"),
            demo_token: optional_env("DEMO_TOKEN"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            allowed_origins: optional_env("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Returns the variable's value, treating unset and empty as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn flag_env(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    )
}
