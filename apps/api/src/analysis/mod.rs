//! Career-analysis pipeline: validate → truncate → prompt → one completion
//! call → parse the output as JSON → attach caller identity.

pub mod handlers;
pub mod prompts;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::Principal;
use crate::completion::CompletionProvider;
use crate::errors::AppError;

/// Prefix length for the skills and repositories lists. Longer lists are
/// silently truncated before prompt construction to bound prompt size.
pub const MAX_LIST_ITEMS: usize = 10;

/// Inbound body for `/analyze`. All fields beyond the goal are optional.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub career_goal: String,
    #[serde(default)]
    pub github_repos: Vec<String>,
    #[serde(default)]
    pub linkedin_skills: Vec<String>,
}

/// Builds the analysis prompt from the goal and the truncated lists.
pub fn build_prompt(career_goal: &str, skills: &[String], repos: &[String]) -> String {
    let skills = &skills[..skills.len().min(MAX_LIST_ITEMS)];
    let repos = &repos[..repos.len().min(MAX_LIST_ITEMS)];

    prompts::ANALYZE_PROMPT_TEMPLATE
        .replace("{career_goal}", career_goal)
        .replace("{skills}", &skills.join(", "))
        .replace("{repos}", &repos.join(", "))
}

/// Runs the analysis pipeline. Issues exactly one provider call per
/// invocation; validation failures short-circuit before the call.
///
/// The provider's output is trusted as-is once it parses as JSON. If a
/// principal is present its email is attached under `user` without
/// overwriting anything the provider returned.
pub async fn analyze(
    provider: &dyn CompletionProvider,
    request: AnalyzeRequest,
    principal: Option<&Principal>,
) -> Result<Value, AppError> {
    let career_goal = request.career_goal.trim();
    if career_goal.is_empty() {
        return Err(AppError::InvalidInput("career_goal is required".to_string()));
    }

    let prompt = build_prompt(career_goal, &request.linkedin_skills, &request.github_repos);
    debug!("sending analysis prompt ({} chars)", prompt.len());

    let raw = provider
        .complete(&prompt)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let mut result: Value =
        serde_json::from_str(raw.trim()).map_err(|_| AppError::ProviderFormat { raw })?;

    if let Some(principal) = principal {
        if let (Some(object), Some(email)) = (result.as_object_mut(), &principal.email) {
            // never clobber a provider-returned field
            object
                .entry("user")
                .or_insert_with(|| Value::String(email.clone()));
        }
    }

    info!("career analysis completed");
    Ok(result)
}
