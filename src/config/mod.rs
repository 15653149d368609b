//! Provider configuration built explicitly at startup.
//!
//! All provider options are read from the environment once, when the server
//! state is constructed. A missing required option fails construction with a
//! `Configuration` error instead of surfacing later inside a request.

use crate::error::ProviderError;

/// Connection options for one provider backend.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    /// Model identifier, for chat-completion backends.
    pub model: Option<String>,
    /// Agent profile identifier, for agent-task backends.
    pub agent_profile: Option<String>,
}

impl ProviderConfig {
    /// Build a config, rejecting empty required options up front.
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
        agent_profile: Option<String>,
    ) -> Result<Self, ProviderError> {
        let base_url = require("base URL", base_url)?;
        let api_key = require("API key", api_key)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            agent_profile,
        })
    }

    /// Model identifier, or a configuration error naming the option.
    pub fn model(&self) -> Result<&str, ProviderError> {
        self.model.as_deref().ok_or_else(|| {
            ProviderError::Configuration("model identifier is not set".to_string())
        })
    }

    /// Agent profile identifier, or a configuration error naming the option.
    pub fn agent_profile(&self) -> Result<&str, ProviderError> {
        self.agent_profile.as_deref().ok_or_else(|| {
            ProviderError::Configuration("agent profile is not set".to_string())
        })
    }
}

fn require(name: &str, value: Option<String>) -> Result<String, ProviderError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ProviderError::Configuration(format!(
            "provider {} is not set",
            name
        ))),
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Chat-completion backend used for suggestions and synchronous analysis.
    pub chat: ProviderConfig,
    /// Agent-task backend used for job-based deep research.
    pub research: ProviderConfig,
    /// Registrar cart base URL for outbound "register" links.
    pub registrar_base: String,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// Recognized variables:
    /// - `DOMAINSCOUT_CHAT_BASE_URL`, `DOMAINSCOUT_CHAT_API_KEY`,
    ///   `DOMAINSCOUT_CHAT_MODEL`
    /// - `DOMAINSCOUT_RESEARCH_BASE_URL`, `DOMAINSCOUT_RESEARCH_API_KEY`,
    ///   `DOMAINSCOUT_RESEARCH_AGENT_PROFILE`
    /// - `DOMAINSCOUT_REGISTRAR_BASE` (optional)
    pub fn from_env() -> Result<Self, ProviderError> {
        let chat = ProviderConfig::new(
            env_opt("DOMAINSCOUT_CHAT_BASE_URL"),
            env_opt("DOMAINSCOUT_CHAT_API_KEY"),
            env_opt("DOMAINSCOUT_CHAT_MODEL").or_else(|| Some("llama2".to_string())),
            None,
        )
        .map_err(|e| ProviderError::Configuration(format!("chat provider: {}", e)))?;

        let research = ProviderConfig::new(
            env_opt("DOMAINSCOUT_RESEARCH_BASE_URL"),
            env_opt("DOMAINSCOUT_RESEARCH_API_KEY"),
            None,
            env_opt("DOMAINSCOUT_RESEARCH_AGENT_PROFILE"),
        )
        .map_err(|e| ProviderError::Configuration(format!("research provider: {}", e)))?;

        let registrar_base = env_opt("DOMAINSCOUT_REGISTRAR_BASE")
            .unwrap_or_else(|| "https://www.namesilo.com/domain/search-domains".to_string());

        Ok(Self {
            chat,
            research,
            registrar_base,
        })
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
