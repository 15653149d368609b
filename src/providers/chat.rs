// Chat-completion adapter (Ollama-compatible API)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::models::{ProjectDetails, Suggestion};
use crate::parsers::{parse_suggestion_payload, strip_code_fences};
use crate::prompts;
use crate::models::RemoteTask;
use crate::providers::{AnalysisProvider, SuggestionProvider};

/// Default per-request timeout for chat calls.
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

/// Adapter for an Ollama-compatible chat-completion backend.
///
/// Covers the suggestion capability and the synchronous analysis variant;
/// job-based research goes through the agent-task adapter instead.
pub struct ChatCompletionProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl ChatCompletionProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::upstream("build http client", e))?;
        Ok(Self { config, client })
    }

    /// Issue one chat call and return the raw assistant content.
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        json_mode: bool,
    ) -> Result<String, ProviderError> {
        let model = self.config.model()?.to_string();
        let url = format!("{}/api/chat", self.config.base_url);

        let request = ChatRequest {
            model,
            messages,
            stream: false,
            format: json_mode.then_some("json"),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::upstream("chat request", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::warn!("Chat API error ({}): {}", status, body);
            return Err(ProviderError::Upstream(format!(
                "chat request failed with status {}",
                status
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed("chat response", e))?;

        let content = parsed.message.map(|m| m.content).unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ProviderError::MalformedResponse(
                "no content returned from the model".to_string(),
            ));
        }
        Ok(content)
    }

    /// Synchronous analysis: one chat call returning markdown report text.
    async fn analyze(
        &self,
        suggestion: &Suggestion,
        details: &ProjectDetails,
    ) -> Result<String, ProviderError> {
        let messages = vec![ChatMessage {
            role: "user",
            content: prompts::sync_analysis_prompt(suggestion, details),
        }];
        let content = self.chat(messages, false).await?;
        Ok(strip_code_fences(&content).to_string())
    }
}

#[async_trait]
impl SuggestionProvider for ChatCompletionProvider {
    async fn generate_suggestions(
        &self,
        details: &ProjectDetails,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        log::info!("Generating suggestions for '{}'", details.project_name);
        let messages = vec![
            ChatMessage {
                role: "system",
                content: prompts::suggestion_system_prompt(),
            },
            ChatMessage {
                role: "user",
                content: prompts::suggestion_user_prompt(details),
            },
        ];
        let content = self.chat(messages, true).await?;
        parse_suggestion_payload(&content)
    }
}

#[async_trait]
impl AnalysisProvider for ChatCompletionProvider {
    async fn run_analysis(
        &self,
        suggestion: &Suggestion,
        details: &ProjectDetails,
    ) -> Result<String, ProviderError> {
        log::info!("Running synchronous analysis for '{}'", suggestion.domain_name);
        self.analyze(suggestion, details).await
    }

    async fn create_task(
        &self,
        _suggestion: &Suggestion,
        _details: &ProjectDetails,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Configuration(
            "chat backend does not support job-based analysis".to_string(),
        ))
    }

    async fn fetch_task(&self, _task_id: &str) -> Result<RemoteTask, ProviderError> {
        Err(ProviderError::Configuration(
            "chat backend does not support job-based analysis".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig::new(
            Some("https://chat.example.com".to_string()),
            Some("key".to_string()),
            Some("llama2".to_string()),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_json_mode_serializes_format_field() {
        let request = ChatRequest {
            model: "llama2".to_string(),
            messages: vec![],
            stream: false,
            format: Some("json"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["format"], "json");

        let request = ChatRequest {
            model: "llama2".to_string(),
            messages: vec![],
            stream: false,
            format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("format").is_none());
    }

    #[test]
    fn test_provider_construction() {
        assert!(ChatCompletionProvider::new(config()).is_ok());
    }
}
