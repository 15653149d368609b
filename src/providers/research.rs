// Agent-task adapter for the job-based deep research backend

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::models::{ProjectDetails, RemoteTask, Suggestion};
use crate::parsers::normalize_task;
use crate::prompts;
use crate::providers::AnalysisProvider;

/// Default per-request timeout for task API calls. The research job itself is
/// multi-minute scale, but each individual HTTP call should resolve quickly.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct CreateTaskRequest {
    prompt: String,
    #[serde(rename = "agentProfile")]
    agent_profile: String,
    #[serde(rename = "interactiveMode")]
    interactive_mode: bool,
}

#[derive(Debug, Deserialize)]
struct CreateTaskResponse {
    task_id: String,
}

/// Adapter for an agent-task research backend (Manus-style API).
///
/// Task creation returns an opaque handle; the orchestrator polls
/// `fetch_task` until the task reaches a terminal status.
pub struct AgentTaskProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl AgentTaskProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::upstream("build http client", e))?;
        Ok(Self { config, client })
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.config.base_url)
    }
}

#[async_trait]
impl AnalysisProvider for AgentTaskProvider {
    async fn run_analysis(
        &self,
        suggestion: &Suggestion,
        details: &ProjectDetails,
    ) -> Result<String, ProviderError> {
        // This backend is job-based only; the synchronous variant is served
        // by the chat adapter.
        let _ = (suggestion, details);
        Err(ProviderError::Configuration(
            "research backend does not support synchronous analysis".to_string(),
        ))
    }

    async fn create_task(
        &self,
        suggestion: &Suggestion,
        details: &ProjectDetails,
    ) -> Result<String, ProviderError> {
        let agent_profile = self.config.agent_profile()?.to_string();
        let request = CreateTaskRequest {
            prompt: prompts::research_prompt(suggestion, details),
            agent_profile,
            interactive_mode: false,
        };

        log::info!(
            "Starting research task for '{}'",
            suggestion.domain_name
        );

        let response = self
            .client
            .post(self.tasks_url())
            .header("API_KEY", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::upstream("create task", e))?;

        if !response.status().is_success() {
            let status = response.status();
            // Error bodies are JSON with a `message` field when well-formed
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("status {}", status));
            log::warn!("Task creation failed: {}", message);
            return Err(ProviderError::Upstream(format!(
                "task creation failed: {}",
                message
            )));
        }

        let created: CreateTaskResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed("task creation response", e))?;
        Ok(created.task_id)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<RemoteTask, ProviderError> {
        let url = format!("{}/{}", self.tasks_url(), task_id);
        let response = self
            .client
            .get(&url)
            .header("API_KEY", &self.config.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::upstream("fetch task status", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::warn!("Task status fetch failed ({}): {}", status, body);
            return Err(ProviderError::Upstream(format!(
                "task status fetch failed with status {}",
                status
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed("task status response", e))?;
        normalize_task(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_wire_names() {
        let request = CreateTaskRequest {
            prompt: "analyze".to_string(),
            agent_profile: "researcher-1".to_string(),
            interactive_mode: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["agentProfile"], "researcher-1");
        assert_eq!(value["interactiveMode"], false);
    }

    #[test]
    fn test_tasks_url_joins_without_double_slash() {
        let provider = AgentTaskProvider::new(
            ProviderConfig::new(
                Some("https://research.example.com/v1/".to_string()),
                Some("key".to_string()),
                None,
                Some("researcher-1".to_string()),
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(provider.tasks_url(), "https://research.example.com/v1/tasks");
    }
}
