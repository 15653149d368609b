//! Server application state shared across handlers

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ProviderError;
use crate::orchestrator::AnalysisRegistry;
use crate::providers::{
    AgentTaskProvider, AnalysisProvider, ChatCompletionProvider, SuggestionProvider,
};

/// Shared state for the server: the two provider capabilities and the
/// per-view analysis job registry.
#[derive(Clone)]
pub struct ServerAppState {
    /// Suggestion generation capability.
    pub suggestions: Arc<dyn SuggestionProvider>,

    /// Synchronous single-shot analysis capability.
    pub sync_analysis: Arc<dyn AnalysisProvider>,

    /// Job-based analysis orchestration, one live job per view.
    pub analysis_jobs: Arc<AnalysisRegistry>,

    /// Registrar cart base URL for outbound links.
    pub registrar_base: String,
}

impl ServerAppState {
    /// Wire concrete provider adapters from configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, ProviderError> {
        let chat = Arc::new(ChatCompletionProvider::new(config.chat)?);
        let research = Arc::new(AgentTaskProvider::new(config.research)?);

        Ok(Self {
            suggestions: chat.clone(),
            sync_analysis: chat,
            analysis_jobs: Arc::new(AnalysisRegistry::new(research)),
            registrar_base: config.registrar_base,
        })
    }
}
