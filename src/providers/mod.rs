//! Provider capability traits and concrete adapters.
//!
//! The core is written against two narrow capabilities, independent of which
//! concrete backend is configured: generating domain suggestions, and running
//! a market analysis (single-shot or job-based). One adapter exists per
//! concrete backend; selection is a configuration concern.

mod chat;
mod research;

pub use chat::ChatCompletionProvider;
pub use research::AgentTaskProvider;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{ProjectDetails, RemoteTask, Suggestion};

/// Capability: generate a finite list of domain suggestions.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Single blocking request/response, no retry built in. Returns 3-5
    /// suggestions or one of the defined error kinds; never an empty list.
    async fn generate_suggestions(
        &self,
        details: &ProjectDetails,
    ) -> Result<Vec<Suggestion>, ProviderError>;
}

/// Capability: run a market analysis for one suggestion.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Synchronous mode: one call, final report text. Atomic success/failure.
    async fn run_analysis(
        &self,
        suggestion: &Suggestion,
        details: &ProjectDetails,
    ) -> Result<String, ProviderError>;

    /// Job-based mode, step 1: create a remote research task and return its
    /// opaque handle.
    async fn create_task(
        &self,
        suggestion: &Suggestion,
        details: &ProjectDetails,
    ) -> Result<String, ProviderError>;

    /// Job-based mode, step 2: fetch the current task record by handle,
    /// normalized from either tolerated wire shape.
    async fn fetch_task(&self, task_id: &str) -> Result<RemoteTask, ProviderError>;
}
