// Error taxonomy for provider calls and analysis jobs

use thiserror::Error;

/// Errors produced at the provider/orchestrator boundary.
///
/// Raw transport errors from reqwest are converted into one of these kinds
/// before they reach presentation; handlers never see a `reqwest::Error`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Required provider configuration is missing. Raised at construction
    /// time, before any network call.
    #[error("provider configuration error: {0}")]
    Configuration(String),

    /// Transport or HTTP-level failure talking to a provider.
    #[error("provider request failed: {0}")]
    Upstream(String),

    /// The provider returned content that could not be parsed into the
    /// expected shape, even after fence stripping.
    #[error("invalid provider response: {0}")]
    MalformedResponse(String),

    /// The remote research task explicitly reported failure.
    #[error("research task failed: {0}")]
    TaskFailed(String),

    /// The remote task reported success but produced no extractable content.
    #[error("no analysis was returned")]
    EmptyResult,
}

impl ProviderError {
    /// Wrap a transport error with request context.
    pub fn upstream(context: &str, err: impl std::fmt::Display) -> Self {
        ProviderError::Upstream(format!("{}: {}", context, err))
    }

    /// Wrap a parse failure with request context.
    pub fn malformed(context: &str, err: impl std::fmt::Display) -> Self {
        ProviderError::MalformedResponse(format!("{}: {}", context, err))
    }
}

/// Validation failure for user-submitted project details.
#[derive(Debug, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_context_is_preserved() {
        let err = ProviderError::upstream("create task", "connection refused");
        assert_eq!(
            err.to_string(),
            "provider request failed: create task: connection refused"
        );
    }

    #[test]
    fn test_empty_result_message() {
        assert_eq!(
            ProviderError::EmptyResult.to_string(),
            "no analysis was returned"
        );
    }
}
