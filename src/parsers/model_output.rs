// Fence stripping, suggestion parsing, and task payload normalization

use serde_json::Value;

use crate::error::ProviderError;
use crate::models::{OutputRole, RemoteTask, Suggestion, SuggestionList};

/// Strip a surrounding markdown code fence from model output, if present.
///
/// Handles ```json and bare ``` fences. Unfenced input passes through
/// untouched.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse the suggestion-generation response body.
///
/// The payload is expected to be `{ "suggestions": [...] }`, possibly fenced.
/// Confidence scores are clamped into [0, 1] since the upstream is untrusted.
/// An empty list is a contract violation, never a silent empty success.
pub fn parse_suggestion_payload(content: &str) -> Result<Vec<Suggestion>, ProviderError> {
    let stripped = strip_code_fences(content);
    let list: SuggestionList = serde_json::from_str(stripped)
        .map_err(|e| ProviderError::malformed("suggestion payload", e))?;

    if list.suggestions.is_empty() {
        return Err(ProviderError::MalformedResponse(
            "suggestion payload contained no suggestions".to_string(),
        ));
    }

    let suggestions = list
        .suggestions
        .into_iter()
        .map(|mut s| {
            s.confidence_score = s.confidence_score.clamp(0.0, 1.0);
            s
        })
        .collect();
    Ok(suggestions)
}

/// Normalize a task status payload into a single `RemoteTask`.
///
/// The research service is observed to return either the task object itself
/// or an array whose first element is the task object. Both shapes must
/// produce identical behavior downstream.
pub fn normalize_task(payload: Value) -> Result<RemoteTask, ProviderError> {
    let object = match payload {
        Value::Array(mut items) => {
            if items.is_empty() {
                return Err(ProviderError::MalformedResponse(
                    "task status payload was an empty array".to_string(),
                ));
            }
            items.swap_remove(0)
        }
        other => other,
    };

    serde_json::from_value(object).map_err(|e| ProviderError::malformed("task status payload", e))
}

/// Policy for picking the final report out of a completed task transcript.
///
/// The upstream contract for which output message holds the report has been
/// unstable, so the rule is explicit and swappable rather than baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportExtraction {
    /// The last assistant message with non-empty text content. Intermediate
    /// assistant messages may be tool-use commentary; the final one is taken
    /// to be the report.
    LastAssistantMessage,
    /// A fixed index into the output transcript, ignoring roles.
    OutputIndex(usize),
}

impl Default for ReportExtraction {
    fn default() -> Self {
        ReportExtraction::LastAssistantMessage
    }
}

/// Extract the final report text from a completed task, per the given rule.
///
/// Returns `None` when no message satisfies the rule; the caller treats that
/// as a failure ("no analysis was returned"), never as an empty success.
pub fn extract_report_text(task: &RemoteTask, rule: ReportExtraction) -> Option<String> {
    match rule {
        ReportExtraction::LastAssistantMessage => task
            .output
            .iter()
            .filter(|msg| msg.role == OutputRole::Assistant)
            .filter_map(|msg| msg.content.first())
            .filter(|content| content.content_type == "output_text" && !content.text.is_empty())
            .last()
            .map(|content| content.text.clone()),
        ReportExtraction::OutputIndex(idx) => task
            .output
            .get(idx)
            .and_then(|msg| msg.content.first())
            .filter(|content| !content.text.is_empty())
            .map(|content| content.text.clone()),
    }
}
