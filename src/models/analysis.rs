// Analysis job record and remote task wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local state of an analysis job as tracked by the orchestrator.
///
/// `last_remote_status` on the snapshot carries the raw remote status string
/// for progress display; it is never authoritative over this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    NotStarted,
    Starting,
    Polling,
    Completed,
    Failed,
    Cancelled,
}

impl AnalysisState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisState::NotStarted => "not_started",
            AnalysisState::Starting => "starting",
            AnalysisState::Polling => "polling",
            AnalysisState::Completed => "completed",
            AnalysisState::Failed => "failed",
            AnalysisState::Cancelled => "cancelled",
        }
    }

    /// Terminal states admit no further transitions and no further polls.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisState::Completed | AnalysisState::Failed | AnalysisState::Cancelled
        )
    }
}

impl Default for AnalysisState {
    fn default() -> Self {
        AnalysisState::NotStarted
    }
}

impl std::fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status reported by the remote research service for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteTaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RemoteTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteTaskStatus::Pending => "pending",
            RemoteTaskStatus::Running => "running",
            RemoteTaskStatus::Completed => "completed",
            RemoteTaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RemoteTaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Author of an output message in a completed task payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputRole {
    User,
    Assistant,
}

/// One content item inside an output message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub text: String,
}

/// One message in the remote task's output transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputMessage {
    pub role: OutputRole,
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

/// Normalized remote task record.
///
/// The wire payload arrives either as a single task object or as an array
/// whose first element is the task object; `parsers::normalize_task` folds
/// both shapes into this record before the orchestrator inspects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTask {
    #[serde(default)]
    pub id: String,
    pub status: RemoteTaskStatus,
    #[serde(default)]
    pub output: Vec<OutputMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Immutable snapshot of an analysis job handed to presentation and routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisJobSnapshot {
    /// Local record id, distinct from the remote task handle.
    pub id: String,
    /// The suggestion this analysis is about.
    pub domain_name: String,
    /// Opaque handle issued by the remote service, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub state: AnalysisState,
    /// Last raw status observed from the remote service; display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_remote_status: Option<RemoteTaskStatus>,
    /// Final report text; present iff `state` is `Completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Failure reason; present iff `state` is `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisJobSnapshot {
    /// A snapshot representing "no job has ever been started for this view".
    pub fn not_started() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            domain_name: String::new(),
            job_id: None,
            state: AnalysisState::NotStarted,
            last_remote_status: None,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}
