//! Task polling orchestrator for asynchronous analysis jobs.
//!
//! Owns the state machine `NotStarted -> Starting -> Polling -> {Completed |
//! Failed}`, with `Cancelled` reachable from any active state. Polls are
//! strictly sequential (one in-flight status fetch per job), cancellation is
//! cooperative, and stale responses are discarded by a generation check
//! before any state mutation.

mod registry;

pub use registry::AnalysisRegistry;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::{
    AnalysisJobSnapshot, AnalysisState, ProjectDetails, RemoteTaskStatus, Suggestion,
};
use crate::parsers::{extract_report_text, ReportExtraction};
use crate::providers::AnalysisProvider;

/// Fixed polling cadence. The remote job is multi-minute scale, so constant
/// cheap polling is used instead of backoff.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Fallback message when the remote task fails without an error field.
const GENERIC_TASK_FAILURE: &str = "The research task failed without a specific error message.";

/// Message for a completed task with no extractable report.
const NO_ANALYSIS_RETURNED: &str = "No analysis was returned by the research task.";

struct Inner {
    /// Identity token for the current job. Bumped on every start/cancel;
    /// a poll continuation whose generation no longer matches discards
    /// itself without touching the job record.
    generation: u64,
    job: AnalysisJobSnapshot,
    poll_task: Option<JoinHandle<()>>,
}

/// Drives one live analysis job at a time for a single view.
///
/// Calling `start` while a job is active cancels the existing job before
/// creating the new one, so two polling loops never race on the same record.
pub struct AnalysisOrchestrator {
    provider: Arc<dyn AnalysisProvider>,
    poll_interval: Duration,
    extraction: ReportExtraction,
    inner: Arc<Mutex<Inner>>,
}

impl AnalysisOrchestrator {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self::with_options(provider, DEFAULT_POLL_INTERVAL, ReportExtraction::default())
    }

    pub fn with_options(
        provider: Arc<dyn AnalysisProvider>,
        poll_interval: Duration,
        extraction: ReportExtraction,
    ) -> Self {
        Self {
            provider,
            poll_interval,
            extraction,
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                job: AnalysisJobSnapshot::not_started(),
                poll_task: None,
            })),
        }
    }

    /// Start a new analysis job, superseding any live one.
    ///
    /// The previous job's scheduled tick is retired before any request for
    /// the new job is issued. Returns the initial snapshot.
    pub fn start(&self, suggestion: Suggestion, details: ProjectDetails) -> AnalysisJobSnapshot {
        let generation;
        let snapshot;
        {
            let mut inner = lock_inner(&self.inner);
            retire_current(&mut inner);

            inner.generation += 1;
            generation = inner.generation;

            let now = Utc::now();
            inner.job = AnalysisJobSnapshot {
                id: Uuid::new_v4().to_string(),
                domain_name: suggestion.domain_name.clone(),
                job_id: None,
                state: AnalysisState::Starting,
                last_remote_status: None,
                result: None,
                error: None,
                created_at: now,
                updated_at: now,
            };
            snapshot = inner.job.clone();
        }

        log::info!(
            "Starting analysis job {} for '{}'",
            snapshot.id,
            snapshot.domain_name
        );

        let handle = tokio::spawn(drive_job(
            self.provider.clone(),
            self.inner.clone(),
            generation,
            self.poll_interval,
            self.extraction,
            suggestion,
            details,
        ));

        let mut inner = lock_inner(&self.inner);
        // Only attach the handle if this start has not itself been superseded
        if inner.generation == generation {
            inner.poll_task = Some(handle);
        } else {
            handle.abort();
        }
        snapshot
    }

    /// Cancel the live job, if any. Idempotent; terminal jobs are untouched.
    pub fn cancel(&self) {
        let mut inner = lock_inner(&self.inner);
        retire_current(&mut inner);
        // Invalidate any in-flight continuation
        inner.generation += 1;
    }

    /// Current job snapshot for presentation.
    pub fn snapshot(&self) -> AnalysisJobSnapshot {
        lock_inner(&self.inner).job.clone()
    }
}

impl Drop for AnalysisOrchestrator {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(handle) = inner.poll_task.take() {
                handle.abort();
            }
        }
    }
}

/// Stop the scheduled tick and mark an active job cancelled.
fn retire_current(inner: &mut Inner) {
    if let Some(handle) = inner.poll_task.take() {
        handle.abort();
    }
    if !inner.job.state.is_terminal() && inner.job.state != AnalysisState::NotStarted {
        log::info!("Cancelling analysis job {}", inner.job.id);
        inner.job.state = AnalysisState::Cancelled;
        inner.job.updated_at = Utc::now();
    }
}

/// A poisoned lock only means a poll task panicked mid-update; the job record
/// is still usable.
fn lock_inner(inner: &Arc<Mutex<Inner>>) -> MutexGuard<'_, Inner> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Mutate the job record iff this continuation still owns the current
/// generation. Returns false when the response is stale and was discarded.
fn apply<F>(inner: &Arc<Mutex<Inner>>, generation: u64, mutate: F) -> bool
where
    F: FnOnce(&mut AnalysisJobSnapshot),
{
    let mut guard = lock_inner(inner);
    if guard.generation != generation {
        log::debug!("Discarding stale response for superseded job");
        return false;
    }
    mutate(&mut guard.job);
    guard.job.updated_at = Utc::now();
    true
}

/// Whether this continuation still owns the current generation.
fn is_current(inner: &Arc<Mutex<Inner>>, generation: u64) -> bool {
    lock_inner(inner).generation == generation
}

/// Submit the job and poll it to a terminal state.
///
/// Runs as one spawned task per job; ticks are strictly sequential because
/// the next fetch is only issued after the previous one resolves and the
/// interval sleep completes.
async fn drive_job(
    provider: Arc<dyn AnalysisProvider>,
    inner: Arc<Mutex<Inner>>,
    generation: u64,
    poll_interval: Duration,
    extraction: ReportExtraction,
    suggestion: Suggestion,
    details: ProjectDetails,
) {
    let task_id = match provider.create_task(&suggestion, &details).await {
        Ok(task_id) => task_id,
        Err(e) => {
            apply(&inner, generation, |job| {
                job.state = AnalysisState::Failed;
                job.error = Some(e.to_string());
            });
            return;
        }
    };

    let moved_on = !apply(&inner, generation, |job| {
        job.job_id = Some(task_id.clone());
        job.state = AnalysisState::Polling;
    });
    if moved_on {
        return;
    }

    // First poll immediately; subsequent polls wait the fixed interval.
    loop {
        let task = match provider.fetch_task(&task_id).await {
            Ok(task) => task,
            Err(e) => {
                apply(&inner, generation, |job| {
                    job.state = AnalysisState::Failed;
                    job.error = Some(e.to_string());
                });
                return;
            }
        };

        match task.status {
            RemoteTaskStatus::Pending | RemoteTaskStatus::Running => {
                if !apply(&inner, generation, |job| {
                    job.last_remote_status = Some(task.status);
                }) {
                    return;
                }
            }
            RemoteTaskStatus::Failed => {
                apply(&inner, generation, |job| {
                    job.last_remote_status = Some(task.status);
                    job.state = AnalysisState::Failed;
                    job.error = Some(
                        task.error
                            .clone()
                            .unwrap_or_else(|| GENERIC_TASK_FAILURE.to_string()),
                    );
                });
                return;
            }
            RemoteTaskStatus::Completed => {
                // A completed status with no extractable content is a
                // failure, not a silent success.
                let report = extract_report_text(&task, extraction);
                apply(&inner, generation, |job| {
                    job.last_remote_status = Some(task.status);
                    match report {
                        Some(text) => {
                            job.state = AnalysisState::Completed;
                            job.result = Some(text);
                        }
                        None => {
                            job.state = AnalysisState::Failed;
                            job.error = Some(NO_ANALYSIS_RETURNED.to_string());
                        }
                    }
                });
                return;
            }
        }

        tokio::time::sleep(poll_interval).await;
        if !is_current(&inner, generation) {
            return;
        }
    }
}
