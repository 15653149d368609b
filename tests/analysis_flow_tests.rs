// End-to-end analysis flow tests: scripted provider through orchestrator,
// registry, and presentation adapter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use domainscout::error::ProviderError;
use domainscout::models::{
    AnalysisJobSnapshot, AnalysisState, OutputContent, OutputMessage, OutputRole, ProjectDetails,
    RemoteTask, RemoteTaskStatus, Suggestion, UserType,
};
use domainscout::orchestrator::{AnalysisOrchestrator, AnalysisRegistry};
use domainscout::providers::AnalysisProvider;
use domainscout::render::{render, DisplayModel};

fn suggestion(domain: &str) -> Suggestion {
    Suggestion {
        domain_name: domain.to_string(),
        confidence_score: 0.85,
        explanation: "memorable and on-niche".to_string(),
    }
}

fn details() -> ProjectDetails {
    ProjectDetails {
        user_type: UserType::Business,
        project_name: "Fernweh Travel".to_string(),
        business_niche: "boutique travel planning".to_string(),
        target_audience: "young professionals".to_string(),
        keywords: "wander, journey, escape".to_string(),
        preferred_tlds: ".com, .travel".to_string(),
    }
}

fn status_only(status: RemoteTaskStatus) -> RemoteTask {
    RemoteTask {
        id: "task-1".to_string(),
        status,
        output: vec![],
        error: None,
    }
}

fn completed_with(text: &str) -> RemoteTask {
    RemoteTask {
        id: "task-1".to_string(),
        status: RemoteTaskStatus::Completed,
        output: vec![
            OutputMessage {
                role: OutputRole::User,
                content: vec![OutputContent {
                    content_type: "output_text".to_string(),
                    text: "run the research".to_string(),
                }],
            },
            OutputMessage {
                role: OutputRole::Assistant,
                content: vec![OutputContent {
                    content_type: "output_text".to_string(),
                    text: text.to_string(),
                }],
            },
        ],
        error: None,
    }
}

/// Provider scripted with a queue of status-fetch outcomes. Records the
/// virtual time of each fetch for cadence assertions.
struct ScriptedProvider {
    outcomes: Mutex<Vec<Result<RemoteTask, String>>>,
    fetch_times: Mutex<Vec<tokio::time::Instant>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetch_delay: Duration,
}

impl ScriptedProvider {
    fn new(outcomes: Vec<Result<RemoteTask, String>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            fetch_times: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            fetch_delay: Duration::ZERO,
        }
    }

    fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    async fn fetch_count(&self) -> usize {
        self.fetch_times.lock().await.len()
    }
}

#[async_trait]
impl AnalysisProvider for ScriptedProvider {
    async fn run_analysis(
        &self,
        _suggestion: &Suggestion,
        _details: &ProjectDetails,
    ) -> Result<String, ProviderError> {
        unimplemented!("job-based flow only")
    }

    async fn create_task(
        &self,
        _suggestion: &Suggestion,
        _details: &ProjectDetails,
    ) -> Result<String, ProviderError> {
        Ok("task-1".to_string())
    }

    async fn fetch_task(&self, _task_id: &str) -> Result<RemoteTask, ProviderError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.fetch_times.lock().await.push(tokio::time::Instant::now());

        if self.fetch_delay > Duration::ZERO {
            tokio::time::sleep(self.fetch_delay).await;
        }

        let outcome = {
            let mut outcomes = self.outcomes.lock().await;
            if outcomes.is_empty() {
                Ok(status_only(RemoteTaskStatus::Running))
            } else {
                outcomes.remove(0)
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome.map_err(ProviderError::Upstream)
    }
}

async fn wait_for_terminal(orchestrator: &AnalysisOrchestrator) -> AnalysisJobSnapshot {
    for _ in 0..600 {
        let snapshot = orchestrator.snapshot();
        if snapshot.state.is_terminal() {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("job never reached a terminal state");
}

// Scenario A: pending -> running -> completed, final display is the report.
#[tokio::test(start_paused = true)]
async fn scenario_a_completed_research_renders_report() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(status_only(RemoteTaskStatus::Pending)),
        Ok(status_only(RemoteTaskStatus::Running)),
        Ok(completed_with("**Verdict:** Highly Recommended")),
    ]));
    let orchestrator = AnalysisOrchestrator::new(provider.clone());
    orchestrator.start(suggestion("fernweh.travel"), details());

    let snapshot = wait_for_terminal(&orchestrator).await;
    assert_eq!(snapshot.state, AnalysisState::Completed);

    match render(&snapshot) {
        DisplayModel::Report { html } => {
            assert!(html.contains("Highly Recommended"));
            assert!(html.contains("<strong>Verdict:</strong>"));
        }
        other => panic!("expected report, got {:?}", other),
    }
    assert_eq!(provider.fetch_count().await, 3);
}

// Scenario B: status fetch throws -> failed, no further polling.
#[tokio::test(start_paused = true)]
async fn scenario_b_fetch_error_is_terminal() {
    let provider = Arc::new(ScriptedProvider::new(vec![Err(
        "connection reset by peer".to_string()
    )]));
    let orchestrator = AnalysisOrchestrator::new(provider.clone());
    orchestrator.start(suggestion("fernweh.travel"), details());

    let snapshot = wait_for_terminal(&orchestrator).await;
    assert_eq!(snapshot.state, AnalysisState::Failed);
    let error = snapshot.error.clone().expect("failed job carries a message");
    assert!(!error.is_empty());

    match render(&snapshot) {
        DisplayModel::ErrorBanner { message } => assert!(message.contains("connection reset")),
        other => panic!("expected error banner, got {:?}", other),
    }

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(provider.fetch_count().await, 1);
}

// Scenario C: a second start supersedes the first; only the second job's
// polling affects the displayed state.
#[tokio::test(start_paused = true)]
async fn scenario_c_restart_discards_first_job() {
    let provider = Arc::new(ScriptedProvider::new(vec![Ok(completed_with(
        "analysis of the second domain",
    ))]));
    let registry = AnalysisRegistry::new(provider);

    registry.start("view-1", suggestion("first.example"), details());
    registry.start("view-1", suggestion("second.example"), details());

    for _ in 0..600 {
        let snapshot = registry.snapshot("view-1").expect("view is tracked");
        if snapshot.state.is_terminal() {
            assert_eq!(snapshot.domain_name, "second.example");
            assert_eq!(snapshot.state, AnalysisState::Completed);
            assert_eq!(
                snapshot.result.as_deref(),
                Some("analysis of the second domain")
            );
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("second job never completed");
}

// Stale-response discard: cancel while a fetch is in flight; its late
// resolution must not resurrect the job.
#[tokio::test(start_paused = true)]
async fn cancel_during_in_flight_fetch_stays_cancelled() {
    let provider = Arc::new(
        ScriptedProvider::new(vec![Ok(completed_with("late report"))])
            .with_fetch_delay(Duration::from_secs(10)),
    );
    let orchestrator = AnalysisOrchestrator::new(provider);
    orchestrator.start(suggestion("fernweh.travel"), details());

    // The first fetch is now sleeping inside the provider
    tokio::time::sleep(Duration::from_secs(1)).await;
    orchestrator.cancel();

    // Let the in-flight fetch resolve (if anything still drives it)
    tokio::time::sleep(Duration::from_secs(30)).await;

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.state, AnalysisState::Cancelled);
    assert!(snapshot.result.is_none());
}

// Polling cadence: consecutive non-terminal polls are spaced by the fixed
// interval, and at most one fetch is in flight at a time.
#[tokio::test(start_paused = true)]
async fn polls_are_sequential_and_spaced() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(status_only(RemoteTaskStatus::Pending)),
        Ok(status_only(RemoteTaskStatus::Pending)),
        Ok(status_only(RemoteTaskStatus::Running)),
        Ok(completed_with("done")),
    ]));
    let orchestrator = AnalysisOrchestrator::new(provider.clone());
    orchestrator.start(suggestion("fernweh.travel"), details());

    wait_for_terminal(&orchestrator).await;

    let times = provider.fetch_times.lock().await;
    assert_eq!(times.len(), 4);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_secs(5));
    }
    assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 1);
}
