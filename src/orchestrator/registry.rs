// Per-view registry of analysis orchestrators

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::models::{AnalysisJobSnapshot, ProjectDetails, Suggestion};
use crate::parsers::ReportExtraction;
use crate::providers::AnalysisProvider;

use super::{AnalysisOrchestrator, DEFAULT_POLL_INTERVAL};

/// Holds one orchestrator per open analysis view.
///
/// Each view owns at most one live job; starting an analysis for a view that
/// already has one supersedes it, and closing the view cancels and drops the
/// orchestrator.
pub struct AnalysisRegistry {
    provider: Arc<dyn AnalysisProvider>,
    poll_interval: Duration,
    extraction: ReportExtraction,
    views: Mutex<HashMap<String, Arc<AnalysisOrchestrator>>>,
}

impl AnalysisRegistry {
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
            views: Mutex::new(HashMap::new()),
        }
    }

    /// Start (or supersede) the job for a view.
    pub fn start(
        &self,
        view_id: &str,
        suggestion: Suggestion,
        details: ProjectDetails,
    ) -> AnalysisJobSnapshot {
        let orchestrator = self.get_or_create(view_id);
        orchestrator.start(suggestion, details)
    }

    /// Snapshot of a view's job, if the view is known.
    pub fn snapshot(&self, view_id: &str) -> Option<AnalysisJobSnapshot> {
        let views = lock_views(&self.views);
        views.get(view_id).map(|o| o.snapshot())
    }

    /// Cancel a view's job and forget the view. Returns false for unknown
    /// views.
    pub fn close(&self, view_id: &str) -> bool {
        let removed = lock_views(&self.views).remove(view_id);
        match removed {
            Some(orchestrator) => {
                orchestrator.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of tracked views.
    pub fn len(&self) -> usize {
        lock_views(&self.views).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_or_create(&self, view_id: &str) -> Arc<AnalysisOrchestrator> {
        let mut views = lock_views(&self.views);
        views
            .entry(view_id.to_string())
            .or_insert_with(|| {
                Arc::new(AnalysisOrchestrator::with_options(
                    self.provider.clone(),
                    self.poll_interval,
                    self.extraction,
                ))
            })
            .clone()
    }
}

fn lock_views(
    views: &Mutex<HashMap<String, Arc<AnalysisOrchestrator>>>,
) -> std::sync::MutexGuard<'_, HashMap<String, Arc<AnalysisOrchestrator>>> {
    match views.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
