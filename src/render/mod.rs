//! Presentation adapter: maps job snapshots to renderable display models.
//!
//! `render` is a pure function of a snapshot. The report transform is a
//! deliberately narrow markdown subset (line breaks, `**bold**`, `* ` list
//! items) kept compatible with existing report content; anything else passes
//! through as literal text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::models::{AnalysisJobSnapshot, AnalysisState};

/// Placeholder shown instead of blank content for an empty report.
const EMPTY_REPORT_PLACEHOLDER: &str = "No analysis was returned.";

/// What the analysis view should show for a given job snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DisplayModel {
    /// Job not yet polling; show a spinner with a fixed message.
    Loading { message: String },
    /// Job polling; show the last raw remote status.
    Progress { remote_status: String },
    /// Final formatted report.
    Report { html: String },
    /// Failure banner with the extracted message.
    ErrorBanner { message: String },
}

/// Map a job snapshot to its display model.
pub fn render(job: &AnalysisJobSnapshot) -> DisplayModel {
    match job.state {
        AnalysisState::NotStarted | AnalysisState::Starting => DisplayModel::Loading {
            message: "Initializing deep research task...".to_string(),
        },
        AnalysisState::Polling => DisplayModel::Progress {
            remote_status: job
                .last_remote_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "loading".to_string()),
        },
        AnalysisState::Completed => {
            let text = job.result.as_deref().unwrap_or_default();
            if text.trim().is_empty() {
                DisplayModel::Report {
                    html: EMPTY_REPORT_PLACEHOLDER.to_string(),
                }
            } else {
                DisplayModel::Report {
                    html: report_to_html(text),
                }
            }
        }
        AnalysisState::Failed => DisplayModel::ErrorBanner {
            message: job
                .error
                .clone()
                .unwrap_or_else(|| "The research task failed.".to_string()),
        },
        AnalysisState::Cancelled => DisplayModel::Loading {
            message: "Analysis cancelled.".to_string(),
        },
    }
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").unwrap())
}

/// Constrained report-text to HTML transform.
///
/// Rules, in order: HTML-escape everything, `* ` lines become list items with
/// consecutive items wrapped in one `<ul>`, `**bold**` becomes `<strong>`,
/// remaining newlines become `<br />`.
pub fn report_to_html(text: &str) -> String {
    let escaped = escape_html(text);

    let mut html = String::with_capacity(escaped.len());
    let mut in_list = false;
    for (i, line) in escaped.lines().enumerate() {
        if let Some(item) = line.strip_prefix("* ") {
            if !in_list {
                html.push_str("<ul>");
                in_list = true;
            }
            html.push_str("<li>");
            html.push_str(item);
            html.push_str("</li>");
        } else {
            if in_list {
                html.push_str("</ul>");
                in_list = false;
            }
            if i > 0 {
                html.push_str("<br />");
            }
            html.push_str(line);
        }
    }
    if in_list {
        html.push_str("</ul>");
    }

    bold_re().replace_all(&html, "<strong>$1</strong>").to_string()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemoteTaskStatus;

    fn snapshot(state: AnalysisState) -> AnalysisJobSnapshot {
        let mut job = AnalysisJobSnapshot::not_started();
        job.state = state;
        job
    }

    #[test]
    fn test_starting_renders_loading() {
        let model = render(&snapshot(AnalysisState::Starting));
        assert!(matches!(model, DisplayModel::Loading { .. }));
    }

    #[test]
    fn test_polling_shows_remote_status() {
        let mut job = snapshot(AnalysisState::Polling);
        job.last_remote_status = Some(RemoteTaskStatus::Running);
        assert_eq!(
            render(&job),
            DisplayModel::Progress {
                remote_status: "running".to_string()
            }
        );
    }

    #[test]
    fn test_polling_without_status_shows_loading_text() {
        let model = render(&snapshot(AnalysisState::Polling));
        assert_eq!(
            model,
            DisplayModel::Progress {
                remote_status: "loading".to_string()
            }
        );
    }

    #[test]
    fn test_failed_renders_error_banner() {
        let mut job = snapshot(AnalysisState::Failed);
        job.error = Some("boom".to_string());
        assert_eq!(
            render(&job),
            DisplayModel::ErrorBanner {
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_empty_completed_report_shows_placeholder() {
        let mut job = snapshot(AnalysisState::Completed);
        job.result = Some("   ".to_string());
        assert_eq!(
            render(&job),
            DisplayModel::Report {
                html: EMPTY_REPORT_PLACEHOLDER.to_string()
            }
        );
    }

    #[test]
    fn test_bold_transform() {
        assert_eq!(
            report_to_html("a **strong** word"),
            "a <strong>strong</strong> word"
        );
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(report_to_html("one\ntwo"), "one<br />two");
    }

    #[test]
    fn test_consecutive_list_items_share_one_list() {
        assert_eq!(
            report_to_html("intro\n* first\n* second\noutro"),
            "intro<ul><li>first</li><li>second</li></ul><br />outro"
        );
    }

    #[test]
    fn test_unrecognized_markdown_passes_through() {
        assert_eq!(report_to_html("# Heading"), "# Heading");
        assert_eq!(report_to_html("_italic_"), "_italic_");
    }

    #[test]
    fn test_html_is_escaped() {
        assert_eq!(
            report_to_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }
}
