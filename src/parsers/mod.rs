//! Tolerant normalization of model and task output.
//!
//! Providers return JSON that is sometimes wrapped in markdown code fences,
//! and the research service returns task payloads either as a single object
//! or as a one-element array. All of that tolerance lives here, as explicit
//! normalization steps, rather than ad hoc string surgery at call sites.

mod model_output;

pub use model_output::{
    extract_report_text, normalize_task, parse_suggestion_payload, strip_code_fences,
    ReportExtraction,
};
