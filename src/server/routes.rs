//! REST handlers for suggestions, analysis, and registrar links

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ProviderError, ValidationError};
use crate::models::{AnalysisJobSnapshot, ProjectDetails, Suggestion, SuggestionList};
use crate::render::{self, DisplayModel};

use super::ServerAppState;

/// JSON error body returned by all failing handlers.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

/// Handler-level error with an HTTP status mapping.
pub enum AppError {
    Validation(ValidationError),
    Provider(ProviderError),
    NotFound(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            AppError::Provider(err) => {
                let status = match err {
                    ProviderError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    ProviderError::Upstream(_)
                    | ProviderError::MalformedResponse(_)
                    | ProviderError::TaskFailed(_)
                    | ProviderError::EmptyResult => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string())
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };
        (status, Json(ApiError { error: message })).into_response()
    }
}

/// POST /api/suggestions
pub async fn generate_suggestions(
    State(state): State<ServerAppState>,
    Json(details): Json<ProjectDetails>,
) -> Result<Json<SuggestionList>, AppError> {
    details.validate()?;
    let suggestions = state.suggestions.generate_suggestions(&details).await?;
    Ok(Json(SuggestionList { suggestions }))
}

/// Request body shared by the synchronous and job-based analysis routes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub suggestion: Suggestion,
    pub details: ProjectDetails,
}

/// Response of the synchronous analysis route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// Raw markdown-flavored report text.
    pub report: String,
    /// Report passed through the constrained markup transform.
    pub html: String,
}

/// POST /api/analysis
pub async fn run_analysis(
    State(state): State<ServerAppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    request.details.validate()?;
    let report = state
        .sync_analysis
        .run_analysis(&request.suggestion, &request.details)
        .await?;
    let html = render::report_to_html(&report);
    Ok(Json(AnalysisResponse { report, html }))
}

/// Request body for starting a job-based analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAnalysisJobRequest {
    /// Client-chosen identifier for the analysis view; one live job each.
    pub view_id: String,
    pub suggestion: Suggestion,
    pub details: ProjectDetails,
}

/// Job snapshot plus its display model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisJobResponse {
    pub job: AnalysisJobSnapshot,
    pub display: DisplayModel,
}

impl AnalysisJobResponse {
    fn from_snapshot(job: AnalysisJobSnapshot) -> Self {
        let display = render::render(&job);
        Self { job, display }
    }
}

/// POST /api/analysis/jobs
pub async fn start_analysis_job(
    State(state): State<ServerAppState>,
    Json(request): Json<StartAnalysisJobRequest>,
) -> Result<Json<AnalysisJobResponse>, AppError> {
    request.details.validate()?;
    let snapshot = state
        .analysis_jobs
        .start(&request.view_id, request.suggestion, request.details);
    Ok(Json(AnalysisJobResponse::from_snapshot(snapshot)))
}

/// GET /api/analysis/jobs/:view_id
pub async fn get_analysis_job(
    State(state): State<ServerAppState>,
    Path(view_id): Path<String>,
) -> Result<Json<AnalysisJobResponse>, AppError> {
    match state.analysis_jobs.snapshot(&view_id) {
        Some(snapshot) => Ok(Json(AnalysisJobResponse::from_snapshot(snapshot))),
        None => Err(AppError::NotFound(format!(
            "no analysis job for view '{}'",
            view_id
        ))),
    }
}

/// DELETE /api/analysis/jobs/:view_id
pub async fn cancel_analysis_job(
    State(state): State<ServerAppState>,
    Path(view_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.analysis_jobs.close(&view_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "no analysis job for view '{}'",
            view_id
        )))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegistrarLinkQuery {
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrarLinkResponse {
    pub url: String,
}

/// GET /api/registrar-link?domain=...
pub async fn registrar_link(
    State(state): State<ServerAppState>,
    Query(query): Query<RegistrarLinkQuery>,
) -> Result<Json<RegistrarLinkResponse>, AppError> {
    let url = build_registrar_url(&state.registrar_base, &query.domain)
        .map_err(|e| AppError::Provider(ProviderError::Configuration(e)))?;
    Ok(Json(RegistrarLinkResponse { url }))
}

/// Build the outbound registrar cart URL for a domain.
pub fn build_registrar_url(base: &str, domain: &str) -> Result<String, String> {
    let mut url = Url::parse(base).map_err(|e| format!("invalid registrar base URL: {}", e))?;
    url.query_pairs_mut()
        .append_pair("a", "add")
        .append_pair("domain", "register")
        .append_pair("query", domain);
    Ok(url.to_string())
}
