//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::analysis::ats::{ats_score, AtsReport};
use crate::analysis::experience::{
    estimate, estimate_from_phrases, estimate_years, ExperienceEstimate, OverlapPolicy,
};
use crate::analysis::matching::{match_skills, MatchResult};
use crate::analysis::quality::{score_resume, ScoreBreakdown};
use crate::analysis::report::{analyze, file_id, AnalysisOptions, AnalysisReport};
use crate::errors::AppError;
use crate::geo::locate_client;
use crate::models::resume::{normalize_skills, ResumeRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExperienceRequest {
    /// Raw resume text. Ignored when `phrases` is given.
    #[serde(default)]
    pub text: String,
    /// Pre-segmented date-range phrases, e.g. `["Jan 2019 - Dec 2020"]`.
    #[serde(default)]
    pub phrases: Option<Vec<String>>,
    /// Evaluation date; defaults to today (UTC).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Overrides the configured overlap policy for this request.
    #[serde(default)]
    pub policy: Option<OverlapPolicy>,
}

#[derive(Debug, Deserialize)]
pub struct AtsRequest {
    pub record: ResumeRecord,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub skills: Vec<String>,
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload: `resume` (PDF, required), `job_description`,
/// `target_role` and `custom_role` (text, optional). Extraction failures are
/// 422; everything after extraction degrades instead of failing.
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let limit_mb = state.config.max_upload_mb;
    let mut upload = None;
    let mut job_description = None;
    let mut target_role = None;
    let mut custom_role = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from_multipart(e, limit_mb))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "resume" => {
                debug!(
                    "Received resume upload '{}'",
                    field.file_name().unwrap_or("resume.pdf")
                );
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::from_multipart(e, limit_mb))?;
                upload = Some(bytes);
            }
            "job_description" | "target_role" | "custom_role" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::from_multipart(e, limit_mb))?;
                let slot = match name.as_str() {
                    "job_description" => &mut job_description,
                    "target_role" => &mut target_role,
                    _ => &mut custom_role,
                };
                *slot = Some(value);
            }
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    let bytes = upload
        .ok_or_else(|| AppError::Validation("multipart field 'resume' is required".to_string()))?;
    let upload_id = file_id(&bytes);

    let extractor = state.extractor.clone();
    let record = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    let options = AnalysisOptions {
        job_description,
        target_role: resolve_role(target_role, custom_role),
        today: Utc::now().date_naive(),
        overlap_policy: state.config.overlap_policy,
    };
    let mut report = analyze(record, &options, &state.catalog);
    report.file_id = Some(upload_id);
    report.location = locate_client(state.geo.as_deref(), &headers).await;

    info!(
        analysis_id = %report.analysis_id,
        quality = report.quality.total,
        ats = report.ats.score,
        years = report.experience.years,
        "Resume analyzed"
    );

    Ok(Json(report))
}

/// POST /api/v1/experience
pub async fn handle_experience(
    State(state): State<AppState>,
    Json(request): Json<ExperienceRequest>,
) -> Result<Json<ExperienceEstimate>, AppError> {
    let today = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let policy = request.policy.unwrap_or(state.config.overlap_policy);
    let result = match &request.phrases {
        Some(phrases) => estimate_from_phrases(phrases, today, policy),
        None => estimate(&request.text, today, policy),
    };
    Ok(Json(result))
}

/// POST /api/v1/score
///
/// Experience years are estimated from `raw_text` before scoring.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<Json<ScoreBreakdown>, AppError> {
    let years = years_for(&state, &record);
    Ok(Json(score_resume(&record, years)))
}

/// POST /api/v1/ats
pub async fn handle_ats(
    State(state): State<AppState>,
    Json(request): Json<AtsRequest>,
) -> Result<Json<AtsReport>, AppError> {
    let years = years_for(&state, &request.record);
    Ok(Json(ats_score(
        &request.record,
        years,
        request.job_description.as_deref(),
    )))
}

/// POST /api/v1/match
pub async fn handle_match(
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    let skills = normalize_skills(&request.skills);
    Ok(Json(match_skills(&skills, &request.job_description)))
}

fn years_for(state: &AppState, record: &ResumeRecord) -> f64 {
    estimate_years(
        &record.raw_text,
        Utc::now().date_naive(),
        state.config.overlap_policy,
    )
}

/// "Other" (or no selection) defers to the free-text custom role.
fn resolve_role(selected: Option<String>, custom: Option<String>) -> Option<String> {
    let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    match clean(selected) {
        Some(role) if !role.eq_ignore_ascii_case("other") => Some(role),
        _ => clean(custom),
    }
}
