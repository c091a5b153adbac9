//! Axum route handlers for roles, course recommendations and learning plans.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::resume::normalize_skills;
use crate::recommendations::catalog::ROLE_OPTIONS;
use crate::recommendations::engine::{
    learning_plan, recommend, LearningPlan, LearningPlanRequest, Recommendation,
};
use crate::recommendations::export::{to_csv, to_json};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub role: Option<String>,
    /// Comma-separated skill names.
    #[serde(default)]
    pub skills: Option<String>,
}

/// GET /api/v1/roles
pub async fn handle_roles(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "roles": ROLE_OPTIONS,
        "providers": state.catalog.providers(),
        "levels": ["beginner", "intermediate", "advanced"],
    }))
}

/// GET /api/v1/recommendations?role=&skills=a,b
///
/// Unknown roles are not an error; they fall back to skill tags and then to
/// the general list.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Json<Recommendation> {
    let skills = normalize_skills(query.skills.as_deref().unwrap_or("").split(','));
    let role = query.role.unwrap_or_default();
    Json(recommend(&state.catalog, role.trim(), &skills))
}

/// POST /api/v1/learning-plan
pub async fn handle_learning_plan(
    State(state): State<AppState>,
    Json(request): Json<LearningPlanRequest>,
) -> Json<LearningPlan> {
    Json(learning_plan(&state.catalog, &request))
}

/// POST /api/v1/learning-plan/csv
///
/// Same ranking as the JSON endpoint, returned as a CSV attachment.
pub async fn handle_learning_plan_csv(
    State(state): State<AppState>,
    Json(request): Json<LearningPlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let plan = learning_plan(&state.catalog, &request);
    let body = to_csv(&plan).map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"learning_plan.csv\"",
            ),
        ],
        body,
    ))
}

/// POST /api/v1/learning-plan/json
pub async fn handle_learning_plan_json(
    State(state): State<AppState>,
    Json(request): Json<LearningPlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let plan = learning_plan(&state.catalog, &request);
    let body = to_json(&plan).map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"learning_plan.json\"",
            ),
        ],
        body,
    ))
}
