use thiserror::Error;

use crate::recommendations::engine::LearningPlan;

const CSV_HEADER: [&str; 8] = [
    "title",
    "url",
    "provider",
    "level",
    "is_free",
    "role_tracks",
    "tags",
    "relevance_score",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv buffer flush failed: {0}")]
    Flush(String),

    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row per course. Tracks and tags are comma-joined inside their cell.
pub fn to_csv(plan: &LearningPlan) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for course in &plan.courses {
        let tracks = course
            .role_tracks
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        wtr.write_record([
            course.title.as_str(),
            course.url.as_str(),
            course.provider.as_str(),
            course.level.as_str(),
            if course.is_free { "true" } else { "false" },
            tracks.as_str(),
            course.tags.join(",").as_str(),
            course.relevance_score.to_string().as_str(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn to_json(plan: &LearningPlan) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(plan)?)
}
