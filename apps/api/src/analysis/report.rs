//! Full-resume analysis: every component run over one extracted record.

use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::analysis::ats::{ats_score, AtsReport};
use crate::analysis::experience::{estimate, ExperienceEstimate, OverlapPolicy};
use crate::analysis::matching::{match_skills, MatchResult};
use crate::analysis::quality::{score_resume, ScoreBreakdown};
use crate::geo::Location;
use crate::models::resume::ResumeRecord;
use crate::recommendations::catalog::{CourseCatalog, CourseLink};
use crate::recommendations::engine::{
    learning_plan, recommend, LearningPlan, LearningPlanRequest, Recommendation,
};

/// Role used for course lookup when the caller names none.
pub const DEFAULT_TARGET_ROLE: &str = "Software Developer";

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub job_description: Option<String>,
    pub target_role: Option<String>,
    pub today: NaiveDate,
    pub overlap_policy: OverlapPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    /// SHA-256 of the uploaded bytes, hex encoded.
    pub file_id: Option<String>,
    pub target_role: String,
    pub record: ResumeRecord,
    pub warnings: Vec<String>,
    pub experience: ExperienceEstimate,
    pub quality: ScoreBreakdown,
    pub ats: AtsReport,
    /// Present only when a job description was supplied.
    pub job_match: Option<MatchResult>,
    pub recommendations: Recommendation,
    pub learning_plan: LearningPlan,
    pub resume_tips: Vec<CourseLink>,
    pub interview_tips: Vec<CourseLink>,
    pub location: Option<Location>,
}

/// Runs the independent analyses over `record`. Pure apart from the random
/// analysis id; `file_id` and `location` are filled in by the caller.
pub fn analyze(
    record: ResumeRecord,
    options: &AnalysisOptions,
    catalog: &CourseCatalog,
) -> AnalysisReport {
    let job_description = options
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|jd| !jd.is_empty());
    let target_role = options
        .target_role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_TARGET_ROLE)
        .to_string();

    let experience = estimate(&record.raw_text, options.today, options.overlap_policy);
    let quality = score_resume(&record, experience.years);
    let ats = ats_score(&record, experience.years, job_description);
    let job_match = job_description.map(|jd| match_skills(&record.skills, jd));

    let recommendations = recommend(catalog, &target_role, &record.skills);
    let plan = learning_plan(
        catalog,
        &LearningPlanRequest {
            target_role: Some(target_role.clone()),
            skills: record.skills.iter().cloned().collect(),
            missing_skills: job_match
                .as_ref()
                .map(|m| m.missing_skills.iter().cloned().collect())
                .unwrap_or_default(),
            ..Default::default()
        },
    );

    AnalysisReport {
        analysis_id: Uuid::new_v4(),
        file_id: None,
        target_role,
        warnings: record.warnings(),
        experience,
        quality,
        ats,
        job_match,
        recommendations,
        learning_plan: plan,
        resume_tips: catalog.resume_videos.clone(),
        interview_tips: catalog.interview_videos.clone(),
        location: None,
        record,
    }
}

/// Stable identifier for an upload.
pub fn file_id(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fields::parse_fields;

    const RESUME: &str = "\
Jane Doe
jane@example.com | +1 555 010 0199

Experience
Acme Corp | Jan 2019 - Dec 2020
Globex Inc | 2021 - Present
- Built Python and SQL reporting services

Education
B.Tech, State University
";

    fn options(jd: Option<&str>, role: Option<&str>) -> AnalysisOptions {
        AnalysisOptions {
            job_description: jd.map(String::from),
            target_role: role.map(String::from),
            today: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            overlap_policy: OverlapPolicy::Merge,
        }
    }

    #[test]
    fn test_full_pipeline() {
        let catalog = CourseCatalog::embedded().unwrap();
        let report = analyze(
            parse_fields(RESUME),
            &options(Some("Python, SQL and Excel required"), Some("Data Analyst")),
            &catalog,
        );

        assert!((report.experience.years - 5.0).abs() < 0.05);
        let job_match = report.job_match.unwrap();
        assert_eq!(job_match.match_percentage, 66.7);
        assert!(job_match.missing_skills.contains("excel"));
        assert_eq!(report.target_role, "Data Analyst");
        assert!(!report.recommendations.courses.is_empty());
        assert!(!report.learning_plan.courses.is_empty());
        assert_eq!(report.resume_tips.len(), 3);
        let sum: u32 = report.quality.categories.iter().map(|c| c.awarded).sum();
        assert_eq!(sum, report.quality.total);
    }

    #[test]
    fn test_without_job_description_there_is_no_match() {
        let catalog = CourseCatalog::embedded().unwrap();
        let report = analyze(parse_fields(RESUME), &options(Some("  "), None), &catalog);
        assert!(report.job_match.is_none());
        assert!(report.ats.keyword_match.is_none());
        assert_eq!(report.target_role, DEFAULT_TARGET_ROLE);
    }

    #[test]
    fn test_sparse_record_still_analyzes_with_warnings() {
        let catalog = CourseCatalog::embedded().unwrap();
        let report = analyze(ResumeRecord::default(), &options(None, None), &catalog);
        assert_eq!(report.experience.years, 0.0);
        assert_eq!(report.warnings.len(), 6);
        assert!(!report.quality.feedback.is_empty());
    }

    #[test]
    fn test_file_id_is_sha256_hex() {
        assert_eq!(
            file_id(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
