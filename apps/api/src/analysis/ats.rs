//! ATS Scorer: how well a resume survives an applicant tracking system.
//!
//! Four categories (keywords 45, sections 25, contact & links 15,
//! readability 15). Each category carries its own actionable tips.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;
use crate::text::tokenize;

// ────────────────────────────────────────────────────────────────────────────
// Weights and vocabulary
// ────────────────────────────────────────────────────────────────────────────

const KEYWORDS_MAX: u32 = 45;
const SECTIONS_MAX: u32 = 25;
const CONTACT_MAX: u32 = 15;
const READABILITY_MAX: u32 = 15;

/// Awarded when no job description is supplied.
const KEYWORDS_WITHOUT_JD: u32 = 10;
const MAX_LISTED_MISSING: usize = 10;
const MAX_PIPES: usize = 25;
const READABLE_CHARS_MIN: usize = 800;
const READABLE_CHARS_MAX: usize = 8000;

const JD_STOPWORDS: &[&str] = &[
    "and", "or", "with", "to", "in", "for", "of", "a", "an", "the", "on", "at", "by", "we", "you",
    "your", "our", "they", "them", "this", "that", "as", "is", "are", "years", "year",
    "experience", "knowledge", "skills", "ability", "required",
];

const PROJECT_MARKERS: &[&str] = &["project", "portfolio", "github"];
const BULLET_PREFIXES: &[char] = &['•', '-', '*'];

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://\S+|www\.\S+)").expect("link regex is valid"));

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsCategory {
    Keywords,
    Sections,
    ContactAndLinks,
    Readability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsCategoryScore {
    pub category: AtsCategory,
    pub awarded: u32,
    pub max: u32,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub score: u32, // 0-100
    pub categories: Vec<AtsCategoryScore>,
    /// Share of job-description keywords found among resume skills. `None`
    /// when no job description was given.
    pub keyword_match: Option<KeywordCoverage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordCoverage {
    pub percentage: u32,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

pub fn ats_score(
    record: &ResumeRecord,
    experience_years: f64,
    job_description: Option<&str>,
) -> AtsReport {
    let job_description = job_description.map(str::trim).filter(|jd| !jd.is_empty());
    let coverage = job_description.map(|jd| keyword_coverage(jd, &record.skills));

    let categories = vec![
        keywords(coverage.as_ref()),
        sections(record, experience_years),
        contact_and_links(record),
        readability(&record.raw_text),
    ];
    let score = categories
        .iter()
        .map(|c| c.awarded)
        .sum::<u32>()
        .min(100);

    AtsReport {
        score,
        categories,
        keyword_match: coverage,
    }
}

/// Tokenizes the job description, drops stopwords and short tokens, then
/// measures how many of the remaining keywords appear among the resume's
/// skill tokens.
pub fn keyword_coverage(job_description: &str, skills: &BTreeSet<String>) -> KeywordCoverage {
    let jd_keywords: BTreeSet<String> = tokenize(job_description)
        .into_iter()
        .filter(|t| !JD_STOPWORDS.contains(&t.as_str()))
        .filter(|t| t.chars().count() >= 3 || t == "c" || t == "r")
        .collect();

    let resume_tokens: BTreeSet<String> = skills.iter().flat_map(|s| tokenize(s)).collect();

    let (matched, missing): (Vec<String>, Vec<String>) = jd_keywords
        .into_iter()
        .partition(|keyword| resume_tokens.contains(keyword));

    let total = matched.len() + missing.len();
    let percentage = if total == 0 {
        0
    } else {
        (100.0 * matched.len() as f64 / total as f64).round() as u32
    };

    KeywordCoverage {
        percentage,
        matched,
        missing,
    }
}

fn keywords(coverage: Option<&KeywordCoverage>) -> AtsCategoryScore {
    let mut tips = Vec::new();
    let awarded = match coverage {
        Some(coverage) => {
            if !coverage.missing.is_empty() {
                let listed: Vec<&str> = coverage
                    .missing
                    .iter()
                    .take(MAX_LISTED_MISSING)
                    .map(String::as_str)
                    .collect();
                tips.push(format!(
                    "Add missing job keywords naturally in your Skills and Experience bullets: {}",
                    listed.join(", ")
                ));
            }
            (coverage.percentage as f64 * KEYWORDS_MAX as f64 / 100.0).round() as u32
        }
        None => {
            tips.push(
                "Paste a job description to compute keyword match (the largest ATS factor)."
                    .to_string(),
            );
            KEYWORDS_WITHOUT_JD
        }
    };

    AtsCategoryScore {
        category: AtsCategory::Keywords,
        awarded: awarded.min(KEYWORDS_MAX),
        max: KEYWORDS_MAX,
        tips,
    }
}

fn sections(record: &ResumeRecord, experience_years: f64) -> AtsCategoryScore {
    let mut awarded = 0;
    let mut tips = Vec::new();

    if !record.skills.is_empty() {
        awarded += 7;
    } else {
        tips.push("Add a clear 'Skills' section with separated keywords.".to_string());
    }

    if experience_years > 0.0 || record.company_count() > 0 {
        awarded += 8;
    } else {
        tips.push("Add an 'Experience' section with dates and measurable impact.".to_string());
    }

    if record.has_education() {
        awarded += 5;
    } else {
        tips.push("Add an 'Education' section with degree, institute and year.".to_string());
    }

    let lower = record.raw_text.to_lowercase();
    if PROJECT_MARKERS.iter().any(|m| lower.contains(m)) {
        awarded += 5;
    } else {
        tips.push("Add a 'Projects' section with two or three strong projects and links.".to_string());
    }

    AtsCategoryScore {
        category: AtsCategory::Sections,
        awarded: awarded.min(SECTIONS_MAX),
        max: SECTIONS_MAX,
        tips,
    }
}

fn contact_and_links(record: &ResumeRecord) -> AtsCategoryScore {
    let mut awarded = 0;
    let mut tips = Vec::new();

    if record.display_name().is_some() {
        awarded += 4;
    } else {
        tips.push("Put your name in plain text at the top, not inside an image.".to_string());
    }
    if record.valid_email().is_some() {
        awarded += 5;
    } else {
        tips.push("Add a plain-text email address outside headers and footers.".to_string());
    }
    if record.valid_phone().is_some() {
        awarded += 3;
    } else {
        tips.push("Add a phone number in plain text.".to_string());
    }

    match LINK_RE.find_iter(&record.raw_text).count() {
        0 => tips.push("Add GitHub and LinkedIn or portfolio links as plain URLs.".to_string()),
        1 => {
            awarded += 2;
            tips.push("Add both GitHub and LinkedIn or portfolio links.".to_string());
        }
        _ => awarded += 3,
    }

    AtsCategoryScore {
        category: AtsCategory::ContactAndLinks,
        awarded: awarded.min(CONTACT_MAX),
        max: CONTACT_MAX,
        tips,
    }
}

fn readability(text: &str) -> AtsCategoryScore {
    let mut awarded = 0;
    let mut tips = Vec::new();

    let bullets = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(BULLET_PREFIXES))
        .count();
    if bullets >= 6 {
        awarded += 6;
    } else if bullets >= 3 {
        awarded += 4;
        tips.push("Use more bullet points for experience and projects.".to_string());
    } else {
        tips.push("Use bullet points (• or -) instead of paragraphs for achievements.".to_string());
    }

    let chars = text.chars().count();
    if (READABLE_CHARS_MIN..=READABLE_CHARS_MAX).contains(&chars) {
        awarded += 5;
    } else {
        tips.push(
            "Keep the resume a reasonable length and make sure its text is extractable (not scanned)."
                .to_string(),
        );
    }

    if text.matches('|').count() < MAX_PIPES {
        awarded += 4;
    } else {
        tips.push("Avoid tables and columns; use a single-column layout.".to_string());
    }

    AtsCategoryScore {
        category: AtsCategory::Readability,
        awarded: awarded.min(READABILITY_MAX),
        max: READABILITY_MAX,
        tips,
    }
}
