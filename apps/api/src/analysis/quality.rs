use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;

/// Resume sections scored by the quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    ContactInfo,
    ProfessionalSummary,
    Skills,
    Experience,
    Education,
    Projects,
    Length,
}

impl ScoreCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::ContactInfo => "Contact Info",
            ScoreCategory::ProfessionalSummary => "Professional Summary",
            ScoreCategory::Skills => "Skills",
            ScoreCategory::Experience => "Experience",
            ScoreCategory::Education => "Education",
            ScoreCategory::Projects => "Projects",
            ScoreCategory::Length => "Length",
        }
    }
}

/// Maximum points per category. Sums to 100.
pub const CATEGORY_WEIGHTS: &[(ScoreCategory, u32)] = &[
    (ScoreCategory::ContactInfo, 10),
    (ScoreCategory::ProfessionalSummary, 10),
    (ScoreCategory::Skills, 20),
    (ScoreCategory::Experience, 25),
    (ScoreCategory::Education, 15),
    (ScoreCategory::Projects, 10),
    (ScoreCategory::Length, 10),
];

const SUMMARY_KEYWORDS: &[&str] = &["objective", "summary", "professional", "experienced", "skilled"];
const SUMMARY_WINDOW_CHARS: usize = 500;
const PROJECT_KEYWORDS: &[&str] = &[
    "project",
    "achievement",
    "award",
    "certificate",
    "publication",
    "portfolio",
];
const POINTS_PER_SKILL: u32 = 2;
const HEALTHY_WORDS_MIN: usize = 200;
const HEALTHY_WORDS_MAX: usize = 1200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryScore {
    pub category: ScoreCategory,
    pub awarded: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl ScoreLabel {
    pub fn from_total(total: u32) -> Self {
        match total {
            t if t >= 85 => ScoreLabel::Excellent,
            t if t >= 70 => ScoreLabel::Good,
            t if t >= 50 => ScoreLabel::Fair,
            _ => ScoreLabel::NeedsWork,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub categories: Vec<CategoryScore>,
    /// Sum of `categories[].awarded`, capped at 100.
    pub total: u32,
    pub label: ScoreLabel,
    /// One entry per category that did not earn full marks.
    pub feedback: Vec<String>,
}

/// Scores how complete a resume is. `experience_years` comes from the
/// experience estimator so the scorer stays a pure function of its inputs.
pub fn score_resume(record: &ResumeRecord, experience_years: f64) -> ScoreBreakdown {
    let mut categories = Vec::with_capacity(CATEGORY_WEIGHTS.len());
    let mut feedback = Vec::new();

    for &(category, max) in CATEGORY_WEIGHTS {
        let (awarded, note) = match category {
            ScoreCategory::ContactInfo => score_contact(record),
            ScoreCategory::ProfessionalSummary => score_summary(&record.raw_text),
            ScoreCategory::Skills => score_skills(record.skills.len(), max),
            ScoreCategory::Experience => score_experience(record, experience_years, max),
            ScoreCategory::Education => score_education(record),
            ScoreCategory::Projects => score_projects(&record.raw_text),
            ScoreCategory::Length => score_length(record.word_count()),
        };
        let awarded = awarded.min(max);
        if awarded < max {
            if let Some(note) = note {
                feedback.push(format!("{}: {}", category.label(), note));
            }
        }
        categories.push(CategoryScore {
            category,
            awarded,
            max,
        });
    }

    let total = categories.iter().map(|c| c.awarded).sum::<u32>().min(100);

    ScoreBreakdown {
        categories,
        total,
        label: ScoreLabel::from_total(total),
        feedback,
    }
}

type Scored = (u32, Option<String>);

fn score_contact(record: &ResumeRecord) -> Scored {
    let mut points = 0;
    let mut missing = Vec::new();

    if record.display_name().is_some() {
        points += 3;
    } else {
        missing.push("your full name");
    }
    if record.valid_email().is_some() {
        points += 4;
    } else {
        missing.push("a valid email address");
    }
    if record.valid_phone().is_some() {
        points += 3;
    } else {
        missing.push("a phone number");
    }

    let note = (!missing.is_empty()).then(|| {
        format!(
            "Add {} in plain text at the top of the resume.",
            missing.join(", ")
        )
    });
    (points, note)
}

fn score_summary(text: &str) -> Scored {
    let opening: String = text
        .chars()
        .take(SUMMARY_WINDOW_CHARS)
        .collect::<String>()
        .to_lowercase();

    if SUMMARY_KEYWORDS.iter().any(|kw| opening.contains(kw)) {
        (10, None)
    } else if text.chars().count() > 2000 {
        (
            5,
            Some("Open with a short objective or professional summary; none was found in the first lines.".to_string()),
        )
    } else {
        (
            0,
            Some("Add an objective or professional summary near the top.".to_string()),
        )
    }
}

fn score_skills(count: usize, max: u32) -> Scored {
    let points = (count as u32).saturating_mul(POINTS_PER_SKILL).min(max);
    let full_marks_at = max / POINTS_PER_SKILL;
    let note = if count == 0 {
        Some("Add a dedicated Skills section listing your tools and technologies.".to_string())
    } else {
        Some(format!(
            "{count} skills detected; list at least {full_marks_at} relevant skills for full marks."
        ))
    };
    (points, note)
}

fn score_experience(record: &ResumeRecord, years: f64, max: u32) -> Scored {
    // tiers: full, two thirds, one third
    let high = max;
    let mid = (max * 2 + 2) / 3;
    let low = max / 3;

    let points = if years >= 6.0 {
        high
    } else if years >= 3.0 {
        mid
    } else if years >= 1.0 {
        low
    } else {
        match record.company_count() {
            0 => 0,
            1 => low,
            2 => mid,
            _ => high,
        }
    };

    let note = if points == 0 {
        "Add work experience with employers and date ranges (e.g. Jan 2020 - Present).".to_string()
    } else {
        format!(
            "About {years:.1} years detected; include internships, freelance or project work with dates."
        )
    };
    (points, Some(note))
}

fn score_education(record: &ResumeRecord) -> Scored {
    match (!record.degrees.is_empty(), !record.education.is_empty()) {
        (true, true) => (15, None),
        (true, false) | (false, true) => (
            8,
            Some("List both your degree and the institution that awarded it.".to_string()),
        ),
        (false, false) => (
            0,
            Some("Add an Education section with degree, institution and year.".to_string()),
        ),
    }
}

fn score_projects(text: &str) -> Scored {
    let lower = text.to_lowercase();
    let mentions = PROJECT_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();

    match mentions {
        0 if text.chars().count() > 3000 => (
            3,
            Some("Call out projects, certifications or awards under their own heading.".to_string()),
        ),
        0 => (
            0,
            Some("Mention projects, certifications, awards or publications to show your work.".to_string()),
        ),
        1 => (
            5,
            Some("Add more projects, certifications or achievements.".to_string()),
        ),
        _ => (10, None),
    }
}

fn score_length(words: usize) -> Scored {
    if words < HEALTHY_WORDS_MIN {
        (
            0,
            Some(format!(
                "Resume is too short ({words} words); aim for {HEALTHY_WORDS_MIN}-{HEALTHY_WORDS_MAX} words."
            )),
        )
    } else if words > HEALTHY_WORDS_MAX {
        (
            0,
            Some(format!(
                "Resume is too long ({words} words); trim it to the most relevant {HEALTHY_WORDS_MIN}-{HEALTHY_WORDS_MAX} words."
            )),
        )
    } else {
        (10, None)
    }
}
