use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::recommendations::catalog::{Course, CourseCatalog, CourseLink, Level, Track};
use crate::text::tokenize;

pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const MIN_RESULTS: usize = 3;
pub const MAX_RESULTS: usize = 15;
const ON_TRACK_BONUS: u32 = 2;

/// Where a recommendation list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Track,
    SkillTags,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub role: String,
    pub track: Option<Track>,
    pub source: RecommendationSource,
    pub courses: Vec<CourseLink>,
}

/// Role lookup first, then skill tags, then the general list. Never fails;
/// the result is empty only when the catalog itself is.
pub fn recommend(catalog: &CourseCatalog, role: &str, skills: &BTreeSet<String>) -> Recommendation {
    let track = Track::from_role(role);

    if let Some(track) = track {
        let courses: Vec<CourseLink> = catalog
            .courses
            .iter()
            .filter(|c| c.on_track(track))
            .map(Course::link)
            .collect();
        if !courses.is_empty() {
            return Recommendation {
                role: role.to_string(),
                track: Some(track),
                source: RecommendationSource::Track,
                courses,
            };
        }
    }

    let tags = interest_tags(skills.iter());
    let courses: Vec<CourseLink> = catalog
        .courses
        .iter()
        .filter(|c| c.tags.iter().any(|t| tags.contains(&t.to_lowercase())))
        .map(Course::link)
        .collect();
    if !courses.is_empty() {
        return Recommendation {
            role: role.to_string(),
            track,
            source: RecommendationSource::SkillTags,
            courses,
        };
    }

    Recommendation {
        role: role.to_string(),
        track,
        source: RecommendationSource::General,
        courses: catalog.general(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Learning plan
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningPlanRequest {
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Skills the job description asks for but the resume lacks.
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub free_only: bool,
    /// `None` or "any" disables the filter.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanFilters {
    pub free_only: bool,
    pub provider: Option<String>,
    pub level: Option<Level>,
    pub max_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanEntry {
    pub title: String,
    pub url: String,
    pub provider: String,
    pub level: Level,
    pub is_free: bool,
    pub role_tracks: Vec<Track>,
    pub tags: Vec<String>,
    pub relevance_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPlan {
    pub target_role: Option<String>,
    pub track: Option<Track>,
    pub filters: PlanFilters,
    pub courses: Vec<PlanEntry>,
}

/// Filters the catalog and ranks what is left by tag overlap with the
/// caller's skills (plus a bonus for on-track courses).
pub fn learning_plan(catalog: &CourseCatalog, request: &LearningPlanRequest) -> LearningPlan {
    let track = request.target_role.as_deref().and_then(Track::from_role);
    let provider = request
        .provider
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("any"))
        .map(String::from);
    let max_results = request
        .max_results
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .clamp(MIN_RESULTS, MAX_RESULTS);

    let tags = interest_tags(request.skills.iter().chain(request.missing_skills.iter()));

    let mut ranked: Vec<(u32, &Course)> = catalog
        .courses
        .iter()
        .filter(|c| track.map_or(true, |t| c.on_track(t)))
        .filter(|c| !request.free_only || c.is_free)
        .filter(|c| {
            provider
                .as_deref()
                .map_or(true, |p| c.provider.eq_ignore_ascii_case(p))
        })
        .filter(|c| request.level.map_or(true, |l| c.level == l))
        .map(|c| (relevance(c, &tags, track), c))
        .collect();

    // highest score first; equal scores by lowercase title, descending
    ranked.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
    });

    let courses = ranked
        .into_iter()
        .take(max_results)
        .map(|(relevance_score, c)| PlanEntry {
            title: c.title.clone(),
            url: c.url.clone(),
            provider: c.provider.clone(),
            level: c.level,
            is_free: c.is_free,
            role_tracks: c.role_tracks.clone(),
            tags: c.tags.clone(),
            relevance_score,
        })
        .collect();

    LearningPlan {
        target_role: request.target_role.clone(),
        track,
        filters: PlanFilters {
            free_only: request.free_only,
            provider,
            level: request.level,
            max_results,
        },
        courses,
    }
}

fn relevance(course: &Course, tags: &BTreeSet<String>, track: Option<Track>) -> u32 {
    let overlap = course
        .tags
        .iter()
        .filter(|t| tags.contains(&t.to_lowercase()))
        .count() as u32;
    let bonus = match track {
        Some(t) if course.on_track(t) => ON_TRACK_BONUS,
        _ => 0,
    };
    overlap + bonus
}

/// Skill tokens plus the hyphenated form of multi-word skills, so
/// "machine learning" also hits the catalog tag "machine-learning".
fn interest_tags<'a, I>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut tags = BTreeSet::new();
    for skill in skills {
        let tokens = tokenize(skill);
        if tokens.len() > 1 {
            tags.insert(tokens.join("-"));
        }
        tags.extend(tokens);
    }
    tags
}
