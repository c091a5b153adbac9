//! Course catalog: static learning resources keyed by role track and tags.
//!
//! The default catalog is compiled into the binary from `data/courses.json`.
//! `COURSE_CATALOG_PATH` may point at a replacement file with the same shape;
//! it is read once at startup and shared read-only through `AppState`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMBEDDED_CATALOG: &str = include_str!("../../data/courses.json");

/// Roles offered to callers. Anything else is accepted as a custom role.
pub const ROLE_OPTIONS: &[&str] = &[
    "Data Scientist",
    "Data Analyst",
    "Machine Learning Engineer",
    "Backend Developer",
    "Full Stack Developer",
    "Frontend Developer",
    "Android Developer",
    "iOS Developer",
    "DevOps Engineer",
    "Product Manager",
    "Business Analyst",
    "UI/UX Designer",
    "Software Engineer",
    "Other",
];

/// Role name fragment → track. First match wins, so more specific names
/// come before generic ones.
const ROLE_TRACKS: &[(&str, Track)] = &[
    ("data scientist", Track::DataScience),
    ("data analyst", Track::DataScience),
    ("machine learning engineer", Track::MlEngineer),
    ("backend developer", Track::Backend),
    ("full stack developer", Track::Fullstack),
    ("frontend developer", Track::Frontend),
    ("android developer", Track::Android),
    ("ios developer", Track::Ios),
    ("devops engineer", Track::Backend),
    ("product manager", Track::DataScience),
    ("business analyst", Track::DataScience),
    ("ui/ux designer", Track::Uiux),
    ("software engineer", Track::Fullstack),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Track {
    DataScience,
    MlEngineer,
    Backend,
    Frontend,
    Fullstack,
    Android,
    Ios,
    Mobile,
    Uiux,
}

impl Track {
    /// Case-insensitive substring lookup over the known role names.
    pub fn from_role(role: &str) -> Option<Track> {
        let role = role.to_lowercase();
        ROLE_TRACKS
            .iter()
            .find(|(fragment, _)| role.contains(fragment))
            .map(|(_, track)| *track)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Track::DataScience => "data-science",
            Track::MlEngineer => "ml-engineer",
            Track::Backend => "backend",
            Track::Frontend => "frontend",
            Track::Fullstack => "fullstack",
            Track::Android => "android",
            Track::Ios => "ios",
            Track::Mobile => "mobile",
            Track::Uiux => "uiux",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub role_tracks: Vec<Track>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub level: Level,
    pub provider: String,
    #[serde(default)]
    pub is_free: bool,
}

impl Course {
    pub fn on_track(&self, track: Track) -> bool {
        self.role_tracks.contains(&track)
    }

    pub fn link(&self) -> CourseLink {
        CourseLink {
            title: self.title.clone(),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read course catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed course catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid course catalog: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCatalog {
    pub courses: Vec<Course>,
    #[serde(default)]
    pub resume_videos: Vec<CourseLink>,
    #[serde(default)]
    pub interview_videos: Vec<CourseLink>,
}

impl CourseCatalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// The override file when configured, otherwise the embedded catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: CourseCatalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = BTreeSet::new();
        for course in &self.courses {
            if course.title.trim().is_empty() || course.url.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "course '{}' needs a title and a url",
                    course.id
                )));
            }
            if !ids.insert(course.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate course id '{}'",
                    course.id
                )));
            }
        }
        Ok(())
    }

    /// Resume-writing and interview videos, in that order.
    pub fn general(&self) -> Vec<CourseLink> {
        self.resume_videos
            .iter()
            .chain(self.interview_videos.iter())
            .cloned()
            .collect()
    }

    pub fn providers(&self) -> BTreeSet<&str> {
        self.courses.iter().map(|c| c.provider.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = CourseCatalog::embedded().unwrap();
        assert_eq!(catalog.courses.len(), 16);
        assert_eq!(catalog.resume_videos.len(), 3);
        assert_eq!(catalog.interview_videos.len(), 3);
        assert_eq!(catalog.general().len(), 6);
        assert!(catalog.providers().contains("Coursera"));
    }

    #[test]
    fn test_every_role_option_except_other_has_a_track() {
        for role in ROLE_OPTIONS.iter().filter(|r| **r != "Other") {
            assert!(Track::from_role(role).is_some(), "{role} has no track");
        }
        assert_eq!(Track::from_role("Other"), None);
    }

    #[test]
    fn test_from_role_is_case_insensitive_substring() {
        assert_eq!(
            Track::from_role("Senior Machine Learning Engineer"),
            Some(Track::MlEngineer)
        );
        assert_eq!(Track::from_role("DEVOPS ENGINEER II"), Some(Track::Backend));
        assert_eq!(Track::from_role("Astronaut"), None);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let raw = r#"{"courses": [
            {"id": "a", "title": "A", "url": "https://a", "level": "beginner", "provider": "X"},
            {"id": "a", "title": "B", "url": "https://b", "level": "beginner", "provider": "X"}
        ]}"#;
        assert!(matches!(
            CourseCatalog::from_json(raw),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CourseCatalog::from_path(Path::new("/nonexistent/courses.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
