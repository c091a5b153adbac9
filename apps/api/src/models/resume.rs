use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::text::normalize_phrase;

/// Structured fields pulled out of a single uploaded resume.
///
/// Produced once per upload by a `FieldExtractor` and never mutated afterwards.
/// Missing fields stay `None` / empty; analysis proceeds with what is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Lowercase, whitespace-collapsed skill names.
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: BTreeSet<String>,
    /// Degree mentions, e.g. "B.Tech" or "Master of Science".
    #[serde(default)]
    pub degrees: Vec<String>,
    /// Institution lines (universities, colleges, institutes).
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub raw_text: String,
}

impl ResumeRecord {
    /// Name, if present and longer than an initial.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(&self.name).filter(|n| n.chars().count() > 2)
    }

    /// Email, if it looks like one.
    pub fn valid_email(&self) -> Option<&str> {
        non_blank(&self.email).filter(|e| e.contains('@'))
    }

    /// Phone, if it carries at least ten digits.
    pub fn valid_phone(&self) -> Option<&str> {
        non_blank(&self.phone).filter(|p| p.chars().filter(char::is_ascii_digit).count() >= 10)
    }

    /// Distinct employers, compared case-insensitively.
    pub fn company_count(&self) -> usize {
        self.companies
            .iter()
            .map(|c| normalize_phrase(c))
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn has_education(&self) -> bool {
        !self.degrees.is_empty() || !self.education.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.raw_text.split_whitespace().count()
    }

    /// Fields the extractor could not find. Analysis still runs; these are
    /// surfaced to the caller alongside the results.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.display_name().is_none() {
            warnings.push("No name detected".to_string());
        }
        if self.valid_email().is_none() {
            warnings.push("No email address detected".to_string());
        }
        if self.valid_phone().is_none() {
            warnings.push("No phone number detected".to_string());
        }
        if self.skills.is_empty() {
            warnings.push("No skills detected".to_string());
        }
        if !self.has_education() {
            warnings.push("No education details detected".to_string());
        }
        if self.companies.is_empty() {
            warnings.push("No company names detected".to_string());
        }
        warnings
    }
}

/// Normalizes skill names into the canonical set form, dropping blanks.
pub fn normalize_skills<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| normalize_phrase(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

fn deserialize_skills<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_skills(raw))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
