//! Regex heuristics over decoded resume text.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::vocabulary::find_known_skills;
use crate::models::resume::ResumeRecord;
use crate::recommendations::catalog::Track;

const NAME_SCAN_LINES: usize = 5;
const MAX_EDUCATION_LINES: usize = 3;
const MAX_COMPANIES: usize = 10;
const MIN_PHONE_DIGITS: usize = 10;

// Words that mark a line as a heading or job title rather than a name.
const NOT_NAME_WORDS: &[&str] = &[
    "resume", "curriculum", "vitae", "profile", "summary", "objective", "experience",
    "education", "skills", "projects", "contact", "engineer", "developer", "designer",
    "analyst", "scientist", "manager", "consultant", "intern", "architect",
];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").expect("email regex is valid")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d -]{8,12}\d").expect("phone regex is valid"));

// Abbreviations are case-sensitive so "be" or "ma" in prose never match.
static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:B\.?\s?Tech|M\.?\s?Tech|B\.?\s?Sc|M\.?\s?Sc|B\.?\s?Com|M\.?\s?Com|BCA|MCA|MBA|BBA|Ph\.?\s?D)\b|\b(?:B\.E|M\.E|B\.S|M\.S|B\.A|M\.A)\.|\b(?i:bachelor|master)(?:'s)?\s+(?:of|in)\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*",
    )
    .expect("degree regex is valid")
});

static INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:university|college|institute|iit|nit|iiit)\b")
        .expect("institution regex is valid")
});

static COMPANY_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:inc|llc|llp|ltd|limited|pvt|corp|corporation|gmbh|plc|technologies|solutions|labs)\b")
        .expect("company regex is valid")
});

static SEGMENT_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:\||,|\t|\s-\s|\s\u{2013}\s|\s\u{2014}\s)\s*").expect("split regex is valid"));

/// Builds a record from plain resume text. Every field is best-effort;
/// anything not found stays empty.
pub fn parse_fields(text: &str) -> ResumeRecord {
    ResumeRecord {
        name: find_name(text),
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: find_phone(text),
        skills: find_known_skills(text),
        degrees: find_degrees(text),
        education: find_institutions(text),
        companies: find_companies(text),
        raw_text: text.to_string(),
    }
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// First line near the top made of two to four alphabetic words that is not
/// a heading or a job title.
fn find_name(text: &str) -> Option<String> {
    non_empty_lines(text)
        .take(NAME_SCAN_LINES)
        .find(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            (2..=4).contains(&words.len())
                && words.iter().all(|w| {
                    w.chars().next().map_or(false, char::is_alphabetic)
                        && w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-'))
                })
                && !looks_like_title(line)
        })
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn looks_like_title(line: &str) -> bool {
    if Track::from_role(line).is_some() {
        return true;
    }
    line.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase())
        .any(|w| NOT_NAME_WORDS.contains(&w.as_str()))
}

fn find_phone(text: &str) -> Option<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|p| p.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS)
        .map(String::from)
}

fn find_degrees(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    DEGREE_RE
        .find_iter(text)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|d| seen.insert(d.to_lowercase()))
        .collect()
}

fn find_institutions(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    non_empty_lines(text)
        .filter(|line| (4..=120).contains(&line.chars().count()))
        .filter(|line| INSTITUTION_RE.is_match(line))
        .filter(|line| seen.insert(line.to_lowercase()))
        .take(MAX_EDUCATION_LINES)
        .map(String::from)
        .collect()
}

/// The part of each line that carries a corporate suffix, e.g.
/// "Acme Corp" out of "Acme Corp | Jan 2020 - Present".
fn find_companies(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    non_empty_lines(text)
        .flat_map(|line| SEGMENT_SPLIT_RE.split(line))
        .map(str::trim)
        .filter(|segment| {
            segment.chars().count() <= 60
                && segment.split_whitespace().count() <= 6
                && COMPANY_SUFFIX_RE.is_match(segment)
                && !INSTITUTION_RE.is_match(segment)
        })
        .filter(|segment| seen.insert(segment.to_lowercase()))
        .take(MAX_COMPANIES)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Jane Q. Doe
Backend Engineer | jane.doe@example.com | +91 98765 43210
https://github.com/janedoe

Professional Summary
Experienced engineer building Python and SQL services.

Experience
Acme Technologies Pvt Ltd | Jan 2019 - Dec 2020
Globex Corp - 2021 - Present

Education
B.Tech in Computer Science
Indian Institute of Technology, Delhi
Master of Science in Data Science
Stanford University
";

    #[test]
    fn test_parses_contact_fields() {
        let record = parse_fields(SAMPLE);
        assert_eq!(record.name.as_deref(), Some("Jane Q. Doe"));
        assert_eq!(record.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(record.phone.as_deref(), Some("+91 98765 43210"));
    }

    #[test]
    fn test_parses_skills_education_and_companies() {
        let record = parse_fields(SAMPLE);
        assert!(record.skills.contains("python"));
        assert!(record.skills.contains("sql"));
        assert!(record.skills.contains("data science"));
        assert_eq!(
            record.degrees,
            vec!["B.Tech".to_string(), "Master of Science".to_string()]
        );
        assert_eq!(
            record.education,
            vec![
                "Indian Institute of Technology, Delhi".to_string(),
                "Stanford University".to_string()
            ]
        );
        assert_eq!(
            record.companies,
            vec!["Acme Technologies Pvt Ltd".to_string(), "Globex Corp".to_string()]
        );
        assert_eq!(record.raw_text, SAMPLE);
    }

    #[test]
    fn test_short_numbers_are_not_phones() {
        assert_eq!(find_phone("Call 555 0100 or 2019 - 2021"), None);
    }

    #[test]
    fn test_name_skips_headings() {
        assert_eq!(find_name("Curriculum Vitae\nJohn Smith\n"), Some("John Smith".to_string()));
        assert_eq!(find_name("john@example.com\n"), None);
    }

    #[test]
    fn test_name_skips_job_titles() {
        let text = "Software Engineer\nJane Doe\njane@example.com\n";
        assert_eq!(find_name(text), Some("Jane Doe".to_string()));
        assert_eq!(
            find_name("Senior Data Analyst\nProfessional Summary\nRavi Kumar\n"),
            Some("Ravi Kumar".to_string())
        );
    }

    #[test]
    fn test_education_is_capped_and_unique() {
        let text = "Alpha University\nalpha university\nBeta College\nGamma Institute\nDelta University\n";
        let education = find_institutions(text);
        assert_eq!(
            education,
            vec![
                "Alpha University".to_string(),
                "Beta College".to_string(),
                "Gamma Institute".to_string()
            ]
        );
    }

    #[test]
    fn test_garbage_text_yields_empty_record_fields() {
        let record = parse_fields("%%%% 12 ####");
        assert!(record.name.is_none());
        assert!(record.email.is_none());
        assert!(record.skills.is_empty());
        assert!(record.companies.is_empty());
    }
}
