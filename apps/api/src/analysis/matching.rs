use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::vocabulary::find_known_skills;
use crate::text::{contains_phrase, normalize_phrase, tokenize};

/// Resume skills compared against the skills a job description asks for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    /// 0.0 to 100.0, one decimal.
    pub match_percentage: f64,
    pub required_skills: BTreeSet<String>,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
}

/// Token and substring based, not semantic: "postgres" does not satisfy
/// "postgresql".
pub fn match_skills(resume_skills: &BTreeSet<String>, job_description: &str) -> MatchResult {
    let required = find_known_skills(job_description);

    let resume: Vec<(String, Vec<String>)> = resume_skills
        .iter()
        .map(|s| (normalize_phrase(s), tokenize(s)))
        .collect();

    let (matched, missing): (BTreeSet<String>, BTreeSet<String>) =
        required.iter().cloned().partition(|skill| {
            let wanted = tokenize(skill);
            resume
                .iter()
                .any(|(phrase, tokens)| phrase == skill || contains_phrase(tokens, &wanted))
        });

    let match_percentage = if required.is_empty() {
        0.0
    } else {
        let raw = matched.len() as f64 / required.len() as f64 * 100.0;
        (raw * 10.0).round() / 10.0
    };

    MatchResult {
        match_percentage,
        required_skills: required,
        matched_skills: matched,
        missing_skills: missing,
    }
}
