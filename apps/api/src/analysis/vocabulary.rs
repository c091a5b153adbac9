//! Built-in skill dictionary. Used both to pull skills out of resume text and to
//! derive the required-skill set of a job description.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;

use crate::text::{contains_phrase, tokenize};

/// Canonical skill names. Generic soft skills (teamwork, communication) are left
/// out so they never count as job requirements.
pub const SKILL_DICTIONARY: &[&str] = &[
    // languages
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "golang",
    "rust",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "scala",
    "matlab",
    "sql",
    "html",
    "css",
    "bash",
    // frameworks
    "react",
    "angular",
    "vue",
    "django",
    "flask",
    "fastapi",
    "spring boot",
    "node.js",
    "next.js",
    "express.js",
    "android",
    "ios",
    "flutter",
    // data and ml
    "machine learning",
    "deep learning",
    "data science",
    "data analysis",
    "statistics",
    "nlp",
    "computer vision",
    "tensorflow",
    "pytorch",
    "scikit-learn",
    "pandas",
    "numpy",
    "spark",
    "hadoop",
    "tableau",
    "power bi",
    "excel",
    // infrastructure
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "jenkins",
    "ci/cd",
    "linux",
    "git",
    "kafka",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    // practices
    "api",
    "rest api",
    "graphql",
    "microservices",
    "agile",
    "scrum",
    // design
    "figma",
    "ui",
    "ux",
];

static DICTIONARY_TOKENS: Lazy<Vec<(&'static str, Vec<String>)>> = Lazy::new(|| {
    SKILL_DICTIONARY
        .iter()
        .map(|skill| (*skill, tokenize(skill)))
        .collect()
});

/// Dictionary skills that appear in `text` as whole-token phrases.
pub fn find_known_skills(text: &str) -> BTreeSet<String> {
    let tokens = tokenize(text);
    DICTIONARY_TOKENS
        .iter()
        .filter(|(_, phrase)| contains_phrase(&tokens, phrase))
        .map(|(skill, _)| skill.to_string())
        .collect()
}
