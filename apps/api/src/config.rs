use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::experience::OverlapPolicy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_mb: usize,
    pub overlap_policy: OverlapPolicy,
    /// Replaces the embedded course catalog when set.
    pub course_catalog_path: Option<PathBuf>,
    /// Geolocation is disabled unless a lookup service is configured.
    pub geolocation_url: Option<String>,
    pub geolocation_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_mb: 10,
            overlap_policy: OverlapPolicy::default(),
            course_catalog_path: None,
            geolocation_url: None,
            geolocation_timeout_ms: 1500,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        Ok(Config {
            port: parse_or(var("PORT"), defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_mb: parse_or(var("MAX_UPLOAD_MB"), defaults.max_upload_mb)
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?,
            overlap_policy: parse_or(var("EXPERIENCE_OVERLAP_POLICY"), defaults.overlap_policy)
                .context("EXPERIENCE_OVERLAP_POLICY must be 'merge' or 'additive'")?,
            course_catalog_path: var("COURSE_CATALOG_PATH").map(PathBuf::from),
            geolocation_url: var("GEOLOCATION_URL"),
            geolocation_timeout_ms: parse_or(
                var("GEOLOCATION_TIMEOUT_MS"),
                defaults.geolocation_timeout_ms,
            )
            .context("GEOLOCATION_TIMEOUT_MS must be a number of milliseconds")?,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn parse_or<T>(raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => Ok(raw.parse::<T>()?),
        None => Ok(default),
    }
}
