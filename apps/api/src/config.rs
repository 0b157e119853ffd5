use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::resume::ExtractionLimits;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a number is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// `None` disables AI analysis; every upload uses the heuristic extractors.
    pub anthropic_api_key: Option<String>,
    pub ai_timeout: Duration,
    pub max_upload_bytes: usize,
    pub limits: ExtractionLimits,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = ExtractionLimits::default();

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: optional_env("DB_MAX_CONNECTIONS", 10)?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            ai_timeout: Duration::from_secs(optional_env("AI_TIMEOUT_SECS", 45)?),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            limits: ExtractionLimits {
                max_skills: optional_env("MAX_SKILLS", defaults.max_skills)?,
                max_experience: optional_env("MAX_EXPERIENCE", defaults.max_experience)?,
                max_education: optional_env("MAX_EDUCATION", defaults.max_education)?,
                max_certifications: optional_env("MAX_CERTIFICATIONS", defaults.max_certifications)?,
            },
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_or(key, std::env::var(key).ok(), default)
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} must be a valid number, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default_when_unset_or_blank() {
        assert_eq!(parse_or::<u16>("PORT", None, 8080).unwrap(), 8080);
        assert_eq!(parse_or::<u16>("PORT", Some("  ".into()), 8080).unwrap(), 8080);
    }

    #[test]
    fn test_parse_or_reads_value() {
        assert_eq!(parse_or::<usize>("MAX_SKILLS", Some(" 30 ".into()), 20).unwrap(), 30);
    }

    #[test]
    fn test_parse_or_names_the_variable_on_error() {
        let err = parse_or::<u64>("AI_TIMEOUT_SECS", Some("soon".into()), 45).unwrap_err();
        assert!(err.to_string().contains("AI_TIMEOUT_SECS"));
    }
}
