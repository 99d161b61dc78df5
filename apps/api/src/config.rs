use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_COMPLETION_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o";
const DEFAULT_RENDER_API_URL: &str = "https://api.pdfmonkey.io/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    /// Base that object keys are appended to when building public transcript URLs.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub completion_api_key: String,
    pub completion_api_url: String,
    pub completion_model: String,
    pub render_api_key: String,
    pub render_api_url: String,
    /// Timeout for transcript fetches, render calls and S3 operations.
    pub http_timeout: Duration,
    pub completion_timeout: Duration,
    pub render_poll_interval: Duration,
    pub render_max_polls: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be exercised without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let s3_bucket = require("S3_BUCKET")?;
        let s3_endpoint = require("S3_ENDPOINT")?;
        let s3_public_url = lookup("S3_PUBLIC_URL")
            .unwrap_or_else(|| format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket));

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            s3_public_url: s3_public_url.trim_end_matches('/').to_string(),
            s3_bucket,
            s3_endpoint,
            s3_region: or_default("S3_REGION", "us-east-1"),
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            completion_api_key: require("OPENAI_API_KEY")?,
            completion_api_url: or_default("COMPLETION_API_URL", DEFAULT_COMPLETION_API_URL),
            completion_model: or_default("COMPLETION_MODEL", DEFAULT_COMPLETION_MODEL),
            render_api_key: require("PDFMONKEY_PRIVATE_KEY")?,
            render_api_url: or_default("RENDER_API_URL", DEFAULT_RENDER_API_URL)
                .trim_end_matches('/')
                .to_string(),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?),
            completion_timeout: Duration::from_secs(parse_or(
                &lookup,
                "COMPLETION_TIMEOUT_SECS",
                120,
            )?),
            render_poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "RENDER_POLL_INTERVAL_MS",
                1000,
            )?),
            render_max_polls: parse_or(&lookup, "RENDER_MAX_POLLS", 30)?,
            port: parse_or(&lookup, "PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
