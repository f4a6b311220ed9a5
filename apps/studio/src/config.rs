use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:5173/";
const DEFAULT_READY_TIMEOUT_MS: u64 = 5000;

/// Application configuration loaded from environment variables.
/// Every variable is optional; `Config::default()` holds the fallbacks.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the exported PDF is delivered to.
    pub output_dir: PathBuf,
    pub file_name: String,
    /// Base for resolving relative links in the preview.
    pub base_url: Url,
    /// Root for offscreen surfaces; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
    /// Bound on the readiness barrier before typesetting.
    pub ready_timeout: Duration,
    /// JSON list of edits applied to the sample session at startup.
    pub edits_file: Option<PathBuf>,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from("."),
            file_name: "resume.pdf".to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            scratch_dir: None,
            ready_timeout: Duration::from_millis(DEFAULT_READY_TIMEOUT_MS),
            edits_file: None,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let base_url = optional_env("RESUME_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let ready_timeout_ms = match optional_env("RESUME_READY_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("RESUME_READY_TIMEOUT_MS must be a whole number of milliseconds")?,
            None => DEFAULT_READY_TIMEOUT_MS,
        };

        Ok(Config {
            output_dir: optional_env("RESUME_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            file_name: optional_env("RESUME_FILE_NAME").unwrap_or_else(|| "resume.pdf".into()),
            base_url: Url::parse(&base_url)
                .with_context(|| format!("RESUME_BASE_URL '{base_url}' is not a valid URL"))?,
            scratch_dir: optional_env("RESUME_SCRATCH_DIR").map(PathBuf::from),
            ready_timeout: Duration::from_millis(ready_timeout_ms),
            edits_file: optional_env("RESUME_EDITS_FILE").map(PathBuf::from),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Value of `key`, treating unset and blank alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.file_name, "resume.pdf");
        assert_eq!(config.base_url.as_str(), "http://localhost:5173/");
        assert_eq!(config.ready_timeout, Duration::from_millis(5000));
        assert!(config.scratch_dir.is_none());
        assert!(config.edits_file.is_none());
    }

    #[test]
    fn test_from_env_reads_overrides() {
        // Keys unique to this test so parallel tests do not interfere.
        std::env::set_var("RESUME_FILE_NAME", "ada.pdf");
        std::env::set_var("RESUME_READY_TIMEOUT_MS", "250");
        std::env::set_var("RESUME_EDITS_FILE", " edits.json ");
        let config = Config::from_env().unwrap();
        std::env::remove_var("RESUME_FILE_NAME");
        std::env::remove_var("RESUME_READY_TIMEOUT_MS");
        std::env::remove_var("RESUME_EDITS_FILE");

        assert_eq!(config.file_name, "ada.pdf");
        assert_eq!(config.ready_timeout, Duration::from_millis(250));
        assert_eq!(config.edits_file, Some(PathBuf::from("edits.json")));
    }
}
