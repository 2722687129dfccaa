//! Runtime settings from the environment (`.env` supported).
//!
//! CLI flags take precedence; these are the fallbacks.

use std::env;
use std::path::PathBuf;

use crate::domain::YearPolicy;
use crate::error::AppError;

pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding `encoder.json`, `scaler.json`, `model.json`, `metadata.json`.
    pub artifact_dir: PathBuf,
    pub year_policy: YearPolicy,
    /// Log file for TUI sessions; the terminal itself is never logged to there.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            year_policy: YearPolicy::Advisory,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let year_policy = match lookup("SETTLE_YEAR_POLICY").filter(|v| !v.trim().is_empty()) {
            None => defaults.year_policy,
            Some(v) => YearPolicy::parse(&v).ok_or_else(|| {
                AppError::invalid_input(format!(
                    "SETTLE_YEAR_POLICY must be 'advisory' or 'strict', got '{v}'."
                ))
            })?,
        };
        Ok(Self {
            artifact_dir: lookup("SETTLE_ARTIFACT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),
            year_policy,
            log_file: lookup("SETTLE_LOG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}
