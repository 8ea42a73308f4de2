//! Environment-driven configuration.
//!
//! # Responsibility
//! - Read backend endpoint/key and local store settings once at startup.
//! - Reject incomplete backend configuration instead of falling back to
//!   baked-in credentials.
//!
//! # Invariants
//! - `BackendConfig::url` never ends with `/`.
//! - `BackendConfig::anon_key` is never empty.

use chrono::NaiveDate;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const DB_PATH_VAR: &str = "FOLIO_DB_PATH";
pub const CAREER_START_VAR: &str = "FOLIO_CAREER_START";

const DEFAULT_DB_FILE_NAME: &str = "folio_local.sqlite3";
const DEFAULT_CAREER_START: (i32, u32, u32) = (2021, 11, 6);

static HTTP_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/?#]+(/[^\s?#]*)?$").expect("static regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidUrl(String),
    InvalidDate { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(var) => write!(
                f,
                "{var} is missing; set both {SUPABASE_URL_VAR} and {SUPABASE_ANON_KEY_VAR} in the environment"
            ),
            Self::InvalidUrl(value) => write!(f, "backend url must be http(s)://..., got `{value}`"),
            Self::InvalidDate { var, value } => {
                write!(f, "{var} must be a YYYY-MM-DD date, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Hosted backend endpoint and public (anon) key.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    url: String,
    anon_key: String,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

impl BackendConfig {
    /// Validates and normalizes explicit values.
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::MissingVar(SUPABASE_URL_VAR));
        }
        if !HTTP_URL.is_match(url) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ConfigError::MissingVar(SUPABASE_ANON_KEY_VAR));
        }
        Ok(Self {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Loads `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env_var(SUPABASE_URL_VAR).ok_or(ConfigError::MissingVar(SUPABASE_URL_VAR))?;
        let key =
            env_var(SUPABASE_ANON_KEY_VAR).ok_or(ConfigError::MissingVar(SUPABASE_ANON_KEY_VAR))?;
        let config = Self::new(&url, &key)?;
        info!("event=config_load module=config status=ok backend={}", config.url);
        Ok(config)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }
}

/// Resolves the local store path from `FOLIO_DB_PATH`, else the temp dir.
pub fn local_db_path() -> PathBuf {
    match env_var(DB_PATH_VAR) {
        Some(path) => PathBuf::from(path),
        None => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
    }
}

/// Resolves the career start date used by the experience counter.
///
/// An unparsable `FOLIO_CAREER_START` is reported rather than ignored.
pub fn career_start() -> Result<NaiveDate, ConfigError> {
    match env_var(CAREER_START_VAR) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
            warn!("event=config_load module=config status=error var={CAREER_START_VAR}");
            ConfigError::InvalidDate {
                var: CAREER_START_VAR,
                value: raw,
            }
        }),
        None => Ok(default_career_start()),
    }
}

pub fn default_career_start() -> NaiveDate {
    let (year, month, day) = DEFAULT_CAREER_START;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
