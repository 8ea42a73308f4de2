//! Hosted backend (Supabase PostgREST) client.
//!
//! # Responsibility
//! - Build one blocking HTTP client from `BackendConfig` and share it.
//! - Issue table reads and decode JSON row arrays.
//!
//! # Invariants
//! - Every request carries `apikey` and bearer authorization headers.
//! - Non-2xx responses are errors; they are never decoded as rows.
//! - No retry: one call issues exactly one request.

use crate::config::BackendConfig;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const USER_AGENT: &str = concat!("folio-core/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 200;

static TABLE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid table name regex"));

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote read failure.
#[derive(Debug)]
pub enum RemoteError {
    InvalidTable(String),
    InvalidUrl(String),
    Transport(reqwest::Error),
    Status { code: u16, body: String },
    Decode(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTable(name) => write!(f, "invalid table name `{name}`"),
            Self::InvalidUrl(message) => write!(f, "invalid request url: {message}"),
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::Status { code, body } => write!(f, "backend returned status {code}: {body}"),
            Self::Decode(message) => write!(f, "failed to decode rows: {message}"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Filter applied to one table read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// All rows ordered ascending by `column`.
    OrderedBy(&'static str),
    /// Rows where `column` equals `value`.
    Eq { column: &'static str, value: String },
}

/// Shared PostgREST client; cheap to clone.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    config: BackendConfig,
}

impl SupabaseClient {
    /// Builds the HTTP client once for the process.
    pub fn new(config: BackendConfig) -> RemoteResult<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Builds the REST url for `table` with `filter`.
    pub fn table_url(&self, table: &str, filter: &RowFilter) -> RemoteResult<Url> {
        if !TABLE_NAME_RE.is_match(table) {
            return Err(RemoteError::InvalidTable(table.to_string()));
        }
        let base = format!("{}/rest/v1/{table}", self.config.url());
        let (key, value) = match filter {
            RowFilter::OrderedBy(column) => ("order", format!("{column}.asc")),
            RowFilter::Eq { column, value } => (*column, format!("eq.{value}")),
        };
        Url::parse_with_params(&base, &[("select", "*"), (key, value.as_str())])
            .map_err(|err| RemoteError::InvalidUrl(err.to_string()))
    }

    /// Reads rows of `table` matching `filter`.
    pub fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filter: &RowFilter,
    ) -> RemoteResult<Vec<T>> {
        let url = self.table_url(table, filter)?;
        let started_at = Instant::now();
        debug!("event=remote_select module=remote status=start table={table}");

        let response = self
            .http
            .get(url)
            .header("apikey", self.config.anon_key())
            .bearer_auth(self.config.anon_key())
            .send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            warn!(
                "event=remote_select module=remote status=error table={table} http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(RemoteError::Status {
                code: status.as_u16(),
                body: crate::logging::sanitize_message(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let rows = decode_rows::<T>(&body)?;
        debug!(
            "event=remote_select module=remote status=ok table={table} rows={} duration_ms={}",
            rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(rows)
    }
}

/// Decodes a PostgREST JSON array body; `null` reads as no rows.
pub fn decode_rows<T: DeserializeOwned>(body: &str) -> RemoteResult<Vec<T>> {
    serde_json::from_str::<Option<Vec<T>>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|err| RemoteError::Decode(err.to_string()))
}
