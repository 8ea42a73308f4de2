//! Impactful person record.
//!
//! # Responsibility
//! - Define the canonical row shape of the `impactful_people` collection.
//! - Provide a stable identity usable as an ordering and render key.
//!
//! # Invariants
//! - `id` is stable and unique within one fetched list.
//! - Decoding is lenient for text fields: a missing or `null` column reads
//!   as empty.

use crate::model::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier of a person row.
///
/// The backend may key rows by integer or by text; both shapes are accepted
/// and kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonId {
    Int(i64),
    Text(String),
}

impl PersonId {
    /// Parses user input (FFI/CLI) into an id, preferring the integer shape.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<i64>() {
            Ok(value) => Self::Int(value),
            Err(_) => Self::Text(trimmed.to_string()),
        })
    }

    /// Whether `self` and `other` render the same, e.g. `Int(42)` and
    /// `Text("42")`.
    /// Parsed shell input may differ in shape from the stored id.
    pub fn same_rendering(&self, other: &PersonId) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for PersonId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One mentor/guide shown in the people slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    /// External image reference, rendered as-is.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    /// Free text shown only in the detail view.
    #[serde(default, deserialize_with = "null_as_default")]
    pub impact_description: String,
}

impl PersonRecord {
    /// Creates a record with empty role/image/description.
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: String::new(),
            image_url: String::new(),
            impact_description: String::new(),
        }
    }
}
