//! Domain model for the portfolio core.
//!
//! # Responsibility
//! - Define the records fetched from the hosted backend and the local store.
//! - Keep boundary field naming (`image_url`, `Title`, ...) at the serde layer.
//!
//! # Invariants
//! - Every person is identified by a stable `PersonId`.
//! - Records are read-only once fetched; views derive from them, never mutate.

pub mod certificate;
pub mod person;
pub mod project;

use serde::{Deserialize, Deserializer};

/// Reads an explicit JSON `null` as the type's default.
///
/// PostgREST sends every column, so nullable columns arrive as `null`
/// rather than missing; pair with `#[serde(default)]` for absent keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
