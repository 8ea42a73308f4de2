//! Person data source contract and backend implementation.
//!
//! # Invariants
//! - `list_persons` returns rows ordered ascending by `id`.
//! - An empty list is a successful read, not an error.

use crate::model::person::PersonRecord;
use crate::repo::remote::{RemoteResult, RowFilter, SupabaseClient};

pub const PEOPLE_TABLE: &str = "impactful_people";

/// Source of the impactful-people list.
///
/// Implementations are shared with background fetch workers, hence the
/// `Send + Sync` bound.
pub trait PersonSource: Send + Sync {
    fn list_persons(&self) -> RemoteResult<Vec<PersonRecord>>;
}

/// Reads people from the hosted backend.
#[derive(Debug, Clone)]
pub struct SupabasePersonSource {
    client: SupabaseClient,
    table: String,
}

impl SupabasePersonSource {
    pub fn new(client: SupabaseClient) -> Self {
        Self::with_table(client, PEOPLE_TABLE)
    }

    pub fn with_table(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl PersonSource for SupabasePersonSource {
    fn list_persons(&self) -> RemoteResult<Vec<PersonRecord>> {
        self.client.select(&self.table, &RowFilter::OrderedBy("id"))
    }
}
