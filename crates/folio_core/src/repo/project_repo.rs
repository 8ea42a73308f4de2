//! Project data source contract and backend implementation.

use crate::model::project::ProjectRecord;
use crate::repo::remote::{RemoteResult, RowFilter, SupabaseClient};
use log::warn;

pub const PROJECTS_TABLE: &str = "projects";

/// Source of single project records.
pub trait ProjectSource: Send + Sync {
    /// Returns `Ok(None)` when no project has this id.
    fn get_project(&self, id: &str) -> RemoteResult<Option<ProjectRecord>>;
}

#[derive(Debug, Clone)]
pub struct SupabaseProjectSource {
    client: SupabaseClient,
}

impl SupabaseProjectSource {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl ProjectSource for SupabaseProjectSource {
    fn get_project(&self, id: &str) -> RemoteResult<Option<ProjectRecord>> {
        let filter = RowFilter::Eq {
            column: "id",
            value: id.to_string(),
        };
        let mut rows: Vec<ProjectRecord> = self.client.select(PROJECTS_TABLE, &filter)?;
        if rows.len() > 1 {
            warn!(
                "event=project_get module=repo status=ambiguous rows={}",
                rows.len()
            );
        }
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }
}
