//! Core of the portfolio site.
//!
//! The UI shell (markup, animation, routing) lives elsewhere; this crate owns
//! data access, the people slider model, project detail state, and the About
//! page counters.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{BackendConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::certificate::Certificate;
pub use model::person::{PersonId, PersonRecord};
pub use model::project::ProjectRecord;
pub use repo::local_list_repo::{
    LocalListStore, RepoError, RepoResult, SqliteLocalListRepository, CERTIFICATES_KEY,
    PROJECTS_KEY,
};
pub use repo::person_repo::{PersonSource, SupabasePersonSource};
pub use repo::project_repo::{ProjectSource, SupabaseProjectSource};
pub use repo::remote::{RemoteError, RemoteResult, SupabaseClient};
pub use service::about_service::{AboutService, AboutStats, StatCard};
pub use service::fetch::{Activation, CancelToken, FetchState};
pub use service::partition::{
    partition, rotate, BaseOrder, NaturalOrder, SeededOrder, ShuffledOrder, DEFAULT_COLUMN_COUNT,
};
pub use service::project_service::{ProjectDetailSession, ProjectDetailView};
pub use service::slider::{
    Card, ColumnStrip, ScrollDirection, Selection, Slider, SliderError, SliderSession, SliderView,
};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
