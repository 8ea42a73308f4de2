//! Data access layer.
//!
//! # Responsibility
//! - Define source contracts consumed by services (`PersonSource`,
//!   `ProjectSource`, `LocalListStore`).
//! - Keep HTTP and SQL details out of service/view code.
//!
//! # Invariants
//! - Remote reads are single-shot; retry policy belongs to callers.
//! - Missing single records are `Ok(None)`, distinct from transport errors.

pub mod local_list_repo;
pub mod person_repo;
pub mod project_repo;
pub mod remote;
