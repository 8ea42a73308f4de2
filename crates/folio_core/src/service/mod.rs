//! Use-case services behind the UI shell.
//!
//! # Responsibility
//! - Turn repository reads into view state the shell renders directly.
//! - Keep fetch lifecycles (activation, cancellation) out of the shell.

pub mod about_service;
pub mod fetch;
pub mod partition;
pub mod project_service;
pub mod slider;
