//! Project detail view state.
//!
//! # Invariants
//! - A missing project is `NotFound`, never conflated with a failed read.
//! - An empty id resolves to `NotFound` without touching the backend.

use crate::model::project::ProjectRecord;
use crate::repo::project_repo::ProjectSource;
use crate::service::fetch::{Activation, FetchState};
use log::error;
use std::sync::Arc;

pub const PROJECT_NOT_FOUND_MESSAGE: &str = "Project not found.";
pub const PROJECT_LOAD_FAILED_MESSAGE: &str = "Failed to load project.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectDetailView {
    Loading,
    NotFound,
    Failed { message: String },
    Ready(ProjectRecord),
}

impl ProjectDetailView {
    /// Inline message for non-ready states.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Loading => Some("Loading project..."),
            Self::NotFound => Some(PROJECT_NOT_FOUND_MESSAGE),
            Self::Failed { message } => Some(message),
            Self::Ready(_) => None,
        }
    }
}

/// One project detail page for one route id.
pub struct ProjectDetailSession {
    activation: Activation<Option<ProjectRecord>>,
}

impl ProjectDetailSession {
    pub fn open(source: Arc<dyn ProjectSource>, id: &str) -> Self {
        let id = id.trim().to_string();
        let activation = if id.is_empty() {
            Activation::resolved("projects", Ok(None))
        } else {
            Activation::spawn("projects", move |_| {
                source.get_project(&id).map_err(|err| {
                    error!("event=project_load module=project status=error error={err}");
                    PROJECT_LOAD_FAILED_MESSAGE.to_string()
                })
            })
        };
        Self { activation }
    }

    pub fn poll(&mut self) -> ProjectDetailView {
        to_view(self.activation.poll())
    }

    pub fn wait(&mut self) -> ProjectDetailView {
        to_view(self.activation.wait())
    }

    pub fn deactivate(&mut self) {
        self.activation.deactivate();
    }
}

fn to_view(state: &FetchState<Option<ProjectRecord>>) -> ProjectDetailView {
    match state {
        FetchState::Loading => ProjectDetailView::Loading,
        FetchState::Failed(message) => ProjectDetailView::Failed {
            message: message.clone(),
        },
        FetchState::Ready(None) => ProjectDetailView::NotFound,
        FetchState::Ready(Some(project)) => ProjectDetailView::Ready(project.clone()),
    }
}
