use folio_core::{
    ProjectDetailSession, ProjectDetailView, ProjectRecord, ProjectSource, RemoteError,
    RemoteResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct FakeProjects {
    rows: HashMap<String, ProjectRecord>,
    reads: AtomicUsize,
}

impl ProjectSource for FakeProjects {
    fn get_project(&self, id: &str) -> RemoteResult<Option<ProjectRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if id == "500" {
            return Err(RemoteError::Status {
                code: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.rows.get(id).cloned())
    }
}

fn source() -> Arc<FakeProjects> {
    let project: ProjectRecord = serde_json::from_value(serde_json::json!({
        "id": 1,
        "Title": "Folio",
        "Description": "Personal site",
        "Img": "folio.png",
        "Link": "https://example.com",
        "features": ["Slider"],
        "technologies": ["Rust"]
    }))
    .unwrap();
    Arc::new(FakeProjects {
        rows: HashMap::from([("1".to_string(), project)]),
        reads: AtomicUsize::new(0),
    })
}

#[test]
fn existing_project_is_ready() {
    let mut session = ProjectDetailSession::open(source(), "1");
    match session.wait() {
        ProjectDetailView::Ready(project) => {
            assert_eq!(project.title, "Folio");
            assert_eq!(project.live_link(), Some("https://example.com"));
            assert!(project.has_features());
        }
        other => panic!("expected ready, got {other:?}"),
    }
}

#[test]
fn missing_project_is_not_found() {
    let mut session = ProjectDetailSession::open(source(), "77");
    let view = session.wait();
    assert_eq!(view, ProjectDetailView::NotFound);
    assert_eq!(view.message(), Some("Project not found."));
}

#[test]
fn backend_error_is_distinct_from_not_found() {
    let mut session = ProjectDetailSession::open(source(), "500");
    match session.wait() {
        ProjectDetailView::Failed { message } => assert!(message.contains("Failed to load")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn empty_id_skips_the_backend() {
    let projects = source();
    let mut session = ProjectDetailSession::open(projects.clone(), "  ");
    assert_eq!(session.poll(), ProjectDetailView::NotFound);
    assert_eq!(projects.reads.load(Ordering::SeqCst), 0);
}
