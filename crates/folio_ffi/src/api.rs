//! FFI use-case API for the portfolio UI shell.
//!
//! # Responsibility
//! - Expose page-level operations (slider, project detail, About counters,
//!   certificates) to the shell via FRB.
//! - Own the process-wide backend client and the mounted slider session.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures come back as envelopes with a human-readable `message`.
//! - A rejected slider request never changes the reported slider state; it
//!   only fills the snapshot's `error`.
//! - Only one slider session is mounted at a time; opening a new one
//!   deactivates the previous one.

use folio_core::config::{career_start, local_db_path};
use folio_core::db::open_db;
use folio_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AboutService, BackendConfig, LocalListStore, PersonId, PersonRecord, PersonSource,
    ProjectDetailSession, ProjectDetailView, ScrollDirection, ShuffledOrder, SliderSession,
    SliderView, SqliteLocalListRepository, SupabaseClient, SupabasePersonSource,
    SupabaseProjectSource,
};
use log::warn;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

static BACKEND: OnceLock<SupabaseClient> = OnceLock::new();
static SLIDER: Mutex<Option<SliderSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Builds the backend client once at shell startup.
///
/// # FFI contract
/// - Returns an empty string on success, an error message otherwise.
/// - A second call with any values is ignored once a client exists.
#[flutter_rust_bridge::frb(sync)]
pub fn init_backend(url: String, anon_key: String) -> String {
    match build_client(BackendConfig::new(&url, &anon_key).map_err(|err| err.to_string())) {
        Ok(client) => {
            if BACKEND.set(client).is_err() {
                warn!("event=backend_init module=ffi status=ignored reason=already_initialized");
            }
            String::new()
        }
        Err(err) => err,
    }
}

/// Person fields for the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonItem {
    pub id: String,
    pub name: String,
    pub role: String,
    pub image_url: String,
    pub impact_description: String,
}

/// One card instance inside a looping column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    /// Stable render key, unique per card instance.
    pub key: String,
    pub person_id: String,
    pub name: String,
    pub role: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnItem {
    pub index: u32,
    /// `true` scrolls upwards, `false` downwards.
    pub scroll_up: bool,
    pub cards: Vec<CardItem>,
}

/// Render snapshot of the people slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderSnapshot {
    /// One of `loading|failed|empty|browsing|detail|closed`.
    pub state: String,
    /// Load failure message when `state == "failed"`, otherwise empty.
    pub message: String,
    pub columns: Vec<ColumnItem>,
    pub selected: Option<PersonItem>,
    /// Why the last request was refused (bad id, selection not allowed,
    /// slider not open); empty when it was applied.
    pub error: String,
}

impl SliderSnapshot {
    fn with_state(state: &str) -> Self {
        Self {
            state: state.to_string(),
            message: String::new(),
            columns: Vec::new(),
            selected: None,
            error: String::new(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::with_state("failed")
        }
    }

    fn rejected(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }
}

/// Mounts the slider and issues the people read.
///
/// # FFI contract
/// - Sync call; returns immediately in `loading` state.
/// - Poll with [`slider_poll`] on each frame until the state changes.
#[flutter_rust_bridge::frb(sync)]
pub fn slider_open() -> SliderSnapshot {
    match backend() {
        Ok(client) => open_slider_with(Arc::new(SupabasePersonSource::new(client))),
        Err(err) => SliderSnapshot::failed(err),
    }
}

/// Returns the current slider view, applying a finished read if any.
#[flutter_rust_bridge::frb(sync)]
pub fn slider_poll() -> SliderSnapshot {
    with_slider(|session| to_snapshot(&session.poll()))
}

/// Selects a person by the `person_id` shown on a card (`Browsing -> Detail`).
///
/// # FFI contract
/// - On refusal the snapshot reflects the unchanged view and `error` says why.
#[flutter_rust_bridge::frb(sync)]
pub fn slider_select(person_id: String) -> SliderSnapshot {
    with_slider(|session| {
        let Some(id) = PersonId::parse(&person_id) else {
            return to_snapshot(&session.slider().view())
                .rejected(format!("invalid person id `{person_id}`"));
        };
        match session.select(&id) {
            Ok(view) => to_snapshot(&view),
            Err(err) => {
                warn!("event=slider_select module=ffi status=rejected error={err}");
                to_snapshot(&session.slider().view())
                    .rejected(format!("slider_select rejected: {err}"))
            }
        }
    })
}

/// Closes the detail view (`Detail -> Browsing`).
#[flutter_rust_bridge::frb(sync)]
pub fn slider_close() -> SliderSnapshot {
    with_slider(|session| to_snapshot(&session.close()))
}

/// Unmounts the slider; a read still in flight is discarded.
#[flutter_rust_bridge::frb(sync)]
pub fn slider_dispose() {
    if let Some(mut session) = lock_slider().take() {
        session.deactivate();
    }
}

/// Project detail envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetailResponse {
    /// One of `not_found|failed|ready`.
    pub state: String,
    pub message: String,
    pub title: String,
    pub description: String,
    pub img: String,
    pub link: Option<String>,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
}

impl ProjectDetailResponse {
    fn without_project(state: &str, message: impl Into<String>) -> Self {
        Self {
            state: state.to_string(),
            message: message.into(),
            title: String::new(),
            description: String::new(),
            img: String::new(),
            link: None,
            features: Vec::new(),
            technologies: Vec::new(),
        }
    }
}

/// Loads one project for the detail page.
///
/// # FFI contract
/// - Async on the Dart side (FRB worker); blocks the worker until resolved.
/// - Never panics.
pub fn project_detail(project_id: String) -> ProjectDetailResponse {
    let client = match backend() {
        Ok(client) => client,
        Err(err) => return ProjectDetailResponse::without_project("failed", err),
    };
    let mut session =
        ProjectDetailSession::open(Arc::new(SupabaseProjectSource::new(client)), &project_id);
    to_project_response(session.wait())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatItem {
    pub label: String,
    pub description: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutStatsResponse {
    pub ok: bool,
    pub message: String,
    pub stats: Vec<StatItem>,
}

/// Computes About page counters from the local store.
#[flutter_rust_bridge::frb(sync)]
pub fn about_stats() -> AboutStatsResponse {
    about_stats_at(&local_db_path())
}

fn about_stats_at(db_path: &Path) -> AboutStatsResponse {
    let result = career_start()
        .map_err(|err| err.to_string())
        .and_then(|start| {
            with_about_service(db_path, |service| service.stats(today(), start))
        });
    match result {
        Ok(stats) => AboutStatsResponse {
            ok: true,
            message: String::new(),
            stats: stats
                .cards()
                .into_iter()
                .map(|card| StatItem {
                    label: card.label.to_string(),
                    description: card.description.to_string(),
                    value: card.value,
                })
                .collect(),
        },
        Err(err) => AboutStatsResponse {
            ok: false,
            message: format!("about_stats failed: {err}"),
            stats: Vec::new(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateItem {
    pub id: i64,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatesResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<CertificateItem>,
}

/// Lists the certificates gallery in stored order.
#[flutter_rust_bridge::frb(sync)]
pub fn certificates_list() -> CertificatesResponse {
    certificates_list_at(&local_db_path())
}

fn certificates_list_at(db_path: &Path) -> CertificatesResponse {
    match with_about_service(db_path, |service| service.certificates()) {
        Ok(certificates) => CertificatesResponse {
            ok: true,
            message: String::new(),
            items: certificates
                .into_iter()
                .map(|certificate| CertificateItem {
                    id: certificate.id,
                    image: certificate.image,
                })
                .collect(),
        },
        Err(err) => CertificatesResponse {
            ok: false,
            message: format!("certificates_list failed: {err}"),
            items: Vec::new(),
        },
    }
}

/// Replaces a local list (`projects`, `certificates`, ...) with a JSON array.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn local_list_write(key: String, json_array: String) -> String {
    let items = match serde_json::from_str::<Vec<serde_json::Value>>(&json_array) {
        Ok(items) => items,
        Err(err) => return format!("local_list_write failed: payload is not a JSON array: {err}"),
    };
    let result = open_db(local_db_path())
        .map_err(|err| format!("local store open failed: {err}"))
        .and_then(|conn| {
            SqliteLocalListRepository::new(&conn)
                .write_list(&key, &items)
                .map_err(|err| err.to_string())
        });
    match result {
        Ok(()) => String::new(),
        Err(err) => format!("local_list_write failed: {err}"),
    }
}

fn backend() -> Result<SupabaseClient, String> {
    if let Some(client) = BACKEND.get() {
        return Ok(client.clone());
    }
    let client = build_client(BackendConfig::from_env().map_err(|err| err.to_string()))?;
    Ok(BACKEND.get_or_init(|| client).clone())
}

fn build_client(config: Result<BackendConfig, String>) -> Result<SupabaseClient, String> {
    SupabaseClient::new(config?).map_err(|err| format!("backend client init failed: {err}"))
}

fn open_slider_with(source: Arc<dyn PersonSource>) -> SliderSnapshot {
    let mut guard = lock_slider();
    if let Some(mut previous) = guard.take() {
        previous.deactivate();
    }
    let session = guard.insert(SliderSession::open(source, ShuffledOrder));
    to_snapshot(&session.poll())
}

fn lock_slider() -> MutexGuard<'static, Option<SliderSession>> {
    // Recover from poisoning; the session holds no half-applied state.
    SLIDER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_slider(f: impl FnOnce(&mut SliderSession) -> SliderSnapshot) -> SliderSnapshot {
    match lock_slider().as_mut() {
        Some(session) => f(session),
        None => SliderSnapshot::with_state("closed").rejected("slider is not open"),
    }
}

fn with_about_service<T>(
    db_path: &Path,
    f: impl FnOnce(&AboutService<SqliteLocalListRepository<'_>>) -> folio_core::RepoResult<T>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("local store open failed: {err}"))?;
    let service = AboutService::new(SqliteLocalListRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn to_person_item(person: &PersonRecord) -> PersonItem {
    PersonItem {
        id: person.id.to_string(),
        name: person.name.clone(),
        role: person.role.clone(),
        image_url: person.image_url.clone(),
        impact_description: person.impact_description.clone(),
    }
}

fn to_snapshot(view: &SliderView) -> SliderSnapshot {
    let mut snapshot = SliderSnapshot::with_state("");
    match view {
        SliderView::Loading => snapshot.state = "loading".to_string(),
        SliderView::Empty => snapshot.state = "empty".to_string(),
        SliderView::Failed { message } => {
            snapshot.state = "failed".to_string();
            snapshot.message = message.clone();
        }
        SliderView::Detail { person } => {
            snapshot.state = "detail".to_string();
            snapshot.selected = Some(to_person_item(person));
        }
        SliderView::Browsing { columns } => {
            snapshot.state = "browsing".to_string();
            snapshot.columns = columns
                .iter()
                .map(|column| ColumnItem {
                    index: u32::try_from(column.index).unwrap_or(u32::MAX),
                    scroll_up: column.direction == ScrollDirection::Up,
                    cards: column
                        .cards
                        .iter()
                        .map(|card| CardItem {
                            key: card.key.clone(),
                            person_id: card.person.id.to_string(),
                            name: card.person.name.clone(),
                            role: card.person.role.clone(),
                            image_url: card.person.image_url.clone(),
                        })
                        .collect(),
                })
                .collect();
        }
    }
    snapshot
}

fn to_project_response(view: ProjectDetailView) -> ProjectDetailResponse {
    match view {
        ProjectDetailView::Ready(project) => ProjectDetailResponse {
            state: "ready".to_string(),
            message: String::new(),
            link: project.live_link().map(str::to_string),
            title: project.title,
            description: project.description,
            img: project.img,
            features: project.features,
            technologies: project.technologies,
        },
        ProjectDetailView::NotFound => {
            ProjectDetailResponse::without_project("not_found", "Project not found.")
        }
        ProjectDetailView::Failed { message } => {
            ProjectDetailResponse::without_project("failed", message)
        }
        // `wait` never returns Loading for a live session.
        ProjectDetailView::Loading => {
            ProjectDetailResponse::without_project("failed", "project read was cancelled")
        }
    }
}
