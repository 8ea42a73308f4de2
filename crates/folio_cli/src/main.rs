//! CLI smoke/ops entry point.
//!
//! # Responsibility
//! - Verify `folio_core` wiring without the UI shell.
//! - Inspect live backend data and seed the local store.
//!
//! Commands: `ping` (default), `people [columns]`, `project <id>`, `stats`,
//! `certificates`, `seed-list <key> <json-array>`.

use folio_core::config::{career_start, local_db_path};
use folio_core::db::open_db;
use folio_core::{
    AboutService, BackendConfig, LocalListStore, ProjectDetailSession, ProjectDetailView,
    ShuffledOrder, SliderSession, SliderView, SqliteLocalListRepository, SupabaseClient,
    SupabasePersonSource, SupabaseProjectSource, DEFAULT_COLUMN_COUNT,
};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let result = match args.first().map(String::as_str) {
        None | Some("ping") => {
            println!("folio_core ping={}", folio_core::ping());
            println!("folio_core version={}", folio_core::core_version());
            Ok(())
        }
        Some("people") => people(args.get(1).map(String::as_str)),
        Some("project") => project(args.get(1).map(String::as_str).unwrap_or_default()),
        Some("stats") => stats(),
        Some("certificates") => certificates(),
        Some("seed-list") => match (args.get(1), args.get(2)) {
            (Some(key), Some(json)) => seed_list(key, json),
            _ => Err("usage: folio seed-list <key> <json-array>".to_string()),
        },
        Some(other) => Err(format!(
            "unknown command `{other}`; expected ping|people|project|stats|certificates|seed-list"
        )),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn client() -> Result<SupabaseClient, String> {
    let config = BackendConfig::from_env().map_err(|err| err.to_string())?;
    SupabaseClient::new(config).map_err(|err| err.to_string())
}

fn people(columns: Option<&str>) -> Result<(), String> {
    let column_count = match columns {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| format!("column count must be a number, got `{raw}`"))?,
        None => DEFAULT_COLUMN_COUNT,
    };
    let source = Arc::new(SupabasePersonSource::new(client()?));
    let mut session = SliderSession::open(source, ShuffledOrder).with_column_count(column_count);

    match session.wait() {
        SliderView::Failed { message } => Err(message),
        SliderView::Empty => {
            println!("no people stored");
            Ok(())
        }
        SliderView::Browsing { columns } => {
            for column in columns {
                let names = column.cards[..column.cards.len() / 2]
                    .iter()
                    .map(|card| card.person.name.as_str())
                    .collect::<Vec<_>>();
                println!("column {} ({:?}): {}", column.index, column.direction, names.join(", "));
            }
            Ok(())
        }
        other => Err(format!("unexpected slider state: {other:?}")),
    }
}

fn project(id: &str) -> Result<(), String> {
    let source = Arc::new(SupabaseProjectSource::new(client()?));
    match ProjectDetailSession::open(source, id).wait() {
        ProjectDetailView::Ready(project) => {
            println!("{}", project.title);
            println!("{}", project.description);
            if project.has_features() {
                println!("features: {}", project.features.join(", "));
            }
            if project.has_technologies() {
                println!("technologies: {}", project.technologies.join(", "));
            }
            if let Some(link) = project.live_link() {
                println!("live: {link}");
            }
            Ok(())
        }
        view => Err(view.message().unwrap_or("unknown state").to_string()),
    }
}

fn stats() -> Result<(), String> {
    let start = career_start().map_err(|err| err.to_string())?;
    let conn = open_db(local_db_path()).map_err(|err| err.to_string())?;
    let service = AboutService::new(SqliteLocalListRepository::new(&conn));
    let stats = service
        .stats(chrono_today(), start)
        .map_err(|err| err.to_string())?;
    for card in stats.cards() {
        println!("{}: {} ({})", card.label, card.value, card.description);
    }
    Ok(())
}

fn certificates() -> Result<(), String> {
    let conn = open_db(local_db_path()).map_err(|err| err.to_string())?;
    let service = AboutService::new(SqliteLocalListRepository::new(&conn));
    for certificate in service.certificates().map_err(|err| err.to_string())? {
        println!("{} {}", certificate.id, certificate.image);
    }
    Ok(())
}

fn seed_list(key: &str, json: &str) -> Result<(), String> {
    let items = serde_json::from_str::<Vec<serde_json::Value>>(json)
        .map_err(|err| format!("payload is not a JSON array: {err}"))?;
    let conn = open_db(local_db_path()).map_err(|err| err.to_string())?;
    SqliteLocalListRepository::new(&conn)
        .write_list(key, &items)
        .map_err(|err| err.to_string())?;
    println!("stored {} item(s) under `{key}`", items.len());
    Ok(())
}

fn chrono_today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
