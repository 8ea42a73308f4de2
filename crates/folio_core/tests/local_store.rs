use chrono::NaiveDate;
use folio_core::db::migrations::latest_version;
use folio_core::db::{open_db, open_db_in_memory, DbError};
use folio_core::{
    AboutService, Certificate, LocalListStore, RepoError, SqliteLocalListRepository,
    CERTIFICATES_KEY, PROJECTS_KEY,
};
use rusqlite::Connection;
use serde_json::json;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'local_lists');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn reopening_file_store_keeps_lists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteLocalListRepository::new(&conn);
        repo.write_list(PROJECTS_KEY, &[json!({"id": 1}), json!({"id": 2})])
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteLocalListRepository::new(&conn);
    assert_eq!(repo.list_len(PROJECTS_KEY).unwrap(), 2);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_list_reads_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLocalListRepository::new(&conn);
    assert!(repo.read_list(CERTIFICATES_KEY).unwrap().is_empty());
    assert_eq!(repo.list_len(PROJECTS_KEY).unwrap(), 0);
}

#[test]
fn write_list_replaces_previous_payload() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLocalListRepository::new(&conn);
    repo.write_list("projects", &[json!(1), json!(2), json!(3)])
        .unwrap();
    repo.write_list("projects", &[json!("only")]).unwrap();
    assert_eq!(repo.read_list("projects").unwrap(), vec![json!("only")]);
}

#[test]
fn malformed_payload_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO local_lists (key, payload) VALUES ('projects', '{\"not\":\"a list\"}');",
        [],
    )
    .unwrap();
    let repo = SqliteLocalListRepository::new(&conn);
    assert!(matches!(
        repo.list_len(PROJECTS_KEY),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn invalid_key_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLocalListRepository::new(&conn);
    assert!(matches!(
        repo.read_list("Robert'); DROP TABLE local_lists;--"),
        Err(RepoError::InvalidKey(_))
    ));
}

#[test]
fn about_stats_count_lists_and_years() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLocalListRepository::new(&conn);
    repo.write_list(PROJECTS_KEY, &[json!({}), json!({}), json!({})])
        .unwrap();
    let service = AboutService::new(repo);
    service
        .save_certificates(&[
            Certificate {
                id: 1,
                image: "cert-1.png".to_string(),
            },
            Certificate {
                id: 2,
                image: "cert-2.jpg".to_string(),
            },
        ])
        .unwrap();

    let stats = service
        .stats(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            NaiveDate::from_ymd_opt(2021, 11, 6).unwrap(),
        )
        .unwrap();
    assert_eq!(stats.total_projects, 3);
    assert_eq!(stats.total_certificates, 2);
    assert_eq!(stats.years_experience, 4);

    let cards = stats.cards();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0].label, "Total Projects");
    assert_eq!(cards[2].value, 4);
}

#[test]
fn certificates_keep_stored_order() {
    let conn = open_db_in_memory().unwrap();
    let service = AboutService::new(SqliteLocalListRepository::new(&conn));
    let gallery = vec![
        Certificate {
            id: 9,
            image: "b.png".to_string(),
        },
        Certificate {
            id: 3,
            image: "a.png".to_string(),
        },
    ];
    service.save_certificates(&gallery).unwrap();
    assert_eq!(service.certificates().unwrap(), gallery);
}

#[test]
fn undecodable_certificate_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLocalListRepository::new(&conn);
    repo.write_list(CERTIFICATES_KEY, &[json!({"id": "x"})])
        .unwrap();
    let service = AboutService::new(repo);
    assert!(matches!(
        service.certificates(),
        Err(RepoError::InvalidData(_))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
