//! Schema migration tests against on-disk databases.

use wardboard_core::db::SCHEMA_VERSION;
use wardboard_core::Database;

fn user_version(db: &Database) -> i64 {
    db.conn()
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap()
}

fn index_count(db: &Database, names: &[&str]) -> i64 {
    let placeholders = names
        .iter()
        .map(|_| "?")
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name IN ({})",
        placeholders
    );
    db.conn()
        .query_row(&sql, rusqlite::params_from_iter(names.iter()), |row| {
            row.get(0)
        })
        .unwrap()
}

#[test]
fn fresh_database_is_at_current_version() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("ward.db")).unwrap();

    assert_eq!(user_version(&db), SCHEMA_VERSION);
    assert_eq!(
        index_count(
            &db,
            &[
                "idx_past_patients_patient",
                "idx_research_data_patient",
                "idx_research_data_research",
                "idx_current_patients_room",
                "idx_research_data_patient_research",
            ]
        ),
        5
    );
}

#[test]
fn version_1_database_upgrades_cumulatively() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ward.db");

    // Wind a fresh database back to version 1: both later migrations gone
    {
        let db = Database::open(&path).unwrap();
        db.conn()
            .execute_batch(
                "DROP INDEX idx_current_patients_room;
                 DROP INDEX idx_research_data_patient_research;",
            )
            .unwrap();
        db.conn().pragma_update(None, "user_version", 1).unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert_eq!(user_version(&db), SCHEMA_VERSION);
    assert_eq!(
        index_count(
            &db,
            &[
                "idx_current_patients_room",
                "idx_research_data_patient_research"
            ]
        ),
        2
    );
}

#[test]
fn reopening_preserves_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ward.db");

    {
        let db = Database::open(&path).unwrap();
        db.save_setting("rooms", &"1,2,3".to_string()).unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert_eq!(user_version(&db), SCHEMA_VERSION);
    let rooms: Option<String> = db.get_setting("rooms").unwrap();
    assert_eq!(rooms, Some("1,2,3".to_string()));
}
