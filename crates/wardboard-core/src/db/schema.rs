//! SQLite schema and versioned migrations.
//!
//! The schema version lives in SQLite's `user_version` pragma. Migrations
//! apply cumulatively from whatever version is on disk, and every statement
//! is guarded with `IF NOT EXISTS` so reopening a current database is a
//! no-op.

use rusqlite::Connection;
use tracing::info;

use super::DbResult;

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 3;

/// Version 1: the five base tables and their non-unique indexes.
const MIGRATION_V1: &str = r#"
-- ============================================================================
-- Current Patients (one record per occupied room)
-- ============================================================================

CREATE TABLE IF NOT EXISTS current_patients (
    patient_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    sex TEXT NOT NULL,
    doctor TEXT NOT NULL,
    admission_date TEXT NOT NULL,
    room_number TEXT NOT NULL
);

-- ============================================================================
-- Past Patients (append-only discharge history)
-- ============================================================================

CREATE TABLE IF NOT EXISTS past_patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    sex TEXT NOT NULL,
    doctor TEXT NOT NULL,
    admission_date TEXT NOT NULL,
    room_number TEXT NOT NULL,
    discharge_date TEXT NOT NULL
);

-- Repeat stays share a patient_id
CREATE INDEX IF NOT EXISTS idx_past_patients_patient ON past_patients(patient_id);

-- ============================================================================
-- Research Definitions
-- ============================================================================

CREATE TABLE IF NOT EXISTS researches (
    research_id INTEGER PRIMARY KEY AUTOINCREMENT,
    research_name TEXT NOT NULL,
    fields TEXT NOT NULL DEFAULT '[]'            -- JSON array of FieldDef
);

-- ============================================================================
-- Research Data (one value set per patient per research)
-- ============================================================================

CREATE TABLE IF NOT EXISTS research_data (
    data_id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL,
    research_id INTEGER NOT NULL,
    data TEXT NOT NULL DEFAULT '{}'              -- JSON map field name -> value
);

CREATE INDEX IF NOT EXISTS idx_research_data_patient ON research_data(patient_id);
CREATE INDEX IF NOT EXISTS idx_research_data_research ON research_data(research_id);

-- ============================================================================
-- Application Settings
-- ============================================================================

CREATE TABLE IF NOT EXISTS app_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL                          -- JSON-encoded value
);
"#;

/// Version 2: one patient per room.
const MIGRATION_V2: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_current_patients_room
    ON current_patients(room_number);
"#;

/// Version 3: at most one datum per (patient, research) pair.
const MIGRATION_V3: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_research_data_patient_research
    ON research_data(patient_id, research_id);
"#;

/// Apply any missing migrations, cumulatively from the stored version.
pub fn migrate(conn: &Connection) -> DbResult<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version < SCHEMA_VERSION {
        info!(from = version, to = SCHEMA_VERSION, "migrating database schema");
    }

    if version < 1 {
        conn.execute_batch(MIGRATION_V1)?;
    }
    if version < 2 {
        conn.execute_batch(MIGRATION_V2)?;
    }
    if version < 3 {
        conn.execute_batch(MIGRATION_V3)?;
    }

    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn migrated_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_migrate_sets_version() {
        let conn = migrated_conn();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_twice_is_noop() {
        let conn = migrated_conn();
        migrate(&conn).unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_room_index_is_unique() {
        let conn = migrated_conn();
        conn.execute(
            "INSERT INTO current_patients (patient_id, name, age, sex, doctor, admission_date, room_number)
             VALUES ('P1', 'A', 40, 'male', 'Dr. X', '2025-01-01', '3')",
            [],
        )
        .unwrap();

        // Same room, different patient
        let result = conn.execute(
            "INSERT INTO current_patients (patient_id, name, age, sex, doctor, admission_date, room_number)
             VALUES ('P2', 'B', 50, 'female', 'Dr. X', '2025-01-01', '3')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_patient_research_index_is_unique() {
        let conn = migrated_conn();
        conn.execute(
            "INSERT INTO research_data (patient_id, research_id, data) VALUES ('P1', 1, '{}')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO research_data (patient_id, research_id, data) VALUES ('P1', 1, '{}')",
            [],
        );
        assert!(result.is_err());

        // Same patient, different research is fine
        conn.execute(
            "INSERT INTO research_data (patient_id, research_id, data) VALUES ('P1', 2, '{}')",
            [],
        )
        .unwrap();
    }
}
