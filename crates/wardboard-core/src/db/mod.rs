//! Database layer for wardboard.

mod patients;
mod research;
mod schema;
mod settings;

pub use schema::SCHEMA_VERSION;
pub use settings::{SETTING_DOCTORS, SETTING_ROOMS};

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
///
/// Owned by the application for its whole lifetime; screens receive a
/// reference instead of going through a global handle. Opening runs any
/// pending schema migrations, so a handle that exists is always ready.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating and migrating as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        schema::migrate(&db.conn)?;
        debug!("database opened");
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        schema::migrate(&db.conn)?;
        Ok(db)
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"current_patients".to_string()));
        assert!(tables.contains(&"past_patients".to_string()));
        assert!(tables.contains(&"researches".to_string()));
        assert!(tables.contains(&"research_data".to_string()));
        assert!(tables.contains(&"app_settings".to_string()));
    }
}
