//! Application settings storage.
//!
//! Settings are free-form JSON values keyed by name. The two keys in use:
//! [`SETTING_ROOMS`] holds the comma-joined room list string and
//! [`SETTING_DOCTORS`] holds the ordered doctor list.

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Database, DbResult};

/// Comma-joined room list, as entered on the settings screen.
pub const SETTING_ROOMS: &str = "rooms";

/// Ordered list of attending doctors.
pub const SETTING_DOCTORS: &str = "doctors";

impl Database {
    /// Save a setting, overwriting any previous value.
    pub fn save_setting<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            r#"
            INSERT INTO app_settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, json],
        )?;
        Ok(())
    }

    /// Get a setting, `None` when the key was never saved.
    pub fn get_setting<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM app_settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(Into::into)
    }

    /// Persist the room list and doctor list together.
    ///
    /// The settings screen saves both with one action; they commit or roll
    /// back as a unit.
    pub fn save_general_settings(&mut self, rooms: &str, doctors: &[String]) -> DbResult<()> {
        let rooms_json = serde_json::to_string(rooms)?;
        let doctors_json = serde_json::to_string(doctors)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO app_settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![SETTING_ROOMS, rooms_json],
        )?;
        tx.execute(
            r#"
            INSERT INTO app_settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![SETTING_DOCTORS, doctors_json],
        )?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_setting_is_none() {
        let db = Database::open_in_memory().unwrap();
        let rooms: Option<String> = db.get_setting(SETTING_ROOMS).unwrap();
        assert_eq!(rooms, None);
    }

    #[test]
    fn test_save_and_get_string() {
        let db = Database::open_in_memory().unwrap();
        db.save_setting(SETTING_ROOMS, &"1, 2, 3".to_string()).unwrap();
        let rooms: Option<String> = db.get_setting(SETTING_ROOMS).unwrap();
        assert_eq!(rooms, Some("1, 2, 3".to_string()));
    }

    #[test]
    fn test_save_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.save_setting(SETTING_ROOMS, &"1".to_string()).unwrap();
        db.save_setting(SETTING_ROOMS, &"2".to_string()).unwrap();
        let rooms: Option<String> = db.get_setting(SETTING_ROOMS).unwrap();
        assert_eq!(rooms, Some("2".to_string()));
    }

    #[test]
    fn test_structured_value() {
        let db = Database::open_in_memory().unwrap();
        let doctors = vec!["Dr. Sato".to_string(), "Dr. Mori".to_string()];
        db.save_setting(SETTING_DOCTORS, &doctors).unwrap();
        let back: Option<Vec<String>> = db.get_setting(SETTING_DOCTORS).unwrap();
        assert_eq!(back, Some(doctors));
    }

    #[test]
    fn test_save_general_settings_saves_both() {
        let mut db = Database::open_in_memory().unwrap();
        let doctors = vec!["Dr. Sato".to_string()];
        db.save_general_settings("1,2,3", &doctors).unwrap();

        let rooms: Option<String> = db.get_setting(SETTING_ROOMS).unwrap();
        let back: Option<Vec<String>> = db.get_setting(SETTING_DOCTORS).unwrap();
        assert_eq!(rooms, Some("1,2,3".to_string()));
        assert_eq!(back, Some(doctors));
    }
}
