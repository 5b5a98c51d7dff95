//! Patient database operations.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{Database, DbError, DbResult};
use crate::models::{CurrentPatient, PastPatient, Sex};

impl Database {
    /// Admit a patient.
    ///
    /// Fails with the underlying constraint error when the patient id is
    /// already admitted or the room is already occupied.
    pub fn admit_patient(&self, patient: &CurrentPatient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO current_patients (
                patient_id, name, age, sex, doctor, admission_date, room_number
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                patient.patient_id,
                patient.name,
                patient.age,
                patient.sex.as_str(),
                patient.doctor,
                patient.admission_date,
                patient.room_number,
            ],
        )?;
        Ok(())
    }

    /// Insert-or-replace a patient record, keyed on patient id.
    ///
    /// Used for room transfers: the patient keeps their id and gains a new
    /// room. Moving onto an occupied room still trips the unique room index.
    pub fn update_patient(&self, patient: &CurrentPatient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO current_patients (
                patient_id, name, age, sex, doctor, admission_date, room_number
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(patient_id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                sex = excluded.sex,
                doctor = excluded.doctor,
                admission_date = excluded.admission_date,
                room_number = excluded.room_number
            "#,
            params![
                patient.patient_id,
                patient.name,
                patient.age,
                patient.sex.as_str(),
                patient.doctor,
                patient.admission_date,
                patient.room_number,
            ],
        )?;
        Ok(())
    }

    /// Get a current patient by id.
    pub fn get_current_patient(&self, patient_id: &str) -> DbResult<Option<CurrentPatient>> {
        self.conn
            .query_row(
                r#"
                SELECT patient_id, name, age, sex, doctor, admission_date, room_number
                FROM current_patients
                WHERE patient_id = ?
                "#,
                [patient_id],
                map_current_row,
            )
            .optional()?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Get the patient occupying a room; `None` means the room is vacant.
    pub fn get_patient_by_room(&self, room_number: &str) -> DbResult<Option<CurrentPatient>> {
        self.conn
            .query_row(
                r#"
                SELECT patient_id, name, age, sex, doctor, admission_date, room_number
                FROM current_patients
                WHERE room_number = ?
                "#,
                [room_number],
                map_current_row,
            )
            .optional()?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Discharge a patient: copy the stay into past patients and free the
    /// room. The copy and the delete commit or roll back together.
    pub fn discharge_patient(&mut self, patient_id: &str) -> DbResult<()> {
        let tx = self.conn.transaction()?;

        let row = tx
            .query_row(
                r#"
                SELECT patient_id, name, age, sex, doctor, admission_date, room_number
                FROM current_patients
                WHERE patient_id = ?
                "#,
                [patient_id],
                map_current_row,
            )
            .optional()?;
        let patient: CurrentPatient = match row {
            Some(row) => row.try_into()?,
            None => return Err(DbError::NotFound(format!("patient {}", patient_id))),
        };

        let discharge_date = chrono::Utc::now().date_naive().to_string();
        tx.execute(
            r#"
            INSERT INTO past_patients (
                patient_id, name, age, sex, doctor, admission_date, room_number, discharge_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                patient.patient_id,
                patient.name,
                patient.age,
                patient.sex.as_str(),
                patient.doctor,
                patient.admission_date,
                patient.room_number,
                discharge_date,
            ],
        )?;
        tx.execute(
            "DELETE FROM current_patients WHERE patient_id = ?",
            [patient_id],
        )?;
        tx.commit()?;

        debug!(patient_id, "patient discharged");
        Ok(())
    }

    /// All completed stays for a patient, oldest first.
    pub fn past_stays(&self, patient_id: &str) -> DbResult<Vec<PastPatient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, name, age, sex, doctor, admission_date, room_number, discharge_date
            FROM past_patients
            WHERE patient_id = ?
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([patient_id], |row| {
            Ok(PastRow {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                name: row.get(2)?,
                age: row.get(3)?,
                sex: row.get(4)?,
                doctor: row.get(5)?,
                admission_date: row.get(6)?,
                room_number: row.get(7)?,
                discharge_date: row.get(8)?,
            })
        })?;

        let mut stays = Vec::new();
        for row in rows {
            stays.push(row?.try_into()?);
        }
        Ok(stays)
    }
}

/// Intermediate row struct for database mapping.
struct CurrentRow {
    patient_id: String,
    name: String,
    age: i64,
    sex: String,
    doctor: String,
    admission_date: String,
    room_number: String,
}

fn map_current_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CurrentRow> {
    Ok(CurrentRow {
        patient_id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        sex: row.get(3)?,
        doctor: row.get(4)?,
        admission_date: row.get(5)?,
        room_number: row.get(6)?,
    })
}

impl TryFrom<CurrentRow> for CurrentPatient {
    type Error = DbError;

    fn try_from(row: CurrentRow) -> Result<Self, Self::Error> {
        Ok(CurrentPatient {
            patient_id: row.patient_id,
            name: row.name,
            age: row.age as u32,
            sex: parse_sex(&row.sex)?,
            doctor: row.doctor,
            admission_date: row.admission_date,
            room_number: row.room_number,
        })
    }
}

struct PastRow {
    id: i64,
    patient_id: String,
    name: String,
    age: i64,
    sex: String,
    doctor: String,
    admission_date: String,
    room_number: String,
    discharge_date: String,
}

impl TryFrom<PastRow> for PastPatient {
    type Error = DbError;

    fn try_from(row: PastRow) -> Result<Self, Self::Error> {
        Ok(PastPatient {
            id: row.id,
            patient_id: row.patient_id,
            name: row.name,
            age: row.age as u32,
            sex: parse_sex(&row.sex)?,
            doctor: row.doctor,
            admission_date: row.admission_date,
            room_number: row.room_number,
            discharge_date: row.discharge_date,
        })
    }
}

fn parse_sex(s: &str) -> Result<Sex, DbError> {
    Sex::from_str(s).ok_or_else(|| DbError::Constraint(format!("Unknown sex value: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn sample_patient(patient_id: &str, room_number: &str) -> CurrentPatient {
        CurrentPatient {
            patient_id: patient_id.into(),
            name: "Tanaka Hana".into(),
            age: 67,
            sex: Sex::Female,
            doctor: "Dr. Sato".into(),
            admission_date: "2025-02-10".into(),
            room_number: room_number.into(),
        }
    }

    #[test]
    fn test_admit_and_get_by_room() {
        let db = setup_db();
        let patient = sample_patient("P1", "3");
        db.admit_patient(&patient).unwrap();

        let by_room = db.get_patient_by_room("3").unwrap().unwrap();
        assert_eq!(by_room, patient);

        let by_id = db.get_current_patient("P1").unwrap().unwrap();
        assert_eq!(by_id, patient);

        assert!(db.get_patient_by_room("5").unwrap().is_none());
    }

    #[test]
    fn test_admit_to_occupied_room_fails() {
        let db = setup_db();
        db.admit_patient(&sample_patient("P1", "3")).unwrap();

        let result = db.admit_patient(&sample_patient("P2", "3"));
        assert!(matches!(result, Err(DbError::Sqlite(_))));
    }

    #[test]
    fn test_admit_duplicate_id_fails() {
        let db = setup_db();
        db.admit_patient(&sample_patient("P1", "3")).unwrap();

        let result = db.admit_patient(&sample_patient("P1", "5"));
        assert!(matches!(result, Err(DbError::Sqlite(_))));
    }

    #[test]
    fn test_update_patient_transfers_room() {
        let db = setup_db();
        let patient = sample_patient("P1", "3");
        db.admit_patient(&patient).unwrap();

        let mut moved = patient.clone();
        moved.room_number = "5".into();
        db.update_patient(&moved).unwrap();

        assert!(db.get_patient_by_room("3").unwrap().is_none());
        let by_room = db.get_patient_by_room("5").unwrap().unwrap();
        assert_eq!(by_room.patient_id, "P1");
    }

    #[test]
    fn test_discharge_moves_to_past() {
        let mut db = setup_db();
        db.admit_patient(&sample_patient("P1", "3")).unwrap();

        db.discharge_patient("P1").unwrap();

        assert!(db.get_current_patient("P1").unwrap().is_none());
        assert!(db.get_patient_by_room("3").unwrap().is_none());

        let stays = db.past_stays("P1").unwrap();
        assert_eq!(stays.len(), 1);
        assert_eq!(stays[0].room_number, "3");
        assert_eq!(
            stays[0].discharge_date,
            chrono::Utc::now().date_naive().to_string()
        );
    }

    #[test]
    fn test_discharge_unknown_patient_is_not_found() {
        let mut db = setup_db();
        let result = db.discharge_patient("P404");
        assert!(matches!(result, Err(DbError::NotFound(_))));
        assert!(db.past_stays("P404").unwrap().is_empty());
    }

    #[test]
    fn test_repeat_stays_accumulate() {
        let mut db = setup_db();
        db.admit_patient(&sample_patient("P1", "3")).unwrap();
        db.discharge_patient("P1").unwrap();
        db.admit_patient(&sample_patient("P1", "7")).unwrap();
        db.discharge_patient("P1").unwrap();

        let stays = db.past_stays("P1").unwrap();
        assert_eq!(stays.len(), 2);
        assert_eq!(stays[0].room_number, "3");
        assert_eq!(stays[1].room_number, "7");
    }
}
