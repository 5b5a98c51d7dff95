//! Room detail screen: occupied summary or admission form.
//!
//! The screen branches on occupancy. Occupied rooms show the patient with a
//! discharge action and a research picker; vacant rooms show the admission
//! form. Admission and discharge flip the branch; selecting a research only
//! swaps the data-entry sub-view.

use crate::db::{Database, DbResult, SETTING_DOCTORS};
use crate::models::{CurrentPatient, Research, Sex};

use super::{ResearchForm, UiError, UiResult};

/// Room detail, branching on occupancy.
#[derive(Debug)]
pub enum RoomDetail {
    Occupied(OccupiedRoom),
    Vacant(AdmissionForm),
}

impl RoomDetail {
    /// Load the screen for one room.
    pub fn load(db: &Database, room_number: &str) -> DbResult<Self> {
        match db.get_patient_by_room(room_number)? {
            Some(patient) => Ok(RoomDetail::Occupied(OccupiedRoom {
                room_number: room_number.to_string(),
                patient,
                researches: db.list_researches()?,
                form: None,
            })),
            None => Ok(RoomDetail::Vacant(AdmissionForm::new(db, room_number)?)),
        }
    }
}

/// An occupied room: patient summary, discharge, research picker.
#[derive(Debug)]
pub struct OccupiedRoom {
    pub room_number: String,
    pub patient: CurrentPatient,
    pub researches: Vec<Research>,
    /// Data-entry sub-view for the currently selected research
    pub form: Option<ResearchForm>,
}

impl OccupiedRoom {
    /// Open the data-entry form for one research definition, prefilled from
    /// any saved datum.
    pub fn select_research(&mut self, db: &Database, research_id: i64) -> UiResult<()> {
        let research = self
            .researches
            .iter()
            .find(|r| r.research_id == research_id)
            .ok_or_else(|| UiError::Invalid(format!("no research with id {}", research_id)))?;
        self.form = Some(ResearchForm::load(db, &self.patient.patient_id, research)?);
        Ok(())
    }

    /// Discharge the patient, freeing the room. The front end confirms with
    /// the user before calling this.
    pub fn discharge(&self, db: &mut Database) -> UiResult<()> {
        db.discharge_patient(&self.patient.patient_id)?;
        Ok(())
    }
}

/// Admission form state for a vacant room.
#[derive(Debug, Clone)]
pub struct AdmissionForm {
    pub room_number: String,
    /// Doctor list configured on the settings screen
    pub doctors: Vec<String>,
    pub patient_id: String,
    pub name: String,
    /// Raw age input, validated on submit
    pub age: String,
    pub sex: Sex,
    pub doctor: String,
    /// Prefilled to today
    pub admission_date: String,
}

/// What submitting the admission form led to.
#[derive(Debug, PartialEq)]
pub enum AdmissionOutcome {
    /// The patient was admitted to this room.
    Admitted,
    /// The id is already admitted elsewhere; nothing was written. The front
    /// end confirms the move and calls
    /// [`confirm_transfer`](AdmissionForm::confirm_transfer).
    TransferRequired { existing: CurrentPatient },
}

impl AdmissionForm {
    fn new(db: &Database, room_number: &str) -> DbResult<Self> {
        let doctors: Vec<String> = db.get_setting(SETTING_DOCTORS)?.unwrap_or_default();
        let doctor = doctors.first().cloned().unwrap_or_default();
        Ok(Self {
            room_number: room_number.to_string(),
            doctors,
            patient_id: String::new(),
            name: String::new(),
            age: String::new(),
            sex: Sex::Male,
            doctor,
            admission_date: chrono::Utc::now().date_naive().to_string(),
        })
    }

    /// Validate the form into an admission record.
    pub fn build_patient(&self) -> UiResult<CurrentPatient> {
        let patient_id = self.patient_id.trim();
        let name = self.name.trim();
        let age = self.age.trim();
        if patient_id.is_empty() || name.is_empty() || age.is_empty() {
            return Err(UiError::Invalid(
                "patient id, name and age are required".into(),
            ));
        }
        let age: u32 = age
            .parse()
            .map_err(|_| UiError::Invalid(format!("'{}' is not a valid age", age)))?;
        Ok(CurrentPatient {
            patient_id: patient_id.to_string(),
            name: name.to_string(),
            age,
            sex: self.sex,
            doctor: self.doctor.clone(),
            admission_date: self.admission_date.clone(),
            room_number: self.room_number.clone(),
        })
    }

    /// Submit the admission.
    ///
    /// When the patient id is already admitted in another room, the caller
    /// gets [`AdmissionOutcome::TransferRequired`] back and decides whether
    /// to complete the move.
    pub fn submit(&self, db: &Database) -> UiResult<AdmissionOutcome> {
        let patient = self.build_patient()?;
        if let Some(existing) = db.get_current_patient(&patient.patient_id)? {
            return Ok(AdmissionOutcome::TransferRequired { existing });
        }
        db.admit_patient(&patient)?;
        Ok(AdmissionOutcome::Admitted)
    }

    /// Complete a confirmed transfer: the form's values replace the existing
    /// record and the patient moves to this room.
    pub fn confirm_transfer(&self, db: &Database) -> UiResult<()> {
        let patient = self.build_patient()?;
        db.update_patient(&patient)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.save_general_settings("1,2,3", &["Dr. Sato".to_string(), "Dr. Mori".to_string()])
            .unwrap();
        db
    }

    fn filled_form(db: &Database, room: &str, patient_id: &str) -> AdmissionForm {
        let detail = RoomDetail::load(db, room).unwrap();
        let mut form = match detail {
            RoomDetail::Vacant(form) => form,
            RoomDetail::Occupied(_) => panic!("room {} should be vacant", room),
        };
        form.patient_id = patient_id.into();
        form.name = "Tanaka Hana".into();
        form.age = "67".into();
        form.sex = Sex::Female;
        form
    }

    #[test]
    fn test_vacant_room_prefills_form() {
        let db = setup_db();
        match RoomDetail::load(&db, "1").unwrap() {
            RoomDetail::Vacant(form) => {
                assert_eq!(form.doctors.len(), 2);
                assert_eq!(form.doctor, "Dr. Sato");
                assert_eq!(
                    form.admission_date,
                    chrono::Utc::now().date_naive().to_string()
                );
            }
            RoomDetail::Occupied(_) => panic!("expected vacant"),
        }
    }

    #[test]
    fn test_admission_requires_fields() {
        let db = setup_db();
        let mut form = filled_form(&db, "1", "P1");
        form.age = String::new();
        assert!(matches!(form.submit(&db), Err(UiError::Invalid(_))));

        form.age = "sixty".into();
        assert!(matches!(form.submit(&db), Err(UiError::Invalid(_))));
    }

    #[test]
    fn test_admission_occupies_room() {
        let db = setup_db();
        let form = filled_form(&db, "1", "P1");
        assert_eq!(form.submit(&db).unwrap(), AdmissionOutcome::Admitted);

        match RoomDetail::load(&db, "1").unwrap() {
            RoomDetail::Occupied(room) => {
                assert_eq!(room.patient.patient_id, "P1");
                assert_eq!(room.patient.age, 67);
            }
            RoomDetail::Vacant(_) => panic!("expected occupied"),
        }
    }

    #[test]
    fn test_readmitting_elsewhere_requires_transfer() {
        let db = setup_db();
        filled_form(&db, "1", "P1").submit(&db).unwrap();

        let form = filled_form(&db, "2", "P1");
        match form.submit(&db).unwrap() {
            AdmissionOutcome::TransferRequired { existing } => {
                assert_eq!(existing.room_number, "1");
            }
            AdmissionOutcome::Admitted => panic!("expected transfer"),
        }
        // Nothing moved yet
        assert!(db.get_patient_by_room("2").unwrap().is_none());

        form.confirm_transfer(&db).unwrap();
        assert!(db.get_patient_by_room("1").unwrap().is_none());
        assert_eq!(
            db.get_patient_by_room("2").unwrap().unwrap().patient_id,
            "P1"
        );
    }

    #[test]
    fn test_discharge_vacates_room() {
        let mut db = setup_db();
        filled_form(&db, "1", "P1").submit(&db).unwrap();

        match RoomDetail::load(&db, "1").unwrap() {
            RoomDetail::Occupied(room) => room.discharge(&mut db).unwrap(),
            RoomDetail::Vacant(_) => panic!("expected occupied"),
        }

        assert!(matches!(
            RoomDetail::load(&db, "1").unwrap(),
            RoomDetail::Vacant(_)
        ));
        assert_eq!(db.past_stays("P1").unwrap().len(), 1);
    }
}
