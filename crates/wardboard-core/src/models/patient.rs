//! Patient models.

use serde::{Deserialize, Serialize};

/// Patient sex as captured on the admission form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// A patient currently admitted to a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentPatient {
    /// Hospital-issued identifier, entered at admission
    pub patient_id: String,
    /// Patient name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Sex
    pub sex: Sex,
    /// Attending doctor
    pub doctor: String,
    /// Admission date (YYYY-MM-DD)
    pub admission_date: String,
    /// Room currently occupied; unique across current patients
    pub room_number: String,
}

/// A completed stay, written once at discharge and never updated.
///
/// `patient_id` repeats across records when the same patient is admitted
/// more than once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PastPatient {
    /// Storage-assigned row id
    pub id: i64,
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub doctor: String,
    pub admission_date: String,
    pub room_number: String,
    /// Discharge date (YYYY-MM-DD)
    pub discharge_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_round_trip() {
        for sex in [Sex::Male, Sex::Female] {
            assert_eq!(Sex::from_str(sex.as_str()), Some(sex));
        }
        assert_eq!(Sex::from_str("other"), None);
    }

    #[test]
    fn test_sex_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Sex::Male).unwrap(), r#""male""#);
        let sex: Sex = serde_json::from_str(r#""female""#).unwrap();
        assert_eq!(sex, Sex::Female);
    }
}
