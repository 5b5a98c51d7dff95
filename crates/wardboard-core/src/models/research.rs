//! Research definitions and collected data.
//!
//! A research is a user-defined, ordered set of data-entry fields that can be
//! attached to any patient. Field kinds form a closed set; the collected
//! values are tagged the same way so collection and validation stay
//! exhaustive over the variants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a data-entry field, carrying any kind-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    /// Single choice out of a fixed option list
    Select { options: Vec<String> },
}

/// One field in a research definition.
///
/// Serializes as `{"name": ..., "type": "select", "options": [...]}` with
/// `options` present only for select fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Input that does not fit its field's kind.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldParseError {
    #[error("{field}: '{input}' is not a number")]
    NotANumber { field: String, input: String },

    #[error("{field}: '{input}' is not a date (expected YYYY-MM-DD)")]
    NotADate { field: String, input: String },

    #[error("{field}: '{input}' is not one of the configured options")]
    UnknownOption { field: String, input: String },
}

impl FieldDef {
    /// Validate raw form input against this field's kind.
    ///
    /// Blank input is valid and yields `None`: the field is left out of the
    /// saved datum.
    pub fn parse_input(&self, raw: &str) -> Result<Option<FieldValue>, FieldParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let value = match &self.kind {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Number => {
                let n: f64 = raw.parse().map_err(|_| FieldParseError::NotANumber {
                    field: self.name.clone(),
                    input: raw.to_string(),
                })?;
                FieldValue::Number(n)
            }
            FieldKind::Date => {
                chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    FieldParseError::NotADate {
                        field: self.name.clone(),
                        input: raw.to_string(),
                    }
                })?;
                FieldValue::Date(raw.to_string())
            }
            FieldKind::Select { options } => {
                if !options.iter().any(|o| o == raw) {
                    return Err(FieldParseError::UnknownOption {
                        field: self.name.clone(),
                        input: raw.to_string(),
                    });
                }
                FieldValue::Select(raw.to_string())
            }
        };
        Ok(Some(value))
    }
}

/// A collected value, tagged to mirror [`FieldKind`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(String),
    Select(String),
}

impl FieldValue {
    /// Render the value back into form-input text.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Date(s) | FieldValue::Select(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }
}

/// A stored research definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Research {
    pub research_id: i64,
    pub research_name: String,
    pub fields: Vec<FieldDef>,
}

/// A research definition being authored, not yet stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResearchDraft {
    pub research_name: String,
    pub fields: Vec<FieldDef>,
}

/// The single saved value set for one patient against one research.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchDatum {
    pub data_id: i64,
    pub patient_id: String,
    pub research_id: i64,
    /// Field name -> collected value
    pub values: BTreeMap<String, FieldValue>,
}
