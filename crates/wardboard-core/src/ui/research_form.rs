//! Research data-entry form.

use std::collections::BTreeMap;

use crate::db::{Database, DbResult};
use crate::models::{FieldDef, FieldKind, FieldValue, Research};

use super::{UiError, UiResult};

/// One input on the form: the field definition plus the raw text the user
/// edits.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInput {
    pub def: FieldDef,
    pub raw: String,
}

impl FieldInput {
    /// Widget description for this input.
    pub fn widget(&self) -> Widget<'_> {
        match &self.def.kind {
            FieldKind::Text => Widget::TextBox { value: &self.raw },
            FieldKind::Number => Widget::NumberBox { value: &self.raw },
            FieldKind::Date => Widget::DateBox { value: &self.raw },
            FieldKind::Select { options } => Widget::Select {
                options,
                selected: options.iter().position(|o| *o == self.raw),
            },
        }
    }
}

/// Type-specific input widget. A select with `selected: None` shows its
/// blank default entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget<'a> {
    TextBox { value: &'a str },
    NumberBox { value: &'a str },
    DateBox { value: &'a str },
    Select {
        options: &'a [String],
        selected: Option<usize>,
    },
}

/// Data-entry form for one patient against one research definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchForm {
    pub patient_id: String,
    pub research_id: i64,
    pub research_name: String,
    /// Row id of the already-saved datum, if any; carried through saves so
    /// the record keeps its identity
    pub data_id: Option<i64>,
    pub inputs: Vec<FieldInput>,
}

impl ResearchForm {
    /// Build the form, prefilled from any existing datum.
    pub fn load(db: &Database, patient_id: &str, research: &Research) -> DbResult<Self> {
        let existing = db.get_research_datum(patient_id, research.research_id)?;
        let (data_id, values) = match existing {
            Some(datum) => (Some(datum.data_id), datum.values),
            None => (None, BTreeMap::new()),
        };

        let inputs = research
            .fields
            .iter()
            .map(|def| FieldInput {
                raw: values
                    .get(&def.name)
                    .map(FieldValue::display)
                    .unwrap_or_default(),
                def: def.clone(),
            })
            .collect();

        Ok(Self {
            patient_id: patient_id.to_string(),
            research_id: research.research_id,
            research_name: research.research_name.clone(),
            data_id,
            inputs,
        })
    }

    /// Set the raw value of the input named `field`.
    pub fn set_value(&mut self, field: &str, raw: &str) -> UiResult<()> {
        let input = self
            .inputs
            .iter_mut()
            .find(|i| i.def.name == field)
            .ok_or_else(|| UiError::Invalid(format!("no field named '{}'", field)))?;
        input.raw = raw.to_string();
        Ok(())
    }

    /// Validate every input into its tagged value; blanks are skipped.
    pub fn collect(&self) -> UiResult<BTreeMap<String, FieldValue>> {
        let mut values = BTreeMap::new();
        for input in &self.inputs {
            if let Some(value) = input.def.parse_input(&input.raw)? {
                values.insert(input.def.name.clone(), value);
            }
        }
        Ok(values)
    }

    /// Save the form, then reload it from storage so the screen shows
    /// exactly what persisted.
    pub fn save(&mut self, db: &Database) -> UiResult<()> {
        let values = self.collect()?;

        // The pair may have gained a datum since this form was loaded
        let data_id = match self.data_id {
            Some(id) => Some(id),
            None => db
                .get_research_datum(&self.patient_id, self.research_id)?
                .map(|d| d.data_id),
        };

        let saved_id = db.save_research_datum(data_id, &self.patient_id, self.research_id, &values)?;
        self.data_id = Some(saved_id);

        if let Some(datum) = db.get_research_datum(&self.patient_id, self.research_id)? {
            for input in &mut self.inputs {
                input.raw = datum
                    .values
                    .get(&input.def.name)
                    .map(FieldValue::display)
                    .unwrap_or_default();
            }
        }
        Ok(())
    }
}
