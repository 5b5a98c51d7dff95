//! Settings screen: room list, doctor list, and research definitions.

use crate::db::{Database, DbResult, SETTING_DOCTORS, SETTING_ROOMS};
use crate::models::{FieldDef, FieldKind, Research, ResearchDraft};

use super::{UiError, UiResult};

/// Field-kind choice on a draft row. Select is the one kind with extra
/// input: choosing it reveals the options box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldKindChoice {
    #[default]
    Text,
    Number,
    Date,
    Select,
}

impl FieldKindChoice {
    pub const ALL: [FieldKindChoice; 4] = [
        FieldKindChoice::Text,
        FieldKindChoice::Number,
        FieldKindChoice::Date,
        FieldKindChoice::Select,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FieldKindChoice::Text => "text",
            FieldKindChoice::Number => "number",
            FieldKindChoice::Date => "date",
            FieldKindChoice::Select => "select",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "text" => Some(FieldKindChoice::Text),
            "number" => Some(FieldKindChoice::Number),
            "date" => Some(FieldKindChoice::Date),
            "select" => Some(FieldKindChoice::Select),
            _ => None,
        }
    }
}

/// One draft row on the research builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRow {
    pub name: String,
    pub kind: FieldKindChoice,
    /// Comma-separated options; only meaningful for select rows
    pub options_text: String,
}

impl FieldRow {
    /// Whether the options input is shown for this row.
    pub fn options_visible(&self) -> bool {
        self.kind == FieldKindChoice::Select
    }

    /// Build the stored field, `None` when the row has no name.
    fn build(&self) -> Option<FieldDef> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let kind = match self.kind {
            FieldKindChoice::Text => FieldKind::Text,
            FieldKindChoice::Number => FieldKind::Number,
            FieldKindChoice::Date => FieldKind::Date,
            FieldKindChoice::Select => FieldKind::Select {
                options: self
                    .options_text
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect(),
            },
        };
        Some(FieldDef {
            name: name.to_string(),
            kind,
        })
    }
}

/// The settings screen.
///
/// Room text and doctor list are drafts: nothing persists until
/// [`save_general`](Self::save_general) is called, which stores both in one
/// action.
#[derive(Debug, Clone)]
pub struct SettingsScreen {
    pub rooms_text: String,
    pub doctors: Vec<String>,
    pub researches: Vec<Research>,
    pub draft_name: String,
    pub draft_fields: Vec<FieldRow>,
}

impl SettingsScreen {
    /// Load saved settings and research definitions.
    pub fn load(db: &Database) -> DbResult<Self> {
        let rooms_text: String = db.get_setting(SETTING_ROOMS)?.unwrap_or_default();
        let doctors: Vec<String> = db.get_setting(SETTING_DOCTORS)?.unwrap_or_default();
        let researches = db.list_researches()?;
        Ok(Self {
            rooms_text,
            doctors,
            researches,
            draft_name: String::new(),
            draft_fields: Vec::new(),
        })
    }

    /// Add a doctor to the draft list; blanks and duplicates are ignored.
    pub fn add_doctor(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && !self.doctors.iter().any(|d| d == name) {
            self.doctors.push(name.to_string());
        }
    }

    /// Remove a doctor from the draft list.
    pub fn remove_doctor(&mut self, name: &str) {
        self.doctors.retain(|d| d != name);
    }

    /// Persist the room list and doctor list together.
    pub fn save_general(&self, db: &mut Database) -> DbResult<()> {
        db.save_general_settings(self.rooms_text.trim(), &self.doctors)
    }

    /// Append an empty field row to the research draft.
    pub fn add_field_row(&mut self) -> &mut FieldRow {
        self.draft_fields.push(FieldRow::default());
        let last = self.draft_fields.len() - 1;
        &mut self.draft_fields[last]
    }

    /// Remove a field row by position.
    pub fn remove_field_row(&mut self, index: usize) {
        if index < self.draft_fields.len() {
            self.draft_fields.remove(index);
        }
    }

    /// Validate the research draft into a storable definition.
    pub fn build_research(&self) -> UiResult<ResearchDraft> {
        let research_name = self.draft_name.trim();
        if research_name.is_empty() {
            return Err(UiError::Invalid("research name is required".into()));
        }
        let fields: Vec<FieldDef> = self.draft_fields.iter().filter_map(FieldRow::build).collect();
        if fields.is_empty() {
            return Err(UiError::Invalid("define at least one field".into()));
        }
        Ok(ResearchDraft {
            research_name: research_name.to_string(),
            fields,
        })
    }

    /// Store the drafted research and reset the builder.
    pub fn save_research(&mut self, db: &Database) -> UiResult<i64> {
        let draft = self.build_research()?;
        let id = db.add_research(&draft)?;
        self.draft_name.clear();
        self.draft_fields.clear();
        self.researches = db.list_researches()?;
        Ok(id)
    }

    /// Delete a stored research definition. Saved data rows referencing it
    /// are kept. The front end confirms with the user before calling this.
    pub fn delete_research(&mut self, db: &Database, research_id: i64) -> DbResult<bool> {
        let deleted = db.delete_research(research_id)?;
        if deleted {
            self.researches = db.list_researches()?;
        }
        Ok(deleted)
    }
}
