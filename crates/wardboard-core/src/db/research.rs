//! Research definition and research datum operations.

use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{FieldDef, FieldValue, Research, ResearchDatum, ResearchDraft};

impl Database {
    /// Store a new research definition, returning its generated id.
    pub fn add_research(&self, draft: &ResearchDraft) -> DbResult<i64> {
        let fields_json = serde_json::to_string(&draft.fields)?;
        self.conn.execute(
            "INSERT INTO researches (research_name, fields) VALUES (?1, ?2)",
            params![draft.research_name, fields_json],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All research definitions in storage order.
    pub fn list_researches(&self) -> DbResult<Vec<Research>> {
        let mut stmt = self.conn.prepare(
            "SELECT research_id, research_name, fields FROM researches ORDER BY research_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ResearchRow {
                research_id: row.get(0)?,
                research_name: row.get(1)?,
                fields: row.get(2)?,
            })
        })?;

        let mut researches = Vec::new();
        for row in rows {
            researches.push(row?.try_into()?);
        }
        Ok(researches)
    }

    /// Get one research definition by id.
    pub fn get_research(&self, research_id: i64) -> DbResult<Option<Research>> {
        self.conn
            .query_row(
                "SELECT research_id, research_name, fields FROM researches WHERE research_id = ?",
                [research_id],
                |row| {
                    Ok(ResearchRow {
                        research_id: row.get(0)?,
                        research_name: row.get(1)?,
                        fields: row.get(2)?,
                    })
                },
            )
            .optional()?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Delete a research definition.
    ///
    /// Data rows referencing the definition are left in place.
    pub fn delete_research(&self, research_id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM researches WHERE research_id = ?",
            [research_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Look up the datum for one patient against one research.
    pub fn get_research_datum(
        &self,
        patient_id: &str,
        research_id: i64,
    ) -> DbResult<Option<ResearchDatum>> {
        self.conn
            .query_row(
                r#"
                SELECT data_id, patient_id, research_id, data
                FROM research_data
                WHERE patient_id = ?1 AND research_id = ?2
                "#,
                params![patient_id, research_id],
                |row| {
                    Ok(DatumRow {
                        data_id: row.get(0)?,
                        patient_id: row.get(1)?,
                        research_id: row.get(2)?,
                        data: row.get(3)?,
                    })
                },
            )
            .optional()?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Save a datum, replacing in place when `data_id` is given.
    ///
    /// Inserting a second datum for an already-saved (patient, research)
    /// pair is rejected by the composite unique index; callers look the pair
    /// up first to decide insert versus replace.
    pub fn save_research_datum(
        &self,
        data_id: Option<i64>,
        patient_id: &str,
        research_id: i64,
        values: &BTreeMap<String, FieldValue>,
    ) -> DbResult<i64> {
        let values_json = serde_json::to_string(values)?;
        match data_id {
            Some(id) => {
                let rows_affected = self.conn.execute(
                    r#"
                    UPDATE research_data
                    SET patient_id = ?2, research_id = ?3, data = ?4
                    WHERE data_id = ?1
                    "#,
                    params![id, patient_id, research_id, values_json],
                )?;
                if rows_affected == 0 {
                    return Err(DbError::NotFound(format!("research datum {}", id)));
                }
                Ok(id)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO research_data (patient_id, research_id, data) VALUES (?1, ?2, ?3)",
                    params![patient_id, research_id, values_json],
                )?;
                Ok(self.conn.last_insert_rowid())
            }
        }
    }
}

/// Intermediate row struct for database mapping.
struct ResearchRow {
    research_id: i64,
    research_name: String,
    fields: String,
}

impl TryFrom<ResearchRow> for Research {
    type Error = DbError;

    fn try_from(row: ResearchRow) -> Result<Self, Self::Error> {
        let fields: Vec<FieldDef> = serde_json::from_str(&row.fields)?;
        Ok(Research {
            research_id: row.research_id,
            research_name: row.research_name,
            fields,
        })
    }
}

struct DatumRow {
    data_id: i64,
    patient_id: String,
    research_id: i64,
    data: String,
}

impl TryFrom<DatumRow> for ResearchDatum {
    type Error = DbError;

    fn try_from(row: DatumRow) -> Result<Self, Self::Error> {
        let values: BTreeMap<String, FieldValue> = serde_json::from_str(&row.data)?;
        Ok(ResearchDatum {
            data_id: row.data_id,
            patient_id: row.patient_id,
            research_id: row.research_id,
            values,
        })
    }
}
