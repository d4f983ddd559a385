//! Saved diagnosis operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Confidence, DiagnosisResult, DiagnosisSource, SavedDiagnosis};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, symptoms_input, prediction, description,
           medications, diets, workouts, precautions,
           source, matched_count, confidence, saved_at
    FROM diagnosis_results
"#;

impl Database {
    /// Insert a saved diagnosis.
    pub fn insert_result(&self, saved: &SavedDiagnosis) -> DbResult<()> {
        let result = &saved.result;
        self.conn.execute(
            r#"
            INSERT INTO diagnosis_results (
                id, user_id, symptoms_input, prediction, description,
                medications, diets, workouts, precautions,
                source, matched_count, confidence, saved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                saved.id,
                saved.user_id,
                saved.symptoms_input,
                result.predicted_condition,
                result.description,
                serde_json::to_string(&result.medications)?,
                serde_json::to_string(&result.diets)?,
                serde_json::to_string(&result.workouts)?,
                serde_json::to_string(&result.precautions)?,
                result.source.as_str(),
                result.matched_count,
                result.confidence.percent(),
                saved.saved_at,
            ],
        )?;
        Ok(())
    }

    /// Get a saved diagnosis by ID.
    pub fn get_result(&self, id: &str) -> DbResult<Option<SavedDiagnosis>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        self.conn
            .query_row(&sql, [id], ResultRow::from_row)
            .optional()?
            .map(SavedDiagnosis::try_from)
            .transpose()
    }

    /// All saved diagnoses for a user, newest first.
    pub fn list_results_for_user(&self, user_id: &str) -> DbResult<Vec<SavedDiagnosis>> {
        let sql = format!(
            "{} WHERE user_id = ? ORDER BY saved_at DESC, rowid DESC",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([user_id], ResultRow::from_row)?;

        rows.map(|row| SavedDiagnosis::try_from(row?))
            .collect()
    }

    /// Delete a saved diagnosis.
    pub fn delete_result(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM diagnosis_results WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct ResultRow {
    id: String,
    user_id: String,
    symptoms_input: String,
    prediction: String,
    description: String,
    medications: String,
    diets: String,
    workouts: String,
    precautions: String,
    source: String,
    matched_count: u32,
    confidence: Option<f64>,
    saved_at: String,
}

impl ResultRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            symptoms_input: row.get(2)?,
            prediction: row.get(3)?,
            description: row.get(4)?,
            medications: row.get(5)?,
            diets: row.get(6)?,
            workouts: row.get(7)?,
            precautions: row.get(8)?,
            source: row.get(9)?,
            matched_count: row.get(10)?,
            confidence: row.get(11)?,
            saved_at: row.get(12)?,
        })
    }
}

impl TryFrom<ResultRow> for SavedDiagnosis {
    type Error = DbError;

    fn try_from(row: ResultRow) -> Result<Self, Self::Error> {
        let source = DiagnosisSource::parse(&row.source)
            .ok_or_else(|| DbError::Constraint(format!("Unknown diagnosis source: {}", row.source)))?;

        Ok(SavedDiagnosis {
            id: row.id,
            user_id: row.user_id,
            symptoms_input: row.symptoms_input,
            result: DiagnosisResult {
                predicted_condition: row.prediction,
                description: row.description,
                medications: serde_json::from_str(&row.medications)?,
                diets: serde_json::from_str(&row.diets)?,
                workouts: serde_json::from_str(&row.workouts)?,
                precautions: serde_json::from_str(&row.precautions)?,
                source,
                matched_count: row.matched_count,
                confidence: Confidence::from(row.confidence),
            },
            saved_at: row.saved_at,
        })
    }
}
