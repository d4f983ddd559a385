//! SQLite schema definition.

/// Revision stored in `PRAGMA user_version`; bump with every layout change.
pub const SCHEMA_VERSION: i64 = 1;

/// Complete database schema for saved diagnoses.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Saved Diagnosis Results (one row per explicit save)
-- ============================================================================

CREATE TABLE IF NOT EXISTS diagnosis_results (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    symptoms_input TEXT NOT NULL,
    prediction TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    medications TEXT NOT NULL DEFAULT '[]',      -- JSON array of strings
    diets TEXT NOT NULL DEFAULT '[]',            -- JSON array of strings
    workouts TEXT NOT NULL DEFAULT '[]',         -- JSON array of strings
    precautions TEXT NOT NULL DEFAULT '[]',      -- JSON array of strings
    source TEXT NOT NULL CHECK (source IN ('DATASET', 'AI')),
    matched_count INTEGER NOT NULL DEFAULT 0,
    confidence REAL,                             -- NULL when not applicable
    saved_at TEXT NOT NULL                       -- RFC 3339, UTC
);

CREATE INDEX IF NOT EXISTS idx_results_user_saved ON diagnosis_results(user_id, saved_at);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_source_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO diagnosis_results (id, user_id, symptoms_input, prediction, source, saved_at)
             VALUES ('r1', 'u1', 'cough', 'Flu', 'GUESS', '2024-01-01T00:00:00+00:00')",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO diagnosis_results (id, user_id, symptoms_input, prediction, source, saved_at)
             VALUES ('r1', 'u1', 'cough', 'Flu', 'AI', '2024-01-01T00:00:00+00:00')",
            [],
        );
        assert!(result.is_ok());
    }
}
