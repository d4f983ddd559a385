//! Saved diagnosis records.

use serde::{Deserialize, Serialize};

use super::diagnosis::DiagnosisResult;

/// A diagnosis the user chose to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDiagnosis {
    /// Unique record ID
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Symptoms exactly as the user typed them
    pub symptoms_input: String,
    pub result: DiagnosisResult,
    /// RFC 3339 UTC timestamp
    pub saved_at: String,
}

impl SavedDiagnosis {
    /// Create a new record stamped with the current time.
    pub fn new(user_id: String, symptoms_input: String, result: DiagnosisResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            symptoms_input,
            result,
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Parsed save time, if the stored timestamp is valid.
    pub fn saved_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(&self.saved_at)
            .ok()
            .map(|t| t.with_timezone(&chrono::Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_saved_diagnosis() {
        let saved = SavedDiagnosis::new(
            "user-1".into(),
            "cough".into(),
            DiagnosisResult::ai_service_error(),
        );
        assert_eq!(saved.id.len(), 36);
        assert_eq!(saved.user_id, "user-1");
        assert!(saved.saved_at_utc().is_some());
    }

    #[test]
    fn test_invalid_timestamp() {
        let mut saved = SavedDiagnosis::new("u".into(), "".into(), DiagnosisResult::ai_service_error());
        saved.saved_at = "yesterday".into();
        assert!(saved.saved_at_utc().is_none());
    }
}
