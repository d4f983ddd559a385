//! Plain-text report rendering for saved diagnoses.
//!
//! Produces the email subject/body and the short SMS notice. Delivery is
//! left to the caller.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::models::SavedDiagnosis;

/// Timestamp format used in report bodies, e.g. `05 Mar 2024, 02:30 PM`.
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y, %I:%M %p";

const RULE: &str = "--------------------------------------------------";

/// Rendered notification texts for one saved diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub subject: String,
    pub body: String,
    pub sms: String,
}

impl DiagnosisReport {
    pub fn render(saved: &SavedDiagnosis, recipient_name: &str, config: &ReportConfig) -> Self {
        let result = &saved.result;
        let prediction = &result.predicted_condition;

        let body = format!(
            "Hello {name},\n\
             \n\
             Your Diagnosis Report - MedVice\n\
             {rule}\n\
             \n\
             Prediction:\n{prediction}\n\
             \n\
             Description:\n{description}\n\
             \n\
             Medications:\n{medications}\n\
             \n\
             Precautions:\n{precautions}\n\
             \n\
             Suggested Diet:\n{diets}\n\
             \n\
             Workout Recommendations:\n{workouts}\n\
             \n\
             Saved On:\n{saved_on}\n\
             \n\
             {rule}\n\
             \n\
             Important:\n\
             This report is generated for informational purposes only.\n\
             Please consult a certified medical professional.\n\
             \n\
             Stay healthy\n\
             {signature}\n",
            name = recipient_name.trim(),
            rule = RULE,
            prediction = prediction,
            description = result.description,
            medications = bullet_list(&result.medications),
            precautions = bullet_list(&result.precautions),
            diets = bullet_list(&result.diets),
            workouts = bullet_list(&result.workouts),
            saved_on = format_saved_at(saved, config.utc_offset_minutes),
            signature = config.signature,
        );

        Self {
            subject: format!("MedVice Diagnosis Report - {}", prediction),
            body,
            sms: format!("MedVice: Diagnosis {}. Check email for details.", prediction),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// `- item` per line, or `N/A` for an empty list.
pub fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "N/A".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Save time shifted to the report offset. Unparseable timestamps are shown as stored.
pub fn format_saved_at(saved: &SavedDiagnosis, utc_offset_minutes: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| {
        log::warn!("UTC offset of {} minutes out of range, using UTC", utc_offset_minutes);
        Utc.fix()
    });

    match saved.saved_at_utc() {
        Some(utc) => utc.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string(),
        None => saved.saved_at.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, DiagnosisResult, DiagnosisSource};

    fn saved() -> SavedDiagnosis {
        let result = DiagnosisResult {
            predicted_condition: "Fungal Infection".into(),
            description: "A skin condition.".into(),
            medications: vec!["Antifungal Cream".into(), "Fluconazole".into()],
            diets: vec!["Probiotics".into()],
            workouts: Vec::new(),
            precautions: vec!["bath twice".into(), "keep infected area dry".into()],
            source: DiagnosisSource::Dataset,
            matched_count: 2,
            confidence: Confidence::Percent(66.67),
        };
        let mut saved = SavedDiagnosis::new("user-1".into(), "itching, skin_rash".into(), result);
        saved.saved_at = "2024-03-05T09:00:00+00:00".into();
        saved
    }

    #[test]
    fn test_subject_and_sms() {
        let report = DiagnosisReport::render(&saved(), "Asha", &ReportConfig::default());
        assert_eq!(report.subject, "MedVice Diagnosis Report - Fungal Infection");
        assert_eq!(report.sms, "MedVice: Diagnosis Fungal Infection. Check email for details.");
    }

    #[test]
    fn test_body_lists_every_item() {
        let report = DiagnosisReport::render(&saved(), " Asha ", &ReportConfig::default());
        let body = &report.body;

        assert!(body.starts_with("Hello Asha,\n"));
        assert!(body.contains("Prediction:\nFungal Infection\n"));
        assert!(body.contains("Description:\nA skin condition.\n"));
        assert!(body.contains("Medications:\n- Antifungal Cream\n- Fluconazole\n"));
        assert!(body.contains("Precautions:\n- bath twice\n- keep infected area dry\n"));
        assert!(body.contains("Suggested Diet:\n- Probiotics\n"));
        assert!(body.contains("Workout Recommendations:\nN/A\n"));
        assert!(body.contains("informational purposes only"));
        assert!(body.trim_end().ends_with("Team MedVice"));
    }

    #[test]
    fn test_saved_on_uses_offset() {
        let saved = saved();
        // 09:00 UTC is 14:30 at +05:30
        assert_eq!(format_saved_at(&saved, 330), "05 Mar 2024, 02:30 PM");
        assert_eq!(format_saved_at(&saved, 0), "05 Mar 2024, 09:00 AM");
        assert_eq!(format_saved_at(&saved, -600), "04 Mar 2024, 11:00 PM");

        let report = DiagnosisReport::render(&saved, "Asha", &ReportConfig::default());
        assert!(report.body.contains("Saved On:\n05 Mar 2024, 02:30 PM\n"));
    }

    #[test]
    fn test_bad_offset_and_timestamp() {
        let mut saved = saved();
        assert_eq!(format_saved_at(&saved, 100_000), "05 Mar 2024, 09:00 AM");

        saved.saved_at = "yesterday".into();
        assert_eq!(format_saved_at(&saved, 330), "yesterday");
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(bullet_list(&[]), "N/A");
        assert_eq!(bullet_list(&["a".to_string()]), "- a");
    }

    #[test]
    fn test_to_json() {
        let report = DiagnosisReport::render(&saved(), "Asha", &ReportConfig::default());
        let json = report.to_json().unwrap();
        let back: DiagnosisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
