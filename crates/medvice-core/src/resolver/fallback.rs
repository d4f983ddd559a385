//! Language-model fallback for inputs the symptom matrix cannot place.
//!
//! Failures never reach the caller: [`AiFallback::diagnose`] logs them and
//! returns the service-error sentinel instead.

use medvice_llm::{build_chat_messages, parse_diagnosis_output, AiDiagnosis, ChatCompletion, ParseMode};

use crate::models::{Confidence, DiagnosisResult, DiagnosisSource};

use super::ResolverResult;

pub struct AiFallback<C> {
    client: C,
    parse_mode: ParseMode,
}

impl<C: ChatCompletion> AiFallback<C> {
    pub fn new(client: C) -> Self {
        Self::with_parse_mode(client, ParseMode::default())
    }

    pub fn with_parse_mode(client: C, parse_mode: ParseMode) -> Self {
        Self { client, parse_mode }
    }

    /// Ask the model; any failure becomes [`DiagnosisResult::ai_service_error`].
    pub fn diagnose(&self, raw_symptoms: &str) -> DiagnosisResult {
        match self.try_diagnose(raw_symptoms) {
            Ok(result) => result,
            Err(e) => {
                log::error!("AI fallback failed: {}", e);
                DiagnosisResult::ai_service_error()
            }
        }
    }

    pub fn try_diagnose(&self, raw_symptoms: &str) -> ResolverResult<DiagnosisResult> {
        let messages = build_chat_messages(raw_symptoms);
        let reply = self.client.complete(&messages)?;
        log::debug!("AI reply: {} chars", reply.len());

        let parsed = parse_diagnosis_output(&reply, self.parse_mode)?;
        Ok(from_ai_diagnosis(parsed))
    }
}

/// Map the model's fields onto a result. AI results carry no match ratio.
pub fn from_ai_diagnosis(diagnosis: AiDiagnosis) -> DiagnosisResult {
    DiagnosisResult {
        predicted_condition: diagnosis.disease,
        description: diagnosis.explanation,
        medications: diagnosis.medications,
        diets: diagnosis.diet,
        workouts: diagnosis.workout,
        precautions: diagnosis.precautions,
        source: DiagnosisSource::Ai,
        matched_count: 0,
        confidence: Confidence::NotAvailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverError;
    use medvice_llm::{AiError, ChatMessage};
    use std::cell::RefCell;

    /// Replays a fixed reply and records what it was sent.
    struct Scripted {
        reply: fn() -> Result<String, AiError>,
        seen: RefCell<Vec<ChatMessage>>,
    }

    impl Scripted {
        fn new(reply: fn() -> Result<String, AiError>) -> Self {
            Self {
                reply,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChatCompletion for Scripted {
        fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiError> {
            self.seen.borrow_mut().extend_from_slice(messages);
            (self.reply)()
        }
    }

    #[test]
    fn test_fenced_reply() {
        let client = Scripted::new(|| {
            Ok("Sure! ```json\n{\"disease\":\"Flu\",\"explanation\":\"Viral infection.\",\"medications\":[\"Rest\"],\"precautions\":[\"Isolate\"],\"diet\":[\"Soup\"],\"workout\":[]}\n```".into())
        });
        let fallback = AiFallback::new(&client);

        let result = fallback.diagnose("fever, chills");
        assert_eq!(result.predicted_condition, "Flu");
        assert_eq!(result.description, "Viral infection.");
        assert_eq!(result.medications, vec!["Rest"]);
        assert_eq!(result.precautions, vec!["Isolate"]);
        assert_eq!(result.diets, vec!["Soup"]);
        assert!(result.workouts.is_empty());
        assert_eq!(result.source, DiagnosisSource::Ai);
        assert_eq!(result.matched_count, 0);
        assert_eq!(result.confidence, Confidence::NotAvailable);

        let seen = client.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].role, "system");
        assert!(seen[1].content.contains("fever, chills"));
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let client = Scripted::new(|| Ok("{\"disease\": \"Migraine\", \"diet\": \"Hydrate\"}".into()));
        let result = AiFallback::new(&client).diagnose("headache");

        assert_eq!(result.predicted_condition, "Migraine");
        assert_eq!(result.description, "");
        assert!(result.medications.is_empty());
        assert_eq!(result.diets, vec!["Hydrate"]);
    }

    #[test]
    fn test_http_500_yields_sentinel() {
        let client = Scripted::new(|| {
            Err(AiError::Status {
                status: 500,
                body: "internal error".into(),
            })
        });
        let fallback = AiFallback::new(&client);

        assert!(matches!(
            fallback.try_diagnose("cough"),
            Err(ResolverError::AiRequest(AiError::Status { status: 500, .. }))
        ));
        assert_eq!(fallback.diagnose("cough"), DiagnosisResult::ai_service_error());
    }

    #[test]
    fn test_timeout_yields_sentinel() {
        let client = Scripted::new(|| Err(AiError::Timeout));
        assert!(AiFallback::new(&client).diagnose("cough").is_service_error());
    }

    #[test]
    fn test_unparseable_reply_yields_sentinel() {
        let client = Scripted::new(|| Ok("I cannot help with that.".into()));
        let fallback = AiFallback::new(&client);

        assert!(matches!(
            fallback.try_diagnose("cough"),
            Err(ResolverError::AiResponse(_))
        ));
        assert!(fallback.diagnose("cough").is_service_error());
    }

    #[test]
    fn test_strict_mode_rejects_prose() {
        let client = Scripted::new(|| Ok("Here you go: {\"disease\": \"Flu\"}".into()));

        assert_eq!(
            AiFallback::new(&client).diagnose("fever").predicted_condition,
            "Flu"
        );
        assert!(AiFallback::with_parse_mode(&client, ParseMode::Strict)
            .diagnose("fever")
            .is_service_error());
    }
}
