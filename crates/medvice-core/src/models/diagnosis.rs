//! Diagnosis result models.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Prediction shown when the AI fallback fails.
pub const AI_SERVICE_ERROR: &str = "AI Service Error";

/// Description shown alongside [`AI_SERVICE_ERROR`].
pub const AI_SERVICE_UNAVAILABLE: &str = "AI service currently unavailable.";

/// Where a diagnosis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosisSource {
    /// Symptom matrix lookup
    Dataset,
    /// Language-model fallback
    Ai,
}

impl DiagnosisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisSource::Dataset => "DATASET",
            DiagnosisSource::Ai => "AI",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DATASET" => Some(DiagnosisSource::Dataset),
            "AI" => Some(DiagnosisSource::Ai),
            _ => None,
        }
    }
}

/// Match-ratio confidence.
///
/// Serialized as a bare number, or the string `"N/A"` when no ratio applies.
/// Values above 100 are possible with repeated symptoms and are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Confidence {
    Percent(f64),
    NotAvailable,
}

impl Confidence {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Confidence::Percent(p) => Some(*p),
            Confidence::NotAvailable => None,
        }
    }
}

impl From<Option<f64>> for Confidence {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Confidence::NotAvailable, Confidence::Percent)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers keep one decimal: 75.0%
            Confidence::Percent(p) if p.fract() == 0.0 => write!(f, "{:.1}%", p),
            Confidence::Percent(p) => write!(f, "{}%", p),
            Confidence::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Confidence::Percent(p) => serializer.serialize_f64(*p),
            Confidence::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Confidence::Percent)
                .ok_or_else(|| de::Error::custom("confidence out of range")),
            serde_json::Value::Null => Ok(Confidence::NotAvailable),
            serde_json::Value::String(s) if s == "N/A" => Ok(Confidence::NotAvailable),
            serde_json::Value::String(s) => s
                .trim_end_matches('%')
                .parse::<f64>()
                .map(Confidence::Percent)
                .map_err(|_| de::Error::custom(format!("invalid confidence: {}", s))),
            other => Err(de::Error::custom(format!("invalid confidence: {}", other))),
        }
    }
}

/// The unified diagnosis record handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub predicted_condition: String,
    pub description: String,
    pub medications: Vec<String>,
    pub diets: Vec<String>,
    pub workouts: Vec<String>,
    pub precautions: Vec<String>,
    pub source: DiagnosisSource,
    /// Overlapping symptom count; always > 0 for dataset results
    pub matched_count: u32,
    pub confidence: Confidence,
}

impl DiagnosisResult {
    /// Well-formed but empty result returned when the AI fallback fails.
    pub fn ai_service_error() -> Self {
        Self {
            predicted_condition: AI_SERVICE_ERROR.into(),
            description: AI_SERVICE_UNAVAILABLE.into(),
            medications: Vec::new(),
            diets: Vec::new(),
            workouts: Vec::new(),
            precautions: Vec::new(),
            source: DiagnosisSource::Ai,
            matched_count: 0,
            confidence: Confidence::NotAvailable,
        }
    }

    pub fn is_ai_powered(&self) -> bool {
        self.source == DiagnosisSource::Ai
    }

    /// True for the failure sentinel from [`DiagnosisResult::ai_service_error`].
    pub fn is_service_error(&self) -> bool {
        self.source == DiagnosisSource::Ai && self.predicted_condition == AI_SERVICE_ERROR
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A condition and its overlap count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCondition {
    pub name: String,
    pub match_count: u32,
}

/// A submitted token that is not in the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnrecognizedSymptom {
    pub token: String,
    /// Close vocabulary entries, best first
    pub suggestions: Vec<String>,
}

/// A diagnosis result together with how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub result: DiagnosisResult,
    /// Normalized tokens in submission order
    pub symptoms: Vec<String>,
    /// Tokens found in the vocabulary (duplicates kept)
    pub matched_symptoms: Vec<String>,
    pub unrecognized: Vec<UnrecognizedSymptom>,
    /// Runner-up conditions with a non-zero overlap
    pub alternatives: Vec<ScoredCondition>,
}

impl Diagnosis {
    /// Wrap a result that carries no dataset trace.
    pub fn from_result(result: DiagnosisResult, symptoms: Vec<String>) -> Self {
        Self {
            result,
            symptoms,
            matched_symptoms: Vec::new(),
            unrecognized: Vec::new(),
            alternatives: Vec::new(),
        }
    }
}
