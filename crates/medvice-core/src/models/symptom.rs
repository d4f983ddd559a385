//! Symptom vocabulary and condition records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

/// Minimum similarity for a vocabulary entry to be suggested.
const MIN_SUGGESTION_SCORE: f64 = 0.80;

/// Ordered, immutable set of canonical symptom identifiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymptomVocabulary {
    symptoms: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    /// Build a vocabulary; later duplicates of an identifier are ignored.
    pub fn new<I, S>(symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::default();
        for symptom in symptoms {
            let symptom = symptom.into();
            if !vocabulary.index.contains_key(&symptom) {
                vocabulary
                    .index
                    .insert(symptom.clone(), vocabulary.symptoms.len());
                vocabulary.symptoms.push(symptom);
            }
        }
        vocabulary
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Column position of a symptom in every condition's presence vector.
    pub fn position(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    /// Human-readable labels in vocabulary order (`skin_rash` → `Skin Rash`).
    pub fn display_labels(&self) -> Vec<String> {
        self.iter().map(display_label).collect()
    }

    /// Vocabulary entries that look like a misspelling of `token`, best first.
    pub fn suggest(&self, token: &str, limit: usize) -> Vec<String> {
        let mut scored: Vec<(f64, &str)> = self
            .iter()
            .map(|symptom| (similarity(token, symptom), symptom))
            .filter(|(score, _)| *score >= MIN_SUGGESTION_SCORE)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(limit)
            .map(|(_, symptom)| symptom.to_string())
            .collect()
    }
}

/// One row of the symptom matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    /// Condition label as written in the dataset
    pub name: String,
    /// Presence flag per vocabulary position (1 = exhibits the symptom)
    pub presence: Vec<u32>,
}

impl ConditionRecord {
    pub fn new(name: impl Into<String>, presence: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            presence,
        }
    }

    /// Presence value at a vocabulary position; out of range reads as 0.
    pub fn presence_at(&self, position: usize) -> u32 {
        self.presence.get(position).copied().unwrap_or(0)
    }
}

/// Convert a symptom identifier to a display label.
pub fn display_label(symptom: &str) -> String {
    title_case(&symptom.trim().replace('_', " "))
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_alpha = true;
        } else {
            out.push(ch);
            previous_is_alpha = false;
        }
    }
    out
}

// Jaro-Winkler catches typos near the start, Levenshtein overall edits.
fn similarity(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
}
