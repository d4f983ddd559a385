//! Hybrid symptom resolver.
//!
//! Pipeline: Normalization → Dataset Matching → Confidence → Result Assembly,
//! with the AI fallback taking over when the dataset is unavailable or no
//! condition overlaps the submitted symptoms.

mod assembler;
mod confidence;
mod fallback;
mod matcher;
mod normalizer;

pub use assembler::*;
pub use confidence::*;
pub use fallback::*;
pub use matcher::*;
pub use normalizer::*;

use std::sync::Arc;

use medvice_llm::{AiError, ChatCompletion, ExtractionError};
use thiserror::Error;

use crate::dataset::KnowledgeBase;
use crate::models::{Diagnosis, DiagnosisResult, UnrecognizedSymptom};

/// Suggestions offered per unrecognized token.
const SUGGESTION_LIMIT: usize = 3;

/// Errors on the AI path. The resolver itself always converts these into the
/// service-error sentinel.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("AI request failed: {0}")]
    AiRequest(#[from] AiError),

    #[error("AI response unparseable: {0}")]
    AiResponse(#[from] ExtractionError),
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Main resolver that coordinates the full pipeline.
pub struct HybridResolver<C> {
    knowledge: Option<Arc<KnowledgeBase>>,
    normalizer: SymptomNormalizer,
    fallback: AiFallback<C>,
}

impl<C: ChatCompletion> HybridResolver<C> {
    /// `knowledge` is `None` when the dataset failed to load; every request
    /// then goes to the fallback.
    pub fn new(knowledge: Option<Arc<KnowledgeBase>>, fallback: AiFallback<C>) -> Self {
        Self {
            knowledge,
            normalizer: SymptomNormalizer::new(),
            fallback,
        }
    }

    pub fn with_normalizer(mut self, normalizer: SymptomNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Diagnose a raw comma-separated symptom string.
    pub fn resolve(&self, raw_symptoms: &str) -> Diagnosis {
        let tokens = self.normalizer.normalize(raw_symptoms);
        log::debug!("Normalized symptoms: {:?}", tokens);

        let Some(knowledge) = self.knowledge.as_deref() else {
            log::warn!("Dataset unavailable, using AI fallback");
            return Diagnosis::from_result(self.fallback.diagnose(raw_symptoms), tokens);
        };

        let unrecognized = unrecognized_symptoms(knowledge, &tokens);

        match DatasetMatcher::new(&knowledge.matrix).find_best_match(&tokens) {
            MatchOutcome::Matched(found) => {
                log::info!(
                    "Dataset match: {} ({} of {} symptoms)",
                    found.condition,
                    found.match_count,
                    tokens.len()
                );
                let confidence = confidence_percent(found.match_count, tokens.len());
                let result = ResultAssembler::new(&knowledge.tables).assemble(&found, confidence);

                Diagnosis {
                    result,
                    symptoms: tokens,
                    matched_symptoms: found.matched_symptoms,
                    unrecognized,
                    alternatives: found.alternatives,
                }
            }
            MatchOutcome::NoMatch(reason) => {
                log::warn!("No dataset match ({:?}), using AI fallback", reason);
                Diagnosis {
                    unrecognized,
                    ..Diagnosis::from_result(self.fallback.diagnose(raw_symptoms), tokens)
                }
            }
        }
    }

    /// Like [`HybridResolver::resolve`] without the trace.
    pub fn diagnose(&self, raw_symptoms: &str) -> DiagnosisResult {
        self.resolve(raw_symptoms).result
    }

    pub fn knowledge(&self) -> Option<&KnowledgeBase> {
        self.knowledge.as_deref()
    }
}

/// Distinct tokens outside the vocabulary, in submission order.
fn unrecognized_symptoms(knowledge: &KnowledgeBase, tokens: &[String]) -> Vec<UnrecognizedSymptom> {
    let vocabulary = &knowledge.matrix.vocabulary;
    let mut unrecognized: Vec<UnrecognizedSymptom> = Vec::new();
    for token in tokens {
        if vocabulary.contains(token) || unrecognized.iter().any(|u| &u.token == token) {
            continue;
        }
        unrecognized.push(UnrecognizedSymptom {
            token: token.clone(),
            suggestions: vocabulary.suggest(token, SUGGESTION_LIMIT),
        });
    }
    unrecognized
}
