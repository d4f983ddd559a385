//! MedVice Core Library
//!
//! Hybrid symptom diagnosis: a deterministic symptom-matrix lookup with a
//! language-model fallback for inputs the dataset cannot place.
//!
//! # Architecture
//!
//! ```text
//! "itching, skin rash"
//!         │
//!     Normalizer ──► ["itching", "skin_rash"]
//!         │
//!  ┌──────▼───────────────┐   no known symptoms / zero overlap
//!  │   Dataset Matcher    │──────────────────────────────┐
//!  │  (stable tie-break)  │   or dataset unavailable     │
//!  └──────┬───────────────┘                              ▼
//!         │ best condition                        AI Fallback Adapter
//!         ▼                                              │
//!  Confidence + Result Assembler                         │ (sentinel on failure)
//!         │                                              │
//!         └──────────────► DiagnosisResult ◄─────────────┘
//!                               │
//!                    [explicit save] ──► SQLite ──► Report
//! ```
//!
//! # Core Principle
//!
//! **Every diagnosis request yields a well-formed result.** AI failures are
//! logged and replaced by a sentinel; they never reach the caller.
//!
//! # Modules
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`dataset`]: Symptom matrix and auxiliary table loading
//! - [`db`]: SQLite storage for saved diagnoses
//! - [`models`]: Domain types (SymptomVocabulary, DiagnosisResult, etc.)
//! - [`report`]: Email and SMS text for saved diagnoses
//! - [`resolver`]: Normalizer, matcher, confidence, assembler and AI fallback

pub mod config;
pub mod dataset;
pub mod db;
pub mod models;
pub mod report;
pub mod resolver;

// Re-export commonly used types
pub use config::MedviceConfig;
pub use dataset::KnowledgeBase;
pub use db::Database;
pub use models::{
    Confidence, Diagnosis, DiagnosisResult, DiagnosisSource, SavedDiagnosis, ScoredCondition,
    SymptomVocabulary, UnrecognizedSymptom,
};
pub use report::DiagnosisReport;
pub use resolver::{AiFallback, HybridResolver, SymptomNormalizer};

use std::sync::{Arc, Mutex};

use medvice_llm::{ChatCompletion, OpenRouterClient};

use config::ReportConfig;

/// Chat backend shared across request threads.
pub type SharedChatClient = Box<dyn ChatCompletion + Send + Sync>;

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum MedviceError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("AI client error: {0}")]
    AiClientError(String),
}

impl From<db::DbError> for MedviceError {
    fn from(e: db::DbError) -> Self {
        MedviceError::DatabaseError(e.to_string())
    }
}

impl From<medvice_llm::AiError> for MedviceError {
    fn from(e: medvice_llm::AiError) -> Self {
        MedviceError::AiClientError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedviceError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedviceError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe entry point: diagnosis, saved history and reports.
pub struct MedviceCore {
    resolver: HybridResolver<SharedChatClient>,
    db: Mutex<Database>,
    report: ReportConfig,
}

impl MedviceCore {
    /// Load the datasets, connect the AI client and open the result store.
    ///
    /// A dataset that fails to load is logged, not fatal: the core then
    /// answers every request through the AI fallback.
    pub fn open(config: &MedviceConfig) -> Result<Self, MedviceError> {
        let knowledge = match KnowledgeBase::load(&config.datasets) {
            Ok(knowledge) => Some(Arc::new(knowledge)),
            Err(e) => {
                log::error!("Dataset unavailable, all requests will use the AI fallback: {}", e);
                None
            }
        };

        if config.ai.api_key.is_none() {
            log::warn!("No API key configured for the AI fallback");
        }
        let client: SharedChatClient = Box::new(OpenRouterClient::new(config.ai.clone())?);

        let db = Database::open(&config.database.path)?;
        Ok(Self::with_parts(knowledge, client, db, config))
    }

    /// Assemble a core from already-built parts.
    pub fn with_parts(
        knowledge: Option<Arc<KnowledgeBase>>,
        client: SharedChatClient,
        db: Database,
        config: &MedviceConfig,
    ) -> Self {
        let fallback = AiFallback::with_parse_mode(client, config.ai.parse_mode);
        let normalizer = SymptomNormalizer::with_aliases(&config.normalizer.aliases);

        Self {
            resolver: HybridResolver::new(knowledge, fallback).with_normalizer(normalizer),
            db: Mutex::new(db),
            report: config.report.clone(),
        }
    }

    // =========================================================================
    // Diagnosis
    // =========================================================================

    /// Diagnose a comma-separated symptom string. Never fails.
    pub fn diagnose(&self, symptoms: &str) -> Diagnosis {
        self.resolver.resolve(symptoms)
    }

    pub fn knowledge_available(&self) -> bool {
        self.resolver.knowledge().is_some()
    }

    /// Display labels for every known symptom, in dataset order.
    pub fn symptom_labels(&self) -> Vec<String> {
        self.resolver
            .knowledge()
            .map(|knowledge| knowledge.matrix.vocabulary.display_labels())
            .unwrap_or_default()
    }

    // =========================================================================
    // Saved Results
    // =========================================================================

    /// Persist a result for `user_id`.
    pub fn save_diagnosis(
        &self,
        user_id: &str,
        symptoms_input: &str,
        result: DiagnosisResult,
    ) -> Result<SavedDiagnosis, MedviceError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(MedviceError::InvalidInput("user id is empty".into()));
        }

        let saved = SavedDiagnosis::new(user_id.to_string(), symptoms_input.to_string(), result);
        let db = self.db.lock()?;
        db.insert_result(&saved)?;
        log::info!("Saved diagnosis {} for user {}", saved.id, saved.user_id);
        Ok(saved)
    }

    /// Saved results for a user, newest first.
    pub fn history(&self, user_id: &str) -> Result<Vec<SavedDiagnosis>, MedviceError> {
        let db = self.db.lock()?;
        Ok(db.list_results_for_user(user_id.trim())?)
    }

    pub fn get_saved(&self, id: &str) -> Result<Option<SavedDiagnosis>, MedviceError> {
        let db = self.db.lock()?;
        Ok(db.get_result(id)?)
    }

    pub fn delete_saved(&self, id: &str) -> Result<bool, MedviceError> {
        let db = self.db.lock()?;
        Ok(db.delete_result(id)?)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Render the email and SMS texts for a saved result.
    pub fn report(&self, id: &str, recipient_name: &str) -> Result<DiagnosisReport, MedviceError> {
        let saved = self
            .get_saved(id)?
            .ok_or_else(|| MedviceError::NotFound(format!("saved diagnosis {}", id)))?;
        Ok(DiagnosisReport::render(&saved, recipient_name, &self.report))
    }
}
