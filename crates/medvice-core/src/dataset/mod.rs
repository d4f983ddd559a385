//! Static reference data: the symptom matrix and per-condition lookup tables.
//!
//! Loaded once at startup into a [`KnowledgeBase`] and shared by reference;
//! nothing here is mutated after loading.

mod lookup;
mod matrix;

pub use lookup::*;
pub use matrix::*;

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::DatasetConfig;

/// Dataset loading errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Cannot open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table {table} has no '{column}' column")]
    MissingColumn { table: String, column: String },

    #[error("Malformed dataset: {0}")]
    Malformed(String),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// The five per-condition side tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuxiliaryTables {
    pub description: LookupTable,
    pub medications: LookupTable,
    pub diets: LookupTable,
    pub workouts: LookupTable,
    pub precautions: LookupTable,
}

/// Everything the dataset side of the resolver reads.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    pub matrix: SymptomMatrix,
    pub tables: AuxiliaryTables,
}

impl KnowledgeBase {
    pub fn new(matrix: SymptomMatrix, tables: AuxiliaryTables) -> Self {
        Self { matrix, tables }
    }

    /// Load every dataset file named by `config`.
    pub fn load(config: &DatasetConfig) -> DatasetResult<Self> {
        let matrix = SymptomMatrix::from_path(&config.training_path())?;
        let tables = AuxiliaryTables {
            description: LookupTable::from_path(&config.description_path())?,
            medications: LookupTable::from_path(&config.medications_path())?,
            diets: LookupTable::from_path(&config.diets_path())?,
            workouts: LookupTable::from_path(&config.workouts_path())?,
            precautions: LookupTable::from_path(&config.precautions_path())?,
        };

        log::info!(
            "Knowledge base loaded from {}: {} conditions, {} symptoms",
            config.dir.display(),
            matrix.conditions.len(),
            matrix.vocabulary.len()
        );

        Ok(Self::new(matrix, tables))
    }
}

/// Headers are compared trimmed and lowercased.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Condition keys are compared trimmed and lowercased.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn open_reader(path: &Path) -> DatasetResult<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })
}
