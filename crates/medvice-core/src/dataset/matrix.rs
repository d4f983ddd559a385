//! Symptom/condition matrix (`Training.csv`).

use std::io::Read;
use std::path::Path;

use crate::models::{ConditionRecord, SymptomVocabulary};

use super::{normalize_header, open_reader, DatasetError, DatasetResult};

/// Name of the condition label column.
pub const LABEL_COLUMN: &str = "prognosis";

/// The symptom vocabulary and one presence row per condition, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomMatrix {
    pub vocabulary: SymptomVocabulary,
    pub conditions: Vec<ConditionRecord>,
}

impl SymptomMatrix {
    pub fn new(vocabulary: SymptomVocabulary, conditions: Vec<ConditionRecord>) -> Self {
        Self {
            vocabulary,
            conditions,
        }
    }

    pub fn from_path(path: &Path) -> DatasetResult<Self> {
        let reader = open_reader(path)?;
        Self::parse(reader, &path.display().to_string())
    }

    pub fn from_reader<R: Read>(reader: R, name: &str) -> DatasetResult<Self> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        Self::parse(reader, name)
    }

    fn parse<R: Read>(mut reader: csv::Reader<R>, name: &str) -> DatasetResult<Self> {
        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        if headers.is_empty() {
            return Err(DatasetError::Malformed(format!("{}: no columns", name)));
        }

        // Label column by name, else the last column.
        let label_index = headers
            .iter()
            .position(|h| h == LABEL_COLUMN)
            .unwrap_or(headers.len() - 1);

        let mut symptom_names = Vec::new();
        let mut symptom_columns = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            if index == label_index || header.is_empty() || symptom_names.contains(header) {
                continue;
            }
            symptom_names.push(header.clone());
            symptom_columns.push(index);
        }

        if symptom_columns.is_empty() {
            return Err(DatasetError::Malformed(format!("{}: no symptom columns", name)));
        }

        let mut conditions = Vec::new();
        for (row_number, record) in reader.records().enumerate() {
            let record = record?;
            let label = record.get(label_index).unwrap_or("").trim();
            if label.is_empty() {
                log::warn!("{}: row {} has no condition label, skipped", name, row_number + 2);
                continue;
            }

            let presence = symptom_columns
                .iter()
                .map(|&column| {
                    let cell = record.get(column).unwrap_or("");
                    parse_presence(cell).ok_or_else(|| {
                        DatasetError::Malformed(format!(
                            "{}: row {}, column '{}': invalid presence value '{}'",
                            name,
                            row_number + 2,
                            headers[column],
                            cell.trim()
                        ))
                    })
                })
                .collect::<DatasetResult<Vec<u32>>>()?;

            conditions.push(ConditionRecord::new(label, presence));
        }

        if conditions.is_empty() {
            return Err(DatasetError::Malformed(format!("{}: no condition rows", name)));
        }

        log::debug!(
            "{}: loaded {} conditions over {} symptoms",
            name,
            conditions.len(),
            symptom_names.len()
        );

        Ok(Self::new(SymptomVocabulary::new(symptom_names), conditions))
    }
}

/// Presence is 0 or 1. Blank cells read as 0; `1.0` style floats are accepted.
fn parse_presence(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0);
    }
    let value = match cell.parse::<u32>() {
        Ok(value) => value,
        Err(_) => {
            let value = cell.parse::<f64>().ok()?;
            if value == 0.0 {
                0
            } else if value == 1.0 {
                1
            } else {
                return None;
            }
        }
    };
    (value <= 1).then_some(value)
}
