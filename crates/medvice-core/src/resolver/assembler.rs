//! Builds a dataset-sourced [`DiagnosisResult`] from the auxiliary tables.

use crate::dataset::{AuxiliaryTables, LookupTable};
use crate::models::{title_case, Confidence, DiagnosisResult, DiagnosisSource};

use super::DatasetMatch;

/// Placeholder list used when a table has no row for the condition.
pub const NO_DATA: &str = "No data available";

/// Description used when the description table has no row for the condition.
pub const NO_DESCRIPTION: &str = "Description not available.";

/// Column read from the description table.
const DESCRIPTION_COLUMN: &str = "description";

pub struct ResultAssembler<'a> {
    tables: &'a AuxiliaryTables,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(tables: &'a AuxiliaryTables) -> Self {
        Self { tables }
    }

    pub fn assemble(&self, found: &DatasetMatch, confidence: Confidence) -> DiagnosisResult {
        let condition = found.condition.trim().to_lowercase();

        DiagnosisResult {
            predicted_condition: title_case(&condition),
            description: self.description_for(&condition),
            medications: list_for(&self.tables.medications, &condition),
            diets: list_for(&self.tables.diets, &condition),
            workouts: list_for(&self.tables.workouts, &condition),
            precautions: list_for(&self.tables.precautions, &condition),
            source: DiagnosisSource::Dataset,
            matched_count: found.match_count,
            confidence,
        }
    }

    pub fn description_for(&self, condition: &str) -> String {
        self.tables
            .description
            .rows_for(condition)
            .next()
            .and_then(|row| row.get(DESCRIPTION_COLUMN))
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map_or_else(|| NO_DESCRIPTION.to_string(), str::to_string)
    }
}

/// Flatten every matching row's non-key cells into one list.
///
/// Empty cells and purely numeric cells (row indices, counts) are dropped.
/// List literals are unpacked first and their items filtered the same way, so
/// `[3]` contributes nothing. No matching row at all yields `[NO_DATA]`.
pub fn list_for(table: &LookupTable, condition: &str) -> Vec<String> {
    let mut rows = table.rows_for(condition).peekable();
    if rows.peek().is_none() {
        return vec![NO_DATA.to_string()];
    }

    rows.flat_map(|row| row.values())
        .flat_map(expand_cell)
        .filter(|value| !value.is_empty() && !is_ascii_numeric(value))
        .collect()
}

fn is_ascii_numeric(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

/// Split a cell into trimmed values, unpacking `['a', 'b']` list literals.
fn expand_cell(cell: &str) -> Vec<String> {
    let cell = cell.trim();
    match cell.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        Some(inner) => split_list_literal(inner),
        None => vec![cell.to_string()],
    }
}

fn split_list_literal(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in inner.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'') | (None, '"') => quote = Some(ch),
            (None, ',') => items.push(std::mem::take(&mut current).trim().to_string()),
            (None, c) => current.push(c),
        }
    }
    items.push(current.trim().to_string());
    items
}
