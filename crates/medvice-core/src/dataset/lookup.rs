//! Auxiliary per-condition tables (description, medications, diets, ...).

use std::io::Read;
use std::path::Path;

use super::{normalize_header, normalize_key, open_reader, DatasetError, DatasetResult};

/// Name of the key column in every auxiliary table.
pub const KEY_COLUMN: &str = "disease";

/// One row of an auxiliary table.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRow {
    /// Disease label as written in the file
    pub disease: String,
    /// Non-key cells in column order, paired with their normalized header
    pub cells: Vec<(String, String)>,
    key: String,
}

impl LookupRow {
    pub fn new(disease: impl Into<String>, cells: Vec<(String, String)>) -> Self {
        let disease = disease.into();
        Self {
            key: normalize_key(&disease),
            disease,
            cells,
        }
    }

    /// Value of a named column (header matched case-insensitively).
    pub fn get(&self, column: &str) -> Option<&str> {
        let column = normalize_header(column);
        self.cells
            .iter()
            .find(|(header, _)| *header == column)
            .map(|(_, value)| value.as_str())
    }

    /// Non-key values in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, value)| value.as_str())
    }
}

/// Table keyed by disease name, matched case- and whitespace-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    rows: Vec<LookupRow>,
}

impl LookupTable {
    pub fn new(rows: Vec<LookupRow>) -> Self {
        Self { rows }
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
        let key_index = headers
            .iter()
            .position(|h| h == KEY_COLUMN)
            .ok_or_else(|| DatasetError::MissingColumn {
                table: name.to_string(),
                column: KEY_COLUMN.to_string(),
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let disease = record.get(key_index).unwrap_or("").trim();
            if disease.is_empty() {
                continue;
            }
            let cells = headers
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != key_index)
                .map(|(index, header)| {
                    (header.clone(), record.get(index).unwrap_or("").to_string())
                })
                .collect();
            rows.push(LookupRow::new(disease, cells));
        }

        log::debug!("{}: loaded {} rows", name, rows.len());
        Ok(Self::new(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows whose key matches `condition`, in file order.
    pub fn rows_for<'a>(&'a self, condition: &str) -> impl Iterator<Item = &'a LookupRow> + 'a {
        let key = normalize_key(condition);
        self.rows.iter().filter(move |row| row.key == key)
    }
}
