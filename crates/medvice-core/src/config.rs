//! Application settings, defaults and TOML persistence.
//!
//! Every section implements `Default`, so a missing file or a partial file
//! both load. Secrets and deployment paths can be overridden from the
//! environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use medvice_llm::AiConfig;

/// Environment variable holding the chat-completion API key.
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the dataset directory.
pub const ENV_DATASET_DIR: &str = "MEDVICE_DATASET_DIR";
/// Environment variable overriding the SQLite database path.
pub const ENV_DB_PATH: &str = "MEDVICE_DB_PATH";

/// Location of the symptom matrix and auxiliary tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Directory the file names below are resolved against.
    pub dir: PathBuf,
    pub training: String,
    pub description: String,
    pub medications: String,
    pub diets: String,
    pub workouts: String,
    pub precautions: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("datasets"),
            training: "Training.csv".into(),
            description: "description.csv".into(),
            medications: "medications.csv".into(),
            diets: "diets.csv".into(),
            workouts: "workout_df.csv".into(),
            precautions: "precautions_df.csv".into(),
        }
    }
}

impl DatasetConfig {
    /// Config with default file names under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn training_path(&self) -> PathBuf {
        self.dir.join(&self.training)
    }

    pub fn description_path(&self) -> PathBuf {
        self.dir.join(&self.description)
    }

    pub fn medications_path(&self) -> PathBuf {
        self.dir.join(&self.medications)
    }

    pub fn diets_path(&self) -> PathBuf {
        self.dir.join(&self.diets)
    }

    pub fn workouts_path(&self) -> PathBuf {
        self.dir.join(&self.workouts)
    }

    pub fn precautions_path(&self) -> PathBuf {
        self.dir.join(&self.precautions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file for saved results.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("medvice.db"),
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Offset applied to timestamps shown in reports (default IST, +05:30).
    pub utc_offset_minutes: i32,
    /// Sign-off line at the end of the email body.
    pub signature: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 330,
            signature: "Team MedVice".into(),
        }
    }
}

/// Extra symptom spellings mapped onto vocabulary tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub aliases: BTreeMap<String, String>,
}

/// Top-level configuration, serialized as `medvice.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedviceConfig {
    pub datasets: DatasetConfig,
    pub ai: AiConfig,
    pub database: DatabaseConfig,
    pub report: ReportConfig,
    pub normalizer: NormalizerConfig,
}

impl MedviceConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.ai.api_key = Some(key);
        }
        if let Some(dir) = get(ENV_DATASET_DIR) {
            self.datasets.dir = PathBuf::from(dir);
        }
        if let Some(path) = get(ENV_DB_PATH) {
            self.database.path = PathBuf::from(path);
        }
    }
}
