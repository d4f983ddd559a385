//! Free-text symptom normalizer.
//!
//! Handles:
//! - Splitting on commas and dropping empty entries
//! - Case folding and space → underscore canonicalization
//! - Optional alias expansion onto vocabulary tokens (empty by default)

use std::collections::HashMap;

/// Normalizer for comma-separated symptom input.
#[derive(Debug, Clone, Default)]
pub struct SymptomNormalizer {
    /// Alias map: normalized spelling → canonical token
    aliases: HashMap<String, String>,
}

impl SymptomNormalizer {
    /// Create a normalizer with no aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer from alias pairs; both sides are normalized.
    pub fn with_aliases<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut normalizer = Self::new();
        for (alias, canonical) in aliases {
            normalizer.add_alias(alias.as_ref(), canonical.as_ref());
        }
        normalizer
    }

    /// Normalize raw input into ordered tokens. Duplicates are kept.
    pub fn normalize(&self, raw: &str) -> Vec<String> {
        raw.split(',')
            .filter_map(normalize_token)
            .map(|token| self.expand_alias(token))
            .collect()
    }

    /// Map a normalized token through the alias table.
    pub fn expand_alias(&self, token: String) -> String {
        match self.aliases.get(&token) {
            Some(canonical) => canonical.clone(),
            None => token,
        }
    }

    /// Add a custom alias mapping. Blank entries are ignored.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        if let (Some(alias), Some(canonical)) = (normalize_token(alias), normalize_token(canonical)) {
            self.aliases.insert(alias, canonical);
        }
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

/// Trim, lowercase and replace each space with an underscore.
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase().replace(' ', "_"))
}
