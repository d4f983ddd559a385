//! Condition ranking over the symptom matrix.
//!
//! Each condition scores the sum of its presence flags over the matched
//! symptoms. Ranking is a stable descending sort, so ties go to the condition
//! that appears first in the dataset.

use crate::dataset::SymptomMatrix;
use crate::models::ScoredCondition;

/// Number of runner-up conditions reported alongside the best match.
pub const MAX_ALTERNATIVES: usize = 4;

/// A condition selected from the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMatch {
    /// Condition label as written in the dataset
    pub condition: String,
    pub match_count: u32,
    /// Submitted tokens found in the vocabulary, duplicates kept
    pub matched_symptoms: Vec<String>,
    pub alternatives: Vec<ScoredCondition>,
}

/// Why the matrix could not produce a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason {
    /// No submitted token is in the vocabulary.
    NoKnownSymptoms,
    /// Known symptoms were submitted but no condition exhibits any of them.
    ZeroOverlap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(DatasetMatch),
    NoMatch(NoMatchReason),
}

/// Matcher over a loaded symptom matrix.
pub struct DatasetMatcher<'a> {
    matrix: &'a SymptomMatrix,
}

impl<'a> DatasetMatcher<'a> {
    pub fn new(matrix: &'a SymptomMatrix) -> Self {
        Self { matrix }
    }

    /// Tokens present in the vocabulary, in submission order.
    pub fn matched_symptoms(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|token| self.matrix.vocabulary.contains(token))
            .cloned()
            .collect()
    }

    /// Score every condition against `matched` and rank them, best first.
    pub fn rank(&self, matched: &[String]) -> Vec<ScoredCondition> {
        let positions: Vec<usize> = matched
            .iter()
            .filter_map(|symptom| self.matrix.vocabulary.position(symptom))
            .collect();

        let mut scored: Vec<ScoredCondition> = self
            .matrix
            .conditions
            .iter()
            .map(|record| ScoredCondition {
                name: record.name.clone(),
                match_count: positions
                    .iter()
                    .fold(0u32, |acc, &p| acc.saturating_add(record.presence_at(p))),
            })
            .collect();

        // sort_by is stable: equal counts keep dataset order
        scored.sort_by(|a, b| b.match_count.cmp(&a.match_count));
        scored
    }

    /// Pick the best condition for normalized `tokens`.
    pub fn find_best_match(&self, tokens: &[String]) -> MatchOutcome {
        let matched_symptoms = self.matched_symptoms(tokens);
        if matched_symptoms.is_empty() {
            return MatchOutcome::NoMatch(NoMatchReason::NoKnownSymptoms);
        }

        let mut ranked = self.rank(&matched_symptoms).into_iter();
        let best = match ranked.next() {
            Some(best) if best.match_count > 0 => best,
            _ => return MatchOutcome::NoMatch(NoMatchReason::ZeroOverlap),
        };

        let alternatives = ranked
            .take_while(|candidate| candidate.match_count > 0)
            .take(MAX_ALTERNATIVES)
            .collect();

        MatchOutcome::Matched(DatasetMatch {
            condition: best.name,
            match_count: best.match_count,
            matched_symptoms,
            alternatives,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConditionRecord, SymptomVocabulary};

    fn matrix() -> SymptomMatrix {
        SymptomMatrix::new(
            SymptomVocabulary::new(["itching", "skin_rash", "fatigue", "cough"]),
            vec![
                ConditionRecord::new("Fungal infection", vec![1, 1, 0, 0]),
                ConditionRecord::new("Allergy", vec![1, 0, 1, 0]),
                ConditionRecord::new("Hypothyroidism", vec![0, 0, 1, 0]),
                ConditionRecord::new("Common Cold", vec![0, 0, 1, 1]),
            ],
        )
    }

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn expect_match(outcome: MatchOutcome) -> DatasetMatch {
        match outcome {
            MatchOutcome::Matched(m) => m,
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_best_match() {
        let matrix = matrix();
        let matcher = DatasetMatcher::new(&matrix);

        let m = expect_match(matcher.find_best_match(&tokens(&["itching", "skin_rash", "fatigue"])));
        // Fungal infection and Allergy both score 2; dataset order wins
        assert_eq!(m.condition, "Fungal infection");
        assert_eq!(m.match_count, 2);
        assert_eq!(m.matched_symptoms, tokens(&["itching", "skin_rash", "fatigue"]));
        assert_eq!(
            m.alternatives,
            vec![
                ScoredCondition { name: "Allergy".into(), match_count: 2 },
                ScoredCondition { name: "Hypothyroidism".into(), match_count: 1 },
                ScoredCondition { name: "Common Cold".into(), match_count: 1 },
            ]
        );
    }

    #[test]
    fn test_unknown_tokens_discarded() {
        let matrix = matrix();
        let matcher = DatasetMatcher::new(&matrix);

        let m = expect_match(matcher.find_best_match(&tokens(&["xyz", "cough"])));
        assert_eq!(m.condition, "Common Cold");
        assert_eq!(m.match_count, 1);
        assert_eq!(m.matched_symptoms, tokens(&["cough"]));
        assert!(m.alternatives.is_empty());
    }

    #[test]
    fn test_no_known_symptoms() {
        let matrix = matrix();
        let matcher = DatasetMatcher::new(&matrix);
        assert_eq!(
            matcher.find_best_match(&tokens(&["xyz_unknown_symptom"])),
            MatchOutcome::NoMatch(NoMatchReason::NoKnownSymptoms)
        );
        assert_eq!(
            matcher.find_best_match(&[]),
            MatchOutcome::NoMatch(NoMatchReason::NoKnownSymptoms)
        );
    }

    #[test]
    fn test_zero_overlap() {
        let matrix = SymptomMatrix::new(
            SymptomVocabulary::new(["cough", "rare_sign"]),
            vec![ConditionRecord::new("Common Cold", vec![1, 0])],
        );
        let matcher = DatasetMatcher::new(&matrix);
        assert_eq!(
            matcher.find_best_match(&tokens(&["rare_sign"])),
            MatchOutcome::NoMatch(NoMatchReason::ZeroOverlap)
        );
    }

    #[test]
    fn test_duplicates_inflate_count() {
        let matrix = matrix();
        let matcher = DatasetMatcher::new(&matrix);

        let m = expect_match(matcher.find_best_match(&tokens(&["cough", "cough", "cough"])));
        assert_eq!(m.condition, "Common Cold");
        assert_eq!(m.match_count, 3);
    }

    #[test]
    fn test_oversized_presence_saturates() {
        let matrix = SymptomMatrix::new(
            SymptomVocabulary::new(["cough", "fever"]),
            vec![ConditionRecord::new("Cold", vec![u32::MAX, u32::MAX])],
        );
        let best = expect_match(DatasetMatcher::new(&matrix).find_best_match(&tokens(&["cough", "fever"])));
        assert_eq!(best.match_count, u32::MAX);
    }

    #[test]
    fn test_deterministic() {
        let matrix = matrix();
        let matcher = DatasetMatcher::new(&matrix);
        let input = tokens(&["fatigue", "itching"]);

        let first = matcher.find_best_match(&input);
        for _ in 0..10 {
            assert_eq!(matcher.find_best_match(&input), first);
        }
        assert_eq!(expect_match(first).condition, "Allergy");
    }

    #[test]
    fn test_alternatives_capped() {
        let conditions = (0..8)
            .map(|i| ConditionRecord::new(format!("Condition {}", i), vec![1]))
            .collect();
        let matrix = SymptomMatrix::new(SymptomVocabulary::new(["fever"]), conditions);
        let matcher = DatasetMatcher::new(&matrix);

        let m = expect_match(matcher.find_best_match(&tokens(&["fever"])));
        assert_eq!(m.condition, "Condition 0");
        assert_eq!(m.alternatives.len(), MAX_ALTERNATIVES);
        assert_eq!(m.alternatives[0].name, "Condition 1");
    }
}
