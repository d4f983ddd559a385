//! Golden and property tests for the symptom resolver.
//!
//! The golden cases pin normalization of real-world inputs; the properties
//! check the normalizer and matcher over generated data.

use medvice_core::dataset::SymptomMatrix;
use medvice_core::models::{ConditionRecord, SymptomVocabulary};
use medvice_core::resolver::{DatasetMatcher, MatchOutcome, SymptomNormalizer};
use proptest::prelude::*;

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    input: &'static str,
    expected: &'static [&'static str],
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "comma-separated",
            input: "itching, skin_rash, fatigue",
            expected: &["itching", "skin_rash", "fatigue"],
        },
        GoldenCase {
            id: "mixed-case-with-spaces",
            input: "Skin Rash,High Fever , NODAL skin eruptions",
            expected: &["skin_rash", "high_fever", "nodal_skin_eruptions"],
        },
        GoldenCase {
            id: "empty-entries",
            input: ",, cough ,,",
            expected: &["cough"],
        },
        GoldenCase {
            id: "duplicates-kept",
            input: "cough,cough",
            expected: &["cough", "cough"],
        },
        GoldenCase {
            id: "double-space",
            input: "stomach  pain",
            expected: &["stomach__pain"],
        },
        GoldenCase {
            id: "tabs-trimmed",
            input: "\tvomiting\t, headache\n",
            expected: &["vomiting", "headache"],
        },
        GoldenCase {
            id: "empty-input",
            input: "",
            expected: &[],
        },
        GoldenCase {
            id: "whitespace-only",
            input: "   ",
            expected: &[],
        },
    ]
}

#[test]
fn test_golden_normalization() {
    let normalizer = SymptomNormalizer::new();

    for case in get_golden_cases() {
        assert_eq!(
            normalizer.normalize(case.input),
            case.expected,
            "Case {}: tokens mismatch",
            case.id
        );
    }
}

proptest! {
    #[test]
    fn prop_tokens_are_canonical(raw in "[ a-zA-Z_,\t]{0,60}") {
        let tokens = SymptomNormalizer::new().normalize(&raw);

        let non_blank_segments = raw.split(',').filter(|s| !s.trim().is_empty()).count();
        prop_assert_eq!(tokens.len(), non_blank_segments);

        for token in &tokens {
            prop_assert!(!token.is_empty());
            prop_assert!(!token.contains(','));
            prop_assert!(!token.contains(' '));
            prop_assert!(!token.chars().any(|c| c.is_ascii_uppercase()));
            prop_assert_eq!(token.trim(), token.as_str());
        }
    }

    #[test]
    fn prop_normalize_is_idempotent(raw in "[ a-zA-Z_,]{0,60}") {
        let normalizer = SymptomNormalizer::new();
        let once = normalizer.normalize(&raw);
        let twice = normalizer.normalize(&once.join(","));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_best_match_is_first_maximum(
        rows in prop::collection::vec(prop::collection::vec(0u32..=1, 5), 1..12),
        picks in prop::collection::vec(0usize..5, 1..8),
    ) {
        let vocabulary = SymptomVocabulary::new(["s0", "s1", "s2", "s3", "s4"]);
        let conditions: Vec<ConditionRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, presence)| ConditionRecord::new(format!("c{}", i), presence.clone()))
            .collect();
        let matrix = SymptomMatrix::new(vocabulary, conditions);
        let matcher = DatasetMatcher::new(&matrix);

        let tokens: Vec<String> = picks.iter().map(|i| format!("s{}", i)).collect();
        let scores: Vec<u32> = rows
            .iter()
            .map(|presence| picks.iter().map(|&i| presence[i]).sum())
            .collect();
        let best = scores.iter().copied().max().unwrap_or(0);

        match matcher.find_best_match(&tokens) {
            MatchOutcome::Matched(found) => {
                let first_best = scores.iter().position(|&s| s == best).unwrap();
                prop_assert_eq!(found.condition, format!("c{}", first_best));
                prop_assert_eq!(found.match_count, best);
                prop_assert!(found.alternatives.iter().all(|alt| alt.match_count > 0 && alt.match_count <= best));
            }
            MatchOutcome::NoMatch(_) => {
                prop_assert_eq!(best, 0);
            }
        }

        prop_assert_eq!(matcher.find_best_match(&tokens), matcher.find_best_match(&tokens));
    }
}
