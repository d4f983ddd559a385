//! Match-ratio confidence.

use crate::models::Confidence;

/// `matchCount / submitted * 100`, rounded to two decimals with exact halves
/// going to the even digit (`3.125` becomes `3.12`).
///
/// `submitted` counts every normalized token, recognized or not. Nothing is
/// capped: repeated symptoms can push the ratio past 100.
pub fn confidence_percent(match_count: u32, submitted: usize) -> Confidence {
    if submitted == 0 {
        return Confidence::NotAvailable;
    }
    let ratio = f64::from(match_count) / submitted as f64 * 100.0;
    Confidence::Percent(round2(ratio))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratios() {
        assert_eq!(confidence_percent(3, 4), Confidence::Percent(75.0));
        assert_eq!(confidence_percent(2, 3), Confidence::Percent(66.67));
        assert_eq!(confidence_percent(1, 3), Confidence::Percent(33.33));
        assert_eq!(confidence_percent(4, 4), Confidence::Percent(100.0));
    }

    #[test]
    fn test_halves_round_to_even() {
        assert_eq!(confidence_percent(1, 32), Confidence::Percent(3.12));
        assert_eq!(confidence_percent(1, 160), Confidence::Percent(0.62));
        assert_eq!(confidence_percent(3, 32), Confidence::Percent(9.38));
    }

    #[test]
    fn test_not_capped() {
        assert_eq!(confidence_percent(3, 2), Confidence::Percent(150.0));
    }

    #[test]
    fn test_no_tokens() {
        assert_eq!(confidence_percent(0, 0), Confidence::NotAvailable);
    }

    #[test]
    fn test_display() {
        assert_eq!(confidence_percent(2, 3).to_string(), "66.67%");
        assert_eq!(confidence_percent(3, 4).to_string(), "75.0%");
    }
}
