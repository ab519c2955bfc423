//! Name-similarity scoring for record equivalence.
//!
//! Uses Levenshtein edit distance as the base signal with boosts for
//! substring containment and shared words. Scores are percentages in
//! `[0, 100]`; an exact match (after normalization) is always 100.

use std::collections::BTreeSet;

use rapidfuzz::distance::levenshtein;

/// Score the similarity of two record names.
///
/// Both inputs are trimmed and lowercased before comparison. Identical
/// normalized strings score exactly 100 (this covers the degenerate case
/// of two empty inputs, which would otherwise divide by zero). Otherwise
/// the base score is `(L - d) / L * 100` for edit distance `d` and
/// `L = max(len(a), len(b))`, adjusted by:
///
/// - +10 when one normalized string contains the other, capped at 100;
/// - else +`shared / max_words * 20` when the two share whitespace-split
///   words (each shared word counted once), capped at 100.
///
/// Deterministic, no side effects, `O(len(a) * len(b))`.
pub fn score(a: &str, b: &str) -> f32 {
    let left = normalize(a);
    let right = normalize(b);
    if left == right {
        return 100.0;
    }

    let len = left.chars().count().max(right.chars().count());
    let distance = levenshtein::distance(left.chars(), right.chars());
    let base = (len - distance) as f32 / len as f32 * 100.0;

    if left.contains(&right) || right.contains(&left) {
        return (base + 10.0).min(100.0);
    }

    let left_words: BTreeSet<&str> = left.split_whitespace().collect();
    let right_words: BTreeSet<&str> = right.split_whitespace().collect();
    let shared = left_words.intersection(&right_words).count();
    if shared > 0 {
        let max_words = left
            .split_whitespace()
            .count()
            .max(right.split_whitespace().count());
        return (base + shared as f32 / max_words as f32 * 20.0).min(100.0);
    }

    base.max(0.0)
}

/// Normalize a name for comparison: trim and lowercase.
fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Confidence level categories for match quality assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceLevel {
    /// Below the medium threshold; needs manual verification.
    Low,
    /// Between the medium and high thresholds; should be reviewed.
    Medium,
    /// At or above the high threshold; near-certain.
    High,
}

impl ConfidenceLevel {
    /// Returns a human-readable description of the confidence level.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }
}

/// Boundaries between confidence levels, on the 0-100 scale.
///
/// The defaults preserve the conventional three-bucket display split:
/// scores at or above `high` are [`ConfidenceLevel::High`], scores at or
/// above `medium` are [`ConfidenceLevel::Medium`], everything else is
/// [`ConfidenceLevel::Low`].
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceThresholds {
    /// Minimum score for high-confidence matches (default: 80).
    pub high: f32,
    /// Minimum score for medium-confidence matches (default: 60).
    pub medium: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 80.0,
            medium: 60.0,
        }
    }
}

impl ConfidenceThresholds {
    /// Categorize a score into a confidence level.
    #[must_use]
    pub fn categorize(&self, confidence: f32) -> ConfidenceLevel {
        if confidence >= self.high {
            ConfidenceLevel::High
        } else if confidence >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_names_score_exactly_100() {
        assert_eq!(score("Chicken Wings", "Chicken Wings"), 100.0);
    }

    #[test]
    fn normalization_ignores_case_and_whitespace() {
        assert_eq!(score("  chicken wings ", "CHICKEN WINGS"), 100.0);
    }

    #[test]
    fn both_empty_is_treated_as_exact_match() {
        assert_eq!(score("", "   "), 100.0);
    }

    #[test]
    fn shared_word_boost_lands_between_thresholds() {
        let s = score("Mozzarella Sticks", "Cheese Sticks");
        assert!(s > 30.0, "expected > 30, got {s}");
        assert!(s < 100.0, "expected < 100, got {s}");
    }

    #[test]
    fn substring_containment_gets_a_boost() {
        let with_boost = score("Chicken Wings", "Wings");
        let plain = {
            // Same length ratio but no containment or shared words.
            score("Chicken Wings", "Wxngz")
        };
        assert!(with_boost > plain);
    }

    #[test]
    fn disjoint_names_stay_low() {
        let s = score("Espresso", "Caesar Salad");
        assert!(s < 30.0, "expected < 30, got {s}");
    }

    #[test]
    fn score_is_symmetric() {
        let pairs = [
            ("Chicken Wings", "Wings"),
            ("Mozzarella Sticks", "Cheese Sticks"),
            ("French Fries", "Fries with Ketchup"),
            ("", "Soup"),
        ];
        for (a, b) in pairs {
            assert_eq!(score(a, b), score(b, a), "asymmetric for {a:?} vs {b:?}");
        }
    }

    #[test]
    fn score_never_leaves_range() {
        let samples = ["", "a", "Chicken Wings", "a very long menu item name indeed"];
        for a in samples {
            for b in samples {
                let s = score(a, b);
                assert!((0.0..=100.0).contains(&s), "{a:?} vs {b:?} scored {s}");
            }
        }
    }

    #[test]
    fn default_thresholds_follow_three_bucket_convention() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.categorize(80.0), ConfidenceLevel::High);
        assert_eq!(thresholds.categorize(79.9), ConfidenceLevel::Medium);
        assert_eq!(thresholds.categorize(60.0), ConfidenceLevel::Medium);
        assert_eq!(thresholds.categorize(59.9), ConfidenceLevel::Low);
    }
}
