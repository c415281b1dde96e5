//! Keyword-based local sentiment classifier.
//!
//! Deterministic fallback used when the AI gateway returns output we cannot
//! parse. Matching is substring containment over the lowercased text, not
//! tokenization, so a list word inside a longer word still counts.

use db::models::feedback::SentimentLabel;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "excellent",
    "love",
    "thank",
    "good",
    "awesome",
    "amazing",
    "helpful",
    "fantastic",
    "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "hate",
    "broken",
    "awful",
    "poor",
    "worst",
    "horrible",
    "useless",
    "disappointing",
];

const POSITIVE_SCORE: f64 = 0.7;
const NEGATIVE_SCORE: f64 = -0.7;

/// A sentiment label together with its numeric score in [-1.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub struct Classification {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Classification {
    pub const NEUTRAL: Self = Self {
        label: SentimentLabel::Neutral,
        score: 0.0,
    };
}

/// Classify `text` by counting distinct positive and negative list words it
/// contains. Empty or whitespace-only input is neutral without scanning.
pub fn classify(text: &str) -> Classification {
    if text.trim().is_empty() {
        return Classification::NEUTRAL;
    }

    let lowered = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lowered.contains(**w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lowered.contains(**w)).count();

    if positive > negative {
        Classification {
            label: SentimentLabel::Positive,
            score: POSITIVE_SCORE,
        }
    } else if negative > positive {
        Classification {
            label: SentimentLabel::Negative,
            score: NEGATIVE_SCORE,
        }
    } else {
        Classification::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_are_neutral() {
        assert_eq!(classify(""), Classification::NEUTRAL);
        assert_eq!(classify("   \t\n  "), Classification::NEUTRAL);
    }

    #[test]
    fn more_positive_words_is_positive() {
        let result = classify("This is great, thank you!");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 0.7);
    }

    #[test]
    fn more_negative_words_is_negative() {
        let result = classify("This is terrible and broken");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.score, -0.7);
    }

    #[test]
    fn no_listed_words_is_neutral() {
        let result = classify("It arrived on Tuesday");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn tie_is_neutral() {
        let result = classify("great but terrible");
        assert_eq!(result, Classification::NEUTRAL);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        assert_eq!(classify("GREAT").label, SentimentLabel::Positive);
        // "hate" inside "hates" still counts.
        assert_eq!(classify("everyone hates this").label, SentimentLabel::Negative);
    }
}
