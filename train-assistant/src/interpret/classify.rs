//! Keyword-table intent classification.

use crate::domain::Intent;

/// Ordered keyword table. Row order is priority order: the first intent
/// with a matching phrase wins.
///
/// 1. `train_search`
/// 2. `train_status`
/// 3. `seat_availability`
pub const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::TrainSearch,
        &["show me trains", "train between", "trains from", "train to"],
    ),
    (
        Intent::TrainStatus,
        &["status", "live status", "running status"],
    ),
    (
        Intent::SeatAvailability,
        &["seats", "available", "check seat"],
    ),
];

/// Classify with the built-in table.
///
/// # Examples
///
/// ```
/// use train_assistant::domain::Intent;
/// use train_assistant::interpret::classify;
///
/// assert_eq!(classify("Show trains from Chennai to Delhi"), Intent::TrainSearch);
/// assert_eq!(classify("what's the running status of 12621"), Intent::TrainStatus);
/// assert_eq!(classify("hello"), Intent::Unknown);
/// ```
pub fn classify(text: &str) -> Intent {
    classify_with(INTENT_KEYWORDS, text)
}

/// Classify against an arbitrary ordered table.
pub fn classify_with(table: &[(Intent, &[&str])], text: &str) -> Intent {
    let haystack = text.to_lowercase();
    table
        .iter()
        .find(|(_, phrases)| {
            phrases
                .iter()
                .any(|phrase| haystack.contains(&phrase.to_lowercase()))
        })
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Unknown)
}

/// Labels offered to an external classifier, in table order.
pub fn candidate_labels() -> Vec<&'static str> {
    INTENT_KEYWORDS
        .iter()
        .map(|(intent, _)| intent.as_str())
        .collect()
}

/// The top-ranked label, if it is a known intent scored at or above
/// `threshold`.
///
/// `ranked` is expected best-first, as classifiers return it; only the
/// first entry is considered.
pub fn confident_intent(ranked: &[(String, f64)], threshold: f64) -> Option<Intent> {
    let (label, score) = ranked.first()?;
    if *score < threshold {
        return None;
    }
    Intent::from_label(label).filter(|intent| *intent != Intent::Unknown)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Classification ignores letter case.
        #[test]
        fn case_insensitive(s in "[a-zA-Z ]{0,40}") {
            prop_assert_eq!(classify(&s.to_lowercase()), classify(&s.to_uppercase()));
        }

        /// Appending a search phrase always yields a search.
        #[test]
        fn search_phrase_dominates(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
            let text = format!("{prefix} trains from {suffix}");
            prop_assert_eq!(classify(&text), Intent::TrainSearch);
        }
    }
}
