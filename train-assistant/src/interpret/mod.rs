//! Query interpretation.
//!
//! Classifies what a free-text query asks for and slices out the spans that
//! name stations, a date and a train number. Nothing here resolves a span;
//! see [`crate::stations`] for station mentions and [`parse_date`] for dates.

mod classify;
mod dates;
mod extract;

pub use classify::{INTENT_KEYWORDS, candidate_labels, classify, classify_with, confident_intent};
pub use dates::parse_date;
pub use extract::{RawEntities, extract};
