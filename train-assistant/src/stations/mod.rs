//! Station mention resolution.
//!
//! Turns free-text station mentions ("new delhi", "Chennai", "MAS") into
//! canonical station codes using the index built by the timetable store.

mod resolver;

pub use resolver::{DEFAULT_FUZZY_CUTOFF, MatchKind, Resolved, StationResolver, similarity};
