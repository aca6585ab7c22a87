//! Route search over the static timetable.
//!
//! Answers "which trains run from here to there?" by scanning every route
//! for a call at the source followed by a call at the destination. The
//! search is a pure function of the store and the two codes.

mod search;

pub use search::{search, sort_by_departure};
