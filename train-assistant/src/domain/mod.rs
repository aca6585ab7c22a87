//! Domain types for the train query assistant.
//!
//! Validated values shared by the timetable, resolver, interpreter and
//! search layers. Types enforce their invariants at construction time.

mod intent;
mod query;
mod station;
mod time;

pub use intent::Intent;
pub use query::{Answer, ExtractedEntities, SearchResult};
pub use station::{InvalidStationCode, StationCode};
pub use time::{ClockTime, TimeError, compare_raw_times};
