//! Static timetable loading and lookup.
//!
//! Raw stop records (a mapping keyed by train number, or a flat list) are
//! normalized into [`Route`]s and a [`StationIndex`]. The resulting
//! [`Store`] is immutable; [`TimetableHandle`] shares it across requests and
//! supports wholesale reloads.

mod error;
mod handle;
mod raw;
mod store;

pub use error::LoadError;
pub use handle::TimetableHandle;
pub use raw::RawStop;
pub use store::{Route, StationIndex, Stop, Store};
