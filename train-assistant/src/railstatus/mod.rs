//! Optional live rail-status collaborator.
//!
//! Supplements the offline timetable with trains a live API reports for a
//! specific journey date.

mod client;
mod error;
mod types;

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::StationCode;

pub use client::{RailStatusClient, RailStatusConfig};
pub use error::RailStatusError;
pub use types::LiveTrain;

/// Source of live trains between two stations.
///
/// This abstraction allows both the real client and the cached wrapper (and
/// test doubles) to be used by the assistant.
pub trait RailStatus: Send + Sync {
    /// Trains running from `source` to `destination` on `date`.
    fn trains_between(
        &self,
        source: &StationCode,
        destination: &StationCode,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<LiveTrain>, RailStatusError>> + Send;
}
