//! Per-request query values.

use chrono::NaiveDate;

use super::{Intent, StationCode};

/// Entities resolved from one query. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedEntities {
    pub source_code: Option<StationCode>,
    pub destination_code: Option<StationCode>,
    pub date: Option<NaiveDate>,
    /// Digit-only train number.
    pub train_no: Option<String>,
}

impl ExtractedEntities {
    /// Both endpoints, if both resolved.
    pub fn endpoints(&self) -> Option<(&StationCode, &StationCode)> {
        Some((self.source_code.as_ref()?, self.destination_code.as_ref()?))
    }

    /// ISO `YYYY-MM-DD` rendering of the date.
    pub fn iso_date(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

/// One train connecting the requested stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub train_no: String,
    pub train_name: String,
    pub source_code: StationCode,
    pub destination_code: StationCode,
    /// Raw departure time at the source stop.
    pub departure_time: String,
    /// Raw arrival time at the destination stop.
    pub arrival_time: String,
}

/// The fully interpreted answer to one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub intent: Intent,
    pub entities: ExtractedEntities,
    pub trains: Vec<SearchResult>,
}

impl Answer {
    /// The answer for an empty or malformed request.
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            entities: ExtractedEntities::default(),
            trains: Vec::new(),
        }
    }
}
