//! Caller intent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the caller is asking for.
///
/// A closed set. Adding a variant means adding a row to the keyword table
/// in [`crate::interpret`]; the classification routine does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TrainSearch,
    SeatAvailability,
    TrainStatus,
    Unknown,
}

impl Intent {
    /// Wire label, e.g. `train_search`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::TrainSearch => "train_search",
            Intent::SeatAvailability => "seat_availability",
            Intent::TrainStatus => "train_status",
            Intent::Unknown => "unknown",
        }
    }

    /// Parse a wire label. Unrecognised labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "train_search" => Some(Intent::TrainSearch),
            "seat_availability" => Some(Intent::SeatAvailability),
            "train_status" => Some(Intent::TrainStatus),
            "unknown" => Some(Intent::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_roundtrip() {
        for intent in [
            Intent::TrainSearch,
            Intent::SeatAvailability,
            Intent::TrainStatus,
            Intent::Unknown,
        ] {
            assert_eq!(Intent::from_label(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::from_label("book_ticket"), None);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Intent::SeatAvailability).unwrap();
        assert_eq!(json, "\"seat_availability\"");
    }
}
