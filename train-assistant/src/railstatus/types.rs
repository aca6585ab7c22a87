//! Rail-status API response types.

use serde::Deserialize;

use crate::domain::{SearchResult, StationCode};

/// Envelope of a `trainsBetweenStations` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainsBetweenResponse {
    #[serde(default)]
    pub data: Vec<TrainDto>,
}

/// One train as reported by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainDto {
    #[serde(deserialize_with = "number_or_string")]
    pub train_number: String,
    #[serde(default)]
    pub train_name: String,
    /// Scheduled departure at the origin
    #[serde(default)]
    pub from_std: Option<String>,
    /// Scheduled arrival at the destination
    #[serde(default)]
    pub to_sta: Option<String>,
}

/// Train numbers come back as either strings or integers.
fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        other => return Err(serde::de::Error::custom(format!("invalid train number: {other}"))),
    })
}

/// A train running between two stations on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTrain {
    pub train_no: String,
    pub train_name: String,
    pub departure: String,
    pub arrival: String,
}

impl From<TrainDto> for LiveTrain {
    fn from(dto: TrainDto) -> Self {
        Self {
            train_no: dto.train_number,
            train_name: dto.train_name.trim().to_string(),
            departure: dto.from_std.unwrap_or_default(),
            arrival: dto.to_sta.unwrap_or_default(),
        }
    }
}

impl LiveTrain {
    /// Express as a search result between the queried stations.
    pub fn into_result(self, source: &StationCode, destination: &StationCode) -> SearchResult {
        SearchResult {
            train_no: self.train_no,
            train_name: self.train_name,
            source_code: source.clone(),
            destination_code: destination.clone(),
            departure_time: self.departure,
            arrival_time: self.arrival,
        }
    }
}
