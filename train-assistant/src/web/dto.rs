//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Answer, ExtractedEntities, Intent, SearchResult};

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Free-text query
    #[serde(default)]
    pub message: Option<String>,
}

/// Chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Classified intent (`train_search`, `train_status`, ...)
    pub intent: Intent,

    /// Resolved entities; absent ones serialize as `null`
    pub entities: EntitiesResult,

    /// Matching trains, earliest departure first
    pub trains: Vec<TrainResult>,
}

/// Entities in a chat response.
#[derive(Debug, Serialize)]
pub struct EntitiesResult {
    /// Source station code
    pub source: Option<String>,

    /// Destination station code
    pub destination: Option<String>,

    /// Travel date as `YYYY-MM-DD`
    pub date: Option<String>,

    /// Train number
    pub train_no: Option<String>,
}

/// A train in a chat response.
#[derive(Debug, Serialize)]
pub struct TrainResult {
    pub train_no: String,
    pub train_name: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
}

impl EntitiesResult {
    fn from_entities(entities: &ExtractedEntities) -> Self {
        Self {
            source: entities.source_code.as_ref().map(|c| c.to_string()),
            destination: entities.destination_code.as_ref().map(|c| c.to_string()),
            date: entities.iso_date(),
            train_no: entities.train_no.clone(),
        }
    }
}

impl TrainResult {
    fn from_result(result: SearchResult) -> Self {
        Self {
            train_no: result.train_no,
            train_name: result.train_name,
            source: result.source_code.to_string(),
            destination: result.destination_code.to_string(),
            departure_time: result.departure_time,
            arrival_time: result.arrival_time,
        }
    }
}

impl From<Answer> for ChatResponse {
    fn from(answer: Answer) -> Self {
        Self {
            intent: answer.intent,
            entities: EntitiesResult::from_entities(&answer.entities),
            trains: answer.trains.into_iter().map(TrainResult::from_result).collect(),
        }
    }
}
