//! Rail-status HTTP client.
//!
//! Queries a live "trains between stations" endpoint for a given journey
//! date. Handles authentication and limits concurrent requests.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use tokio::sync::Semaphore;

use crate::domain::StationCode;

use super::RailStatus;
use super::error::RailStatusError;
use super::types::{LiveTrain, TrainsBetweenResponse};

/// Default base URL for the rail-status API.
const DEFAULT_BASE_URL: &str = "https://irctc1.p.rapidapi.com/api/v3";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the rail-status client.
#[derive(Debug, Clone)]
pub struct RailStatusConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl RailStatusConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_ms: 3000,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }
}

/// Rail-status API client.
#[derive(Debug, Clone)]
pub struct RailStatusClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl RailStatusClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RailStatusConfig) -> Result<Self, RailStatusError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| RailStatusError::Api {
            status: 0,
            message: "Invalid API key format".to_string(),
        })?;
        headers.insert("x-rapidapi-key", api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/trainsBetweenStations", self.base_url)
    }
}

impl RailStatus for RailStatusClient {
    async fn trains_between(
        &self,
        source: &StationCode,
        destination: &StationCode,
        date: NaiveDate,
    ) -> Result<Vec<LiveTrain>, RailStatusError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RailStatusError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .get(self.endpoint())
            .query(&[
                ("fromStationCode", source.as_str().to_string()),
                ("toStationCode", destination.as_str().to_string()),
                ("dateOfJourney", date.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RailStatusError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RailStatusError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RailStatusError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: TrainsBetweenResponse =
            serde_json::from_str(&body).map_err(|e| RailStatusError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(parsed.data.into_iter().map(LiveTrain::from).collect())
    }
}
