//! Hosted NLU HTTP client.
//!
//! Talks to inference endpoints in the common hosted-model shape: a
//! zero-shot classifier taking `candidate_labels`, and a token classifier
//! returning grouped entities. Both are optional.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::Nlu;
use super::error::NluError;
use super::types::{ClassifyParameters, ClassifyPayload, ClassifyRequest, EntitiesRequest, EntityDto, EntitySpan};

/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Configuration for the NLU client.
#[derive(Debug, Clone)]
pub struct NluConfig {
    /// Bearer token, if the endpoints require one
    pub api_token: Option<String>,
    /// Zero-shot classifier endpoint
    pub classifier_url: Option<String>,
    /// Entity recognizer endpoint
    pub entities_url: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl NluConfig {
    /// Create a config with no endpoints.
    pub fn new() -> Self {
        Self {
            api_token: None,
            classifier_url: None,
            entities_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the zero-shot classifier endpoint.
    pub fn with_classifier_url(mut self, url: impl Into<String>) -> Self {
        self.classifier_url = Some(url.into());
        self
    }

    /// Set the entity recognizer endpoint.
    pub fn with_entities_url(mut self, url: impl Into<String>) -> Self {
        self.entities_url = Some(url.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Whether any endpoint is configured.
    pub fn is_enabled(&self) -> bool {
        self.classifier_url.is_some() || self.entities_url.is_some()
    }
}

impl Default for NluConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the hosted NLU endpoints.
#[derive(Debug, Clone)]
pub struct NluClient {
    http: reqwest::Client,
    classifier_url: Option<String>,
    entities_url: Option<String>,
}

impl NluClient {
    /// Create a new NLU client.
    pub fn new(config: NluConfig) -> Result<Self, NluError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                NluError::Api {
                    status: 0,
                    message: "Invalid API token format".to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            classifier_url: config.classifier_url,
            entities_url: config.entities_url,
        })
    }

    /// POST a JSON body and return the response text.
    async fn post(&self, url: &str, body: &impl serde::Serialize) -> Result<String, NluError> {
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(NluError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NluError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NluError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl Nlu for NluClient {
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<Vec<(String, f64)>, NluError> {
        let url = self
            .classifier_url
            .as_deref()
            .ok_or(NluError::NotConfigured("intent classifier"))?;

        let request = ClassifyRequest {
            inputs: text,
            parameters: ClassifyParameters {
                candidate_labels: labels,
            },
        };
        let body = self.post(url, &request).await?;

        let payload: ClassifyPayload = serde_json::from_str(&body).map_err(|e| NluError::Json {
            message: e.to_string(),
        })?;
        Ok(payload.into_ranked())
    }

    async fn entities(&self, text: &str) -> Result<Vec<EntitySpan>, NluError> {
        let url = self
            .entities_url
            .as_deref()
            .ok_or(NluError::NotConfigured("entity recognizer"))?;

        let body = self.post(url, &EntitiesRequest { inputs: text }).await?;

        let entities: Vec<EntityDto> = serde_json::from_str(&body).map_err(|e| NluError::Json {
            message: e.to_string(),
        })?;
        Ok(entities.into_iter().map(EntitySpan::from).collect())
    }
}
