//! NLU client error types.

/// Errors from the hosted NLU model.
///
/// These never reach the caller of the assistant: every variant means "fall
/// back to the local heuristics".
#[derive(Debug, thiserror::Error)]
pub enum NluError {
    /// HTTP request failed (network error, client-side timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check NLU_API_TOKEN")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by NLU API")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The requested model endpoint is not configured
    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    /// The call did not finish within the collaborator deadline
    #[error("timed out after {0} ms")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NluError::Api {
            status: 503,
            message: "model loading".into(),
        };
        assert_eq!(err.to_string(), "API error 503: model loading");

        let err = NluError::NotConfigured("entity recognizer");
        assert_eq!(err.to_string(), "not configured: entity recognizer");

        let err = NluError::Timeout(3000);
        assert_eq!(err.to_string(), "timed out after 3000 ms");
    }
}
