//! Rail-status client error types.

/// Errors from the live rail-status API.
///
/// Like the NLU errors these are logged and swallowed; the offline timetable
/// answer always stands on its own.
#[derive(Debug, thiserror::Error)]
pub enum RailStatusError {
    /// HTTP request failed (network error, client-side timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by rail-status API")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The call did not finish within the collaborator deadline
    #[error("timed out after {0} ms")]
    Timeout(u64),
}
