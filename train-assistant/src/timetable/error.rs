//! Timetable loading errors.

use std::path::PathBuf;

/// Errors that can occur when loading a timetable source.
///
/// None of these abort the process: callers degrade to an empty store.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source file could not be read.
    #[error("failed to read timetable {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not valid JSON.
    #[error("timetable JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The source parsed but is neither a train mapping nor a record list.
    #[error("timetable has unexpected shape: expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
}
