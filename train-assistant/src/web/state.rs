//! Application state for the web layer.

use std::sync::Arc;

use crate::assistant::Assistant;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Query answering, including the shared timetable
    pub assistant: Arc<Assistant>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
        }
    }
}
