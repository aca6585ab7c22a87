//! Web layer for the train assistant.
//!
//! A plain-text liveness banner, a health check and the JSON chat endpoint.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
