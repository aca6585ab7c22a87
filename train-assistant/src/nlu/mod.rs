//! Optional hosted NLU collaborator.
//!
//! An intent classifier and a named-entity recognizer that the assistant may
//! consult before falling back to its own keyword and pattern rules. Their
//! output is advisory only.

mod client;
mod error;
mod types;

use std::future::Future;

pub use client::{NluClient, NluConfig};
pub use error::NluError;
pub use types::{EntityKind, EntitySpan};

/// Source of advisory intent labels and entity spans.
///
/// This abstraction allows the assistant to be tested with canned answers.
pub trait Nlu: Send + Sync {
    /// Rank `labels` for `text`, best first.
    fn classify(
        &self,
        text: &str,
        labels: &[&str],
    ) -> impl Future<Output = Result<Vec<(String, f64)>, NluError>> + Send;

    /// Tag spans of `text`.
    fn entities(&self, text: &str) -> impl Future<Output = Result<Vec<EntitySpan>, NluError>> + Send;
}
