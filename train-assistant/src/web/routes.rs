//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::Answer;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/chatbot", post(chatbot))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness banner with the loaded train count.
async fn home(State(state): State<AppState>) -> String {
    let store = state.assistant.timetable().snapshot().await;
    format!(
        "Static train assistant is live: {} trains, {} stations loaded",
        store.len(),
        store.station_count()
    )
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Answer one chat message.
///
/// A body that is not valid JSON, or has no string `message`, is answered
/// with the `unknown` response rather than an HTTP error.
async fn chatbot(State(state): State<AppState>, body: Bytes) -> Json<ChatResponse> {
    let Some(message) = parse_message(&body) else {
        return Json(ChatResponse::from(Answer::unknown()));
    };

    let answer = state.assistant.answer(&message).await;
    Json(ChatResponse::from(answer))
}

/// Parse JSON manually so we can log the body on failure.
fn parse_message(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<ChatRequest>(body) {
        Ok(req) => req.message,
        Err(e) => {
            warn!(
                error = %e,
                body = %String::from_utf8_lossy(body),
                "malformed chatbot request"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::assistant::{Assistant, AssistantConfig};
    use crate::timetable::{Store, TimetableHandle};

    fn state() -> AppState {
        let data = json!({
            "12621": [
                {"Train_Name": "TAMIL NADU EXP", "Station_Code": "MAS", "Station_Name": "CHENNAI CENTRAL",
                 "Arrival_Time": "", "Departure_Time": "22:00:00"},
                {"Train_Name": "TAMIL NADU EXP", "Station_Code": "NDLS", "Station_Name": "NEW DELHI",
                 "Arrival_Time": "06:30:00", "Departure_Time": ""},
            ],
        });
        let handle = TimetableHandle::new(Store::load(&data).unwrap());
        let assistant: Assistant = Assistant::new(handle, AssistantConfig::default());
        AppState::new(assistant)
    }

    async fn post_chat(body: &'static [u8]) -> Value {
        let Json(response) = chatbot(State(state()), Bytes::from_static(body)).await;
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn chatbot_answers_search() {
        let body =
            post_chat(br#"{"message": "show me trains from Chennai Central to New Delhi"}"#).await;

        assert_eq!(body["intent"], "train_search");
        assert_eq!(body["entities"]["source"], "MAS");
        assert_eq!(body["entities"]["destination"], "NDLS");
        assert_eq!(body["trains"][0]["train_no"], "12621");
        assert_eq!(body["trains"][0]["departure_time"], "22:00:00");
    }

    #[tokio::test]
    async fn malformed_bodies_yield_unknown() {
        let bodies: [&'static [u8]; 4] = [b"not json", b"{}", br#"{"message": 42}"#, b""];
        for raw in bodies {
            let Json(response) = chatbot(State(state()), Bytes::from_static(raw)).await;
            let body = serde_json::to_value(response).unwrap();
            assert_eq!(body["intent"], "unknown");
            assert_eq!(body["trains"], json!([]));
            assert_eq!(body["entities"]["source"], Value::Null);
        }
    }

    #[tokio::test]
    async fn empty_message_yields_unknown() {
        let body = post_chat(br#"{"message": ""}"#).await;
        assert_eq!(body["intent"], "unknown");
    }

    #[tokio::test]
    async fn home_reports_counts() {
        let banner = home(State(state())).await;
        assert!(banner.contains("1 trains"));
        assert!(banner.contains("2 stations"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }
}
