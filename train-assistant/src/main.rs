use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use train_assistant::assistant::Assistant;
use train_assistant::cache::CachedRailStatusClient;
use train_assistant::config::AppConfig;
use train_assistant::nlu::NluClient;
use train_assistant::railstatus::RailStatusClient;
use train_assistant::timetable::TimetableHandle;
use train_assistant::web::{AppState, create_router};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "train_assistant=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // A missing or broken file degrades to an empty timetable.
    let timetable = TimetableHandle::open(config.data_file.clone());

    if let Some(period) = config.reload_interval {
        let reloading = timetable.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                if let Err(e) = reloading.reload().await {
                    warn!(error = %e, "timetable reload failed, keeping previous data");
                }
            }
        });
    }

    let mut assistant: Assistant = Assistant::new(timetable, config.assistant.clone());

    if config.nlu.is_enabled() {
        match NluClient::new(config.nlu.clone()) {
            Ok(client) => {
                info!("NLU collaborator enabled");
                assistant = assistant.with_nlu(client);
            }
            Err(e) => warn!(error = %e, "failed to create NLU client, continuing without it"),
        }
    }

    if let Some(rail) = config.rail.clone() {
        match RailStatusClient::new(rail) {
            Ok(client) => {
                info!("rail-status collaborator enabled");
                assistant =
                    assistant.with_rail_status(CachedRailStatusClient::new(client, &config.cache));
            }
            Err(e) => warn!(error = %e, "failed to create rail-status client, continuing without it"),
        }
    }

    let app = create_router(AppState::new(assistant));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind_addr, "train assistant listening");
    info!("  GET  /         - Status banner");
    info!("  GET  /health   - Health check");
    info!("  POST /chatbot  - Answer a query");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    info!("shut down");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
