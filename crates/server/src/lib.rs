#![forbid(unsafe_code)]

//! HTTP layer for the survey application.
//!
//! Thin axum glue over the `services` tracker: parse the session cookie,
//! call one tracker operation, turn the outcome into a page or a redirect.
//! All survey semantics live below this crate.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;

use config::Config;
use state::AppState;

/// Builds the application router; separated from [`start_server`] so tests
/// can drive it with `tower::ServiceExt::oneshot`.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::survey_list))
        .route("/start-survey/{slug}", get(routes::survey_intro))
        .route("/init-session/{slug}", post(routes::init_session))
        .route("/questions/{index}", get(routes::question_page))
        .route("/answer", post(routes::submit_answer))
        .route("/thanks", get(routes::thanks_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initializes logging, state, and the listener, then serves until Ctrl-C
/// or SIGTERM.
pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let config = Config::load();
    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .expect("failed to bind listener");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    info!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
