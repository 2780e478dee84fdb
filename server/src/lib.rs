//! HTTP backend for personal todo lists.
//!
//! # Overview
//! Serves `/api/todos`: one endpoint per CRUD operation on todo lists and on
//! the items nested inside them. Every route is scoped to the owner named by
//! the caller's bearer token.
//!
//! # Design
//! - The only process-wide resource is the `Store`. It is opened explicitly in
//!   `start`, handed to the router inside `AppState`, and closed after the
//!   server drains.
//! - `app` builds the router without binding a socket so tests can drive it
//!   in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod validate;

pub use auth::{issue_token, Keys, Owner};
pub use config::Config;
pub use error::{AppError, ServerError};
pub use models::{TodoItem, TodoList};
pub use store::Store;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub keys: Arc<Keys>,
}

impl AppState {
    pub fn new(store: Store, keys: Keys) -> Self {
        Self {
            store: Arc::new(store),
            keys: Arc::new(keys),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/todos", routes::router())
        .route("/api/todos/", routes::collection())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `state` on an already bound listener until the process stops.
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Opens the store, serves until Ctrl+C or SIGTERM, then flushes the store.
pub async fn start(config: Config) -> Result<(), ServerError> {
    info!("Opening store...");
    let store = match &config.data_file {
        Some(path) => Store::open(path).await?,
        None => Store::in_memory(),
    };
    let state = AppState::new(store, Keys::new(config.jwt_secret.as_bytes()));

    let app = app(state.clone()).layer(config.cors_layer());

    let address = config.address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    state.store.close().await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
