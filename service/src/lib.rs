//! HTTP service exposing CRUD over a single collection of schemaless todos.
//!
//! # Overview
//! `POST /token` trades the configured credentials for a bearer token; every
//! `/todos` route requires that token. Each request maps to exactly one
//! `TodoStore` call.
//!
//! # Design
//! - The store is built once by the caller and shared through `AppState`.
//!   `serve` closes it exactly once, after the server has drained; `run`
//!   leaves it open.
//! - Items are open JSON objects; the only field the service owns is `_id`.
//! - Router construction (`app`) is separate from serving (`run`) so tests can
//!   drive the router directly with `tower::ServiceExt::oneshot`.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{AuthSettings, ReplaceSuccess};
use crate::store::TodoStore;

pub use error::ServiceError;
pub use model::{TodoId, TodoItem};

/// Shared, read-only request context.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub auth: Arc<AuthSettings>,
    pub replace_success: ReplaceSuccess,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, auth: AuthSettings, replace_success: ReplaceSuccess) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
            replace_success,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/token", post(auth::login))
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::replace_todo)
                .delete(handlers::delete_todo),
        )
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app(state)` on `listener` until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Like `run`, then close the store once the server has stopped.
///
/// The store is closed even when serving fails, so the connection is never
/// leaked on an error path.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let served = run(listener, state, shutdown).await;
    store.close().await;
    tracing::info!("store closed");
    served
}
