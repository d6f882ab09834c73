use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_service::config::{Config, StoreBackend};
use todo_service::store::{MemoryStore, MongoStore, TodoStore};
use todo_service::AppState;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,todo_service=debug")))
        .with(fmt::layer().with_target(true))
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let store: Arc<dyn TodoStore> = match &config.store {
        StoreBackend::Mongo {
            uri,
            database,
            collection,
        } => Arc::new(
            MongoStore::connect(uri, database, collection)
                .await
                .context("failed to connect to mongodb")?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");

    let state = AppState::new(store, config.auth, config.replace_success);
    todo_service::serve(listener, state, shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
