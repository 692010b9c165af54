//! Application builder: wires store, services and router into a running
//! server.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use papyrus_core::config::AppConfig;
use papyrus_core::error::{AppError, ErrorKind};
use papyrus_core::result::AppResult;
use papyrus_database::store::WorkspaceStore;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Papyrus server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig, store: Arc<dyn WorkspaceStore>) -> AppResult<()> {
    tracing::info!("Starting Papyrus server...");

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    tracing::info!("Papyrus server listening on {}", addr);

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, store);
    serve_on(listener, state, shutdown_signal(), grace).await
}

/// Serves the API on an already bound listener until `shutdown` resolves.
///
/// In-flight requests get `grace` to finish after the signal.
pub async fn serve_on<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
    grace: Duration,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(state);
    let (signal_tx, mut signal_rx) = watch::channel(false);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown.await;
        tracing::info!("Shutdown signal received, draining connections");
        let _ = signal_tx.send(true);
    });

    let deadline = async move {
        if signal_rx.wait_for(|fired| *fired).await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result.map_err(|e| AppError::internal(format!("Server error: {e}")))?,
        () = deadline => tracing::warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, forcing shutdown"),
    }

    tracing::info!("Papyrus server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
