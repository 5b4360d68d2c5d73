//! # colmena-server
//!
//! HTTP front of the La Colmena API.
//!
//! Routes are declared once in [`routes::create_router`]. Every response
//! passes through the CORS boundary in [`middleware::cors`]; routes that need
//! an authenticated caller either take a [`CurrentPrincipal`] argument or sit
//! behind [`middleware::auth::require_principal`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use extract::CurrentPrincipal;
pub use routes::ProtectedRoutes;
pub use state::AppState;

use anyhow::Context;
use colmena_core::ColmenaConfig;
use tokio::net::TcpListener;

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn run(config: &ColmenaConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let app = routes::create_router(state);

    let addr = &config.server.bind;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(address = %addr, "colmena-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("colmena-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
