//! Server runtime - binding the listener, graceful shutdown, and the database keep-alive.

use crate::{api, errors::Result};
use sea_orm::DatabaseConnection;
use std::{net::SocketAddr, time::Duration};
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tracing::{error, info, instrument, warn};

/// Serves the application on `0.0.0.0:port` until Ctrl+C or SIGTERM.
#[instrument(skip(state))]
pub async fn serve(state: api::AppState, port: u16) -> Result<()> {
    let address = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    serve_on(listener, state, shutdown_signal()).await?;
    info!("Server shut down");
    Ok(())
}

/// Serves the application on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, state: api::AppState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
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
                error!("Failed to install SIGTERM handler: {e}");
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

const MIN_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(1);

/// Pings the database every `interval` so idle pooled connections are not dropped.
///
/// Failures are logged and the loop keeps going. A zero interval is raised to one second.
pub fn spawn_keep_alive(db: DatabaseConnection, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(MIN_KEEP_ALIVE_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match db.ping().await {
                Ok(()) => tracing::debug!("Database keep-alive ping succeeded"),
                Err(e) => warn!("Database keep-alive ping failed: {e}"),
            }
        }
    })
}
