//! Live cart view.
//!
//! Renders the cart, then re-renders whenever another process changes the
//! persisted cart, until Ctrl+C or SIGTERM.

use std::time::Duration;

use premium_cart::{CartManager, FileStore, KeyValueStore};
use tokio::sync::broadcast::error::RecvError;

/// Watch the cart until a shutdown signal arrives.
pub async fn run(manager: &mut CartManager<FileStore>, interval: Duration) {
    let watcher = manager.store().watch(interval);
    let mut events = manager.store().subscribe();
    tracing::info!(
        dir = %manager.store().dir().display(),
        key = manager.key(),
        "watching cart"
    );
    manager.refresh();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            received = events.recv() => match received {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    manager.sync();
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    watcher.abort();
    tracing::info!("stopped watching cart");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install signal handler: {e}");
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

    tracing::info!("Shutdown signal received");
}
