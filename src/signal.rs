//! Shutdown signal.

use std::future::pending;

use crate::prelude::*;

/// Completes on `SIGINT` or `SIGTERM`.
#[cfg(unix)]
pub async fn shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigint, mut sigterm) = match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        (Err(error), _) | (_, Err(error)) => {
            error!("Failed to listen for the shutdown signals: {}", error);
            return pending().await;
        }
    };
    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    info!("Shutdown signal received.");
}

/// Completes on Ctrl+C.
#[cfg(not(unix))]
pub async fn shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", error);
        return pending().await;
    }
    info!("Shutdown signal received.");
}
