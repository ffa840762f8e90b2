//! Accept loop for the daemon socket

use std::sync::Arc;

use anyhow::Result;
use tokio::net::UnixStream;
use tracing::{error, info, warn};

use crate::{handle_client, BotState};

/// Serve clients until Ctrl+C or an IPC `Shutdown`
pub async fn run(state: Arc<BotState>) -> Result<()> {
    let listener = state.bind_socket()?;

    let stop = stop_signal(&state);
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = &mut stop => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _addr)) => serve(stream, &state),
                Err(e) => error!("Accept error: {}", e),
            },
        }
    }

    state.release_socket();
    info!(commands_handled = state.commands_handled(), "Daemon stopped");
    Ok(())
}

fn serve(stream: UnixStream, state: &Arc<BotState>) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        if let Err(e) = handle_client(stream, state).await {
            error!("Client error: {}", e);
        }
    });
}

/// Resolves on the first shutdown request, from IPC or from the terminal.
async fn stop_signal(state: &BotState) {
    tokio::select! {
        _ = state.shutdown_requested() => info!("Shutdown requested, stopping server"),
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Ctrl+C handler unavailable: {}", e);
                state.shutdown_requested().await;
            }
        },
    }
}
