//! VIIRS Bot Daemon (viirsbotd)
//!
//! Long-running service that answers `viirs_check` chat commands by running
//! the VIIRS analysis process and formatting its output.
//!
//! Architecture:
//! - Unix socket listener at ~/.viirsbot/viirsbot.sock
//! - JSON lines in (IpcMessage), JSON lines out (IpcResponse)
//! - One task per inbound event; replies stream back as they are produced

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::{mpsc, Notify};
use tracing::{info, warn};

mod config;
mod handlers;
mod router;
mod runner;
mod server;

use config::BotConfig;
use router::Router;
use viirsbot_core::{IpcMessage, IpcResponse};

/// Shared state for the daemon.
pub struct BotState {
    /// When the daemon started
    start_time: Instant,

    /// Commands routed to a handler this session
    commands_handled: AtomicU64,

    /// Wakes the accept loop on shutdown
    shutdown_notify: Notify,

    /// Bot home directory (socket, config)
    bot_home: PathBuf,

    /// Routing table, fixed after startup
    pub router: Router,
}

impl BotState {
    pub fn new(bot_home: PathBuf, router: Router) -> Self {
        Self {
            start_time: Instant::now(),
            commands_handled: AtomicU64::new(0),
            shutdown_notify: Notify::new(),
            bot_home,
            router,
        }
    }

    /// Get uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Number of events that reached a handler.
    pub fn commands_handled(&self) -> u64 {
        self.commands_handled.load(Ordering::Relaxed)
    }

    pub fn increment_commands(&self) {
        self.commands_handled.fetch_add(1, Ordering::Relaxed);
    }

    /// Request a graceful shutdown. Stored until the accept loop sees it.
    pub fn request_shutdown(&self) {
        self.shutdown_notify.notify_one();
    }

    /// Resolves once a shutdown has been requested.
    pub async fn shutdown_requested(&self) {
        self.shutdown_notify.notified().await
    }

    /// Get the path to the daemon socket.
    pub fn socket_path(&self) -> PathBuf {
        self.bot_home.join("viirsbot.sock")
    }

    /// Bind the daemon socket, replacing one left behind by an earlier run.
    pub fn bind_socket(&self) -> std::io::Result<UnixListener> {
        let path = self.socket_path();
        if path.exists() {
            warn!(socket = %path.display(), "Removing stale socket");
            std::fs::remove_file(&path)?;
        }
        let listener = UnixListener::bind(&path)?;
        info!(socket = %path.display(), "Listening");
        Ok(listener)
    }

    /// Remove the daemon socket on the way out.
    pub fn release_socket(&self) {
        let path = self.socket_path();
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(socket = %path.display(), "Failed to remove socket: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("viirsbotd=info".parse()?),
        )
        .init();

    info!("Starting viirsbotd v{}", env!("CARGO_PKG_VERSION"));

    let bot_home = viirsbot_core::bot_home();
    std::fs::create_dir_all(&bot_home)?;

    let config = BotConfig::load(&bot_home)?;
    let router = handlers::build_router(&config);
    let state = Arc::new(BotState::new(bot_home, router));

    server::run(state).await
}

/// Decode one raw line from a client. Blank lines yield `None`.
fn decode_message(raw: &[u8]) -> Result<Option<IpcMessage>, String> {
    let line = std::str::from_utf8(raw).map_err(|e| e.to_string())?;
    if line.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some).map_err(|e| e.to_string())
}

/// Handle a single client connection
async fn handle_client(stream: tokio::net::UnixStream, state: Arc<BotState>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<IpcResponse>();

    let writer_task = tokio::spawn(async move {
        while let Some(response) = rx.recv().await {
            let response_json = serde_json::to_string(&response)? + "\n";
            writer.write_all(response_json.as_bytes()).await?;
        }
        Ok::<_, anyhow::Error>(())
    });

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    while reader.read_until(b'\n', &mut buf).await? > 0 {
        match decode_message(&buf) {
            Ok(Some(msg)) => {
                let state = Arc::clone(&state);
                let tx = tx.clone();
                tokio::spawn(async move {
                    handlers::handle_message(msg, &state, &tx).await;
                });
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Invalid message: {}", e);
                let _ = tx.send(IpcResponse::Error(format!("Invalid message: {}", e)));
            }
        }

        buf.clear();
    }

    // Writer finishes once every in-flight event has sent its Done.
    drop(tx);
    writer_task.await??;
    Ok(())
}
