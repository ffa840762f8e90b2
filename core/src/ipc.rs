//! IPC client for communicating with the bot daemon
//!
//! Synchronous client used by the CLI and by chat bridges that forward
//! events over the Unix socket. One JSON object per line in both directions.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::{InboundEvent, IpcMessage, IpcResponse, ReplyPayload};

/// Environment variable overriding the bot home directory
pub const HOME_ENV: &str = "VIIRSBOT_HOME";

/// Bot home directory: `$VIIRSBOT_HOME`, else `~/.viirsbot`
pub fn bot_home() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|h| h.join(".viirsbot"))
        .unwrap_or_else(|| PathBuf::from("/tmp/.viirsbot"))
}

/// Default socket path
pub fn socket_path() -> PathBuf {
    bot_home().join("viirsbot.sock")
}

/// Error type for IPC operations
#[derive(Error, Debug)]
pub enum IpcError {
    /// Socket missing or connection refused
    #[error("Daemon not running")]
    DaemonNotRunning,
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] std::io::Error),
    #[error("Send failed: {0}")]
    SendFailed(#[source] std::io::Error),
    #[error("Receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Daemon error: {0}")]
    DaemonError(String),
}

/// IPC client for communicating with the daemon
pub struct IpcClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl Default for IpcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IpcClient {
    /// Create a new IPC client with default settings
    pub fn new() -> Self {
        Self::with_socket_path(socket_path())
    }

    /// Create a client with a custom socket path
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(5),
        }
    }

    /// Set the read/write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if the daemon appears to be running (socket exists)
    pub fn daemon_available(&self) -> bool {
        self.socket_path.exists()
    }

    fn connect(&self) -> Result<UnixStream, IpcError> {
        if !self.socket_path.exists() {
            return Err(IpcError::DaemonNotRunning);
        }

        let stream = UnixStream::connect(&self.socket_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionRefused
                || e.kind() == std::io::ErrorKind::NotFound
            {
                IpcError::DaemonNotRunning
            } else {
                IpcError::ConnectionFailed(e)
            }
        })?;

        stream.set_read_timeout(Some(self.timeout)).ok();
        stream.set_write_timeout(Some(self.timeout)).ok();
        Ok(stream)
    }

    fn write_message(stream: &mut UnixStream, message: &IpcMessage) -> Result<(), IpcError> {
        let json = serde_json::to_string(message).map_err(|e| {
            IpcError::SendFailed(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        writeln!(stream, "{}", json).map_err(IpcError::SendFailed)?;
        stream.flush().map_err(IpcError::SendFailed)
    }

    fn read_response<R: BufRead>(reader: &mut R) -> Result<IpcResponse, IpcError> {
        let mut line = String::new();
        let read = reader.read_line(&mut line).map_err(IpcError::ReceiveFailed)?;
        if read == 0 {
            return Err(IpcError::InvalidResponse("connection closed".into()));
        }
        serde_json::from_str(&line).map_err(|e| IpcError::InvalidResponse(e.to_string()))
    }

    /// Send a message to the daemon and wait for a single response
    pub fn send(&self, message: &IpcMessage) -> Result<IpcResponse, IpcError> {
        let mut stream = self.connect()?;
        Self::write_message(&mut stream, message)?;

        let mut reader = BufReader::new(stream);
        let response = Self::read_response(&mut reader)?;

        if let IpcResponse::Error(msg) = &response {
            return Err(IpcError::DaemonError(msg.clone()));
        }

        Ok(response)
    }

    /// Dispatch a chat event and collect every reply until the daemon
    /// reports `Done`. `on_reply` sees each reply as it arrives.
    ///
    /// Returns the number of replies received.
    pub fn dispatch<F>(&self, event: InboundEvent, mut on_reply: F) -> Result<usize, IpcError>
    where
        F: FnMut(&str, &ReplyPayload),
    {
        let mut stream = self.connect()?;
        Self::write_message(&mut stream, &IpcMessage::Event(event))?;

        let mut reader = BufReader::new(stream);
        let mut count = 0;
        loop {
            match Self::read_response(&mut reader)? {
                IpcResponse::Reply { channel, payload } => {
                    on_reply(&channel, &payload);
                    count += 1;
                }
                IpcResponse::Done { .. } => return Ok(count),
                IpcResponse::Error(msg) => return Err(IpcError::DaemonError(msg)),
                other => {
                    return Err(IpcError::InvalidResponse(format!(
                        "Unexpected response: {:?}",
                        other
                    )))
                }
            }
        }
    }

    /// Convenience method: Ping the daemon
    pub fn ping(&self) -> Result<(u64, u64), IpcError> {
        let response = self.send(&IpcMessage::Ping)?;
        match response {
            IpcResponse::Pong {
                uptime_secs,
                commands_handled,
            } => Ok((uptime_secs, commands_handled)),
            IpcResponse::Error(msg) => Err(IpcError::DaemonError(msg)),
            _ => Err(IpcError::InvalidResponse("Unexpected response type".into())),
        }
    }

    /// Convenience method: ask the daemon to stop
    pub fn shutdown(&self) -> Result<(), IpcError> {
        match self.send(&IpcMessage::Shutdown)? {
            IpcResponse::Ok => Ok(()),
            _ => Err(IpcError::InvalidResponse("Unexpected response type".into())),
        }
    }
}
