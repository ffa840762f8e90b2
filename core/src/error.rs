//! Error types for the VIIRS bot

use std::time::Duration;

use thiserror::Error;

/// Failures detected while handling a single `viirs_check` command.
///
/// None of these escape the invocation that produced them: the handler turns
/// each one into a reply (or a log line) and moves on.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("missing date argument")]
    Usage,

    #[error("invalid layer_name: {layer}")]
    InvalidLayer { layer: String },

    #[error("invalid date_string: {date}")]
    InvalidDate { date: String },

    #[error("failed to launch analysis process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("analysis process exceeded {limit:?}")]
    Timeout { limit: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
