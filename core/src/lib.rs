//! VIIRS Bot Core - command pipeline and shared types
//!
//! This crate provides:
//! - Argument parsing and date/layer normalization for `viirs_check`
//! - Classification of the analysis process output
//! - Reply formatting for the chat bridge
//! - Wire types and a blocking IPC client for the daemon

pub mod args;
pub mod date;
pub mod error;
pub mod ipc;
pub mod layers;
pub mod output;
pub mod reply;
pub mod types;

pub use args::{normalize_query, parse_arguments};
pub use date::{normalize_date, normalize_date_on};
pub use error::CommandError;
pub use ipc::{bot_home, socket_path, IpcClient, IpcError};
pub use layers::{validate_layer, VIIRS_LAYERS};
pub use output::{classify_line, parse_output, split_output, LineKind};
pub use types::*;
