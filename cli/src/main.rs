//! VIIRS Bot CLI
//!
//! Thin client that talks to the daemon over its Unix socket. Chat bridges
//! can shell out to `viirsbot send` or speak the same JSON-lines protocol.
//!
//! Commands:
//! - viirsbot send "viirs_check today" [--channel C] [--user U] [--kind direct-message]
//! - viirsbot daemon status|stop

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use viirsbot_core::{EventKind, InboundEvent, IpcClient, IpcError, ReplyPayload};

#[derive(Parser)]
#[command(name = "viirsbot")]
#[command(about = "Chat bot that checks VIIRS imagery for missing data and miscoloring")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a chat message to the bot and print its replies
    Send {
        /// Message text, e.g. "viirs_check today"
        text: String,

        /// Channel to reply to
        #[arg(long, default_value = "cli")]
        channel: String,

        /// Sender id
        #[arg(long)]
        user: Option<String>,

        /// How the bot is addressed
        #[arg(long, value_enum, default_value = "direct-message")]
        kind: Kind,

        /// Seconds to wait for each reply
        #[arg(long, default_value = "900")]
        timeout: u64,
    },

    /// Daemon management
    Daemon {
        #[command(subcommand)]
        command: DaemonCommands,
    },
}

#[derive(Subcommand)]
enum DaemonCommands {
    /// Check daemon status
    Status,

    /// Stop the daemon
    Stop,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    DirectMention,
    Mention,
    DirectMessage,
    Ambient,
    ChannelJoin,
}

impl From<Kind> for EventKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::DirectMention => EventKind::DirectMention,
            Kind::Mention => EventKind::Mention,
            Kind::DirectMessage => EventKind::DirectMessage,
            Kind::Ambient => EventKind::Ambient,
            Kind::ChannelJoin => EventKind::ChannelJoin,
        }
    }
}

fn print_reply(payload: &ReplyPayload) {
    match payload {
        ReplyPayload::Text(text) => println!("{}", text),
        ReplyPayload::Attachments { attachments } => {
            for attachment in attachments {
                println!("== {}", attachment.title);
                println!("   image: {}", attachment.image_url);
                for line in attachment.text.lines() {
                    println!("   {}", line);
                }
            }
        }
    }
}

fn report(e: &IpcError) -> ExitCode {
    eprintln!("Failed to communicate with daemon: {}", e);
    if matches!(e, IpcError::DaemonNotRunning) {
        eprintln!("Is the daemon running? Try: viirsbotd");
    }
    ExitCode::FAILURE
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    }

    match cli.command {
        Commands::Send {
            text,
            channel,
            user,
            kind,
            timeout,
        } => {
            let event = InboundEvent {
                kind: kind.into(),
                text,
                channel,
                user,
                token: None,
                ts: None,
            };
            debug!(?event, "Sending event");

            let client = IpcClient::new().with_timeout(Duration::from_secs(timeout));
            match client.dispatch(event, |_, payload| print_reply(payload)) {
                Ok(0) => {
                    println!("(no reply)");
                    Ok(ExitCode::SUCCESS)
                }
                Ok(count) => {
                    debug!(count, "Replies received");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }

        Commands::Daemon { command } => match command {
            DaemonCommands::Status => match IpcClient::new().ping() {
                Ok((uptime_secs, commands_handled)) => {
                    println!("Daemon running");
                    println!("  Uptime: {}s", uptime_secs);
                    println!("  Commands handled: {}", commands_handled);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            },
            DaemonCommands::Stop => match IpcClient::new().shutdown() {
                Ok(()) => {
                    println!("Daemon stopping");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_send_defaults() {
        let cli = Cli::parse_from(["viirsbot", "send", "viirs_check today"]);
        match cli.command {
            Commands::Send {
                text,
                channel,
                kind,
                timeout,
                ..
            } => {
                assert_eq!(text, "viirs_check today");
                assert_eq!(channel, "cli");
                assert_eq!(EventKind::from(kind), EventKind::DirectMessage);
                assert_eq!(timeout, 900);
            }
            _ => panic!("expected send"),
        }
    }
}
