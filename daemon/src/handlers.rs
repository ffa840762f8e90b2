//! Message handlers for the daemon

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

use viirsbot_core::reply::{acknowledgement, analysis_reply, failure_reply, rejection_reply};
use viirsbot_core::{
    normalize_query, parse_arguments, parse_output, CommandError, CommandRequest, EventKind,
    InboundEvent, IpcMessage, IpcResponse, NormalizedQuery, ReplyPayload, SubprocessOutcome,
};

use crate::config::{BotConfig, BotSection};
use crate::router::{CommandHandler, ReplySink, Router};
use crate::runner::AnalysisRunner;
use crate::BotState;

/// Event kinds that can carry a command addressed to the bot
const COMMAND_KINDS: [EventKind; 3] = [
    EventKind::DirectMention,
    EventKind::Mention,
    EventKind::DirectMessage,
];

const JOIN_GREETING: &str = "I'm here!";

/// `viirs_check <date_or_today> [layer_name]`
pub struct ViirsCheckHandler {
    command: String,
    runner: AnalysisRunner,
    notify_on_failure: bool,
    strict_dates: bool,
}

impl ViirsCheckHandler {
    pub fn new(settings: &BotSection, runner: AnalysisRunner) -> Self {
        Self {
            command: settings.command.clone(),
            runner,
            notify_on_failure: settings.notify_on_failure,
            strict_dates: settings.strict_dates,
        }
    }

    fn prepare(&self, request: &CommandRequest) -> Result<NormalizedQuery, CommandError> {
        let args = parse_arguments(request)?;
        normalize_query(&args, Local::now().date_naive(), self.strict_dates)
    }
}

#[async_trait]
impl CommandHandler for ViirsCheckHandler {
    async fn handle(&self, event: &InboundEvent, replies: &ReplySink) {
        let request = CommandRequest::new(event.text.as_str());
        debug!(text = %request.raw_text, user = ?event.user, "viirs_check received");

        let query = match self.prepare(&request) {
            Ok(query) => query,
            Err(e) => {
                info!(channel = %event.channel, "Rejected command: {}", e);
                if let Some(lines) = rejection_reply(&self.command, &e) {
                    replies.say_all(lines);
                }
                return;
            }
        };

        replies.say(acknowledgement(&query));

        match self.runner.run(&query).await {
            SubprocessOutcome::Success { stdout_lines } => {
                let result = parse_output(&stdout_lines);
                info!(
                    layer = %result.layer_name,
                    url = %result.image_url,
                    "Analysis complete"
                );
                replies.say(analysis_reply(&result));
            }
            SubprocessOutcome::Failure { cause } => {
                if self.notify_on_failure {
                    replies.say(failure_reply(&cause));
                }
            }
        }
    }
}

/// Greets a channel the bot was added to
pub struct ChannelJoinHandler;

#[async_trait]
impl CommandHandler for ChannelJoinHandler {
    async fn handle(&self, event: &InboundEvent, replies: &ReplySink) {
        info!(channel = %event.channel, "Joined channel");
        replies.say(ReplyPayload::text(JOIN_GREETING));
    }
}

/// Build the daemon's routing table from config
pub fn build_router(config: &BotConfig) -> Router {
    let runner = AnalysisRunner::from_config(&config.analysis);
    Router::new()
        .command(
            &config.bot.command,
            &COMMAND_KINDS,
            ViirsCheckHandler::new(&config.bot, runner),
        )
        .on(EventKind::ChannelJoin, ChannelJoinHandler)
}

/// Handle an incoming IPC message, streaming responses into `tx`
pub async fn handle_message(
    msg: IpcMessage,
    state: &Arc<BotState>,
    tx: &UnboundedSender<IpcResponse>,
) {
    let response = match msg {
        IpcMessage::Ping => {
            debug!("Ping received");
            IpcResponse::Pong {
                uptime_secs: state.uptime_secs(),
                commands_handled: state.commands_handled(),
            }
        }

        IpcMessage::Shutdown => {
            info!("Shutdown requested via IPC");
            state.request_shutdown();
            IpcResponse::Ok
        }

        IpcMessage::Event(event) => {
            let replies = ReplySink::new(event.channel.clone(), tx.clone());
            if state.router.dispatch(&event, &replies).await {
                state.increment_commands();
            }
            IpcResponse::Done {
                channel: event.channel,
                ts: event.ts,
            }
        }
    };

    if tx.send(response).is_err() {
        error!("Client disconnected before response was sent");
    }
}
