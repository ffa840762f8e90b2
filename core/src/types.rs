//! Core data types for the VIIRS bot
//!
//! These types are shared between the daemon and the CLI. Everything here is
//! created fresh per inbound command and dropped once the reply is sent.

use serde::{Deserialize, Serialize};

/// Kind of chat event delivered by the messaging bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DirectMention,
    Mention,
    DirectMessage,
    Ambient,
    ChannelJoin,
}

impl EventKind {
    /// Return the snake_case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DirectMention => "direct_mention",
            EventKind::Mention => "mention",
            EventKind::DirectMessage => "direct_message",
            EventKind::Ambient => "ambient",
            EventKind::ChannelJoin => "channel_join",
        }
    }
}

/// An inbound chat event.
///
/// # Fields
/// - `kind`: How the bot was addressed.
/// - `text`: Message text with the bot mention already stripped.
/// - `channel`: Channel the reply goes back to.
/// - `user`: Sender id.
/// - `token`: Verification token from the platform (not checked here).
/// - `ts`: Optional platform timestamp, echoed back in `Done`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub kind: EventKind,
    #[serde(default)]
    pub text: String,
    pub channel: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

/// Raw command text for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub raw_text: String,
}

impl CommandRequest {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }
}

/// Tokens pulled out of a command. `layer_name == None` means every layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArguments {
    pub date_token: String,
    pub layer_name: Option<String>,
}

/// A validated query, ready for the analysis process.
///
/// `date` is `YYYY-MM-DD` (or the caller's passthrough token) and `layer`,
/// when present, is one of [`crate::layers::VIIRS_LAYERS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub date: String,
    pub layer: Option<String>,
}

impl NormalizedQuery {
    /// Layer argument for the analysis process; empty means all layers.
    pub fn layer_arg(&self) -> &str {
        self.layer.as_deref().unwrap_or("")
    }
}

/// Terminal result of one analysis process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubprocessOutcome {
    Success { stdout_lines: Vec<String> },
    Failure { cause: String },
}

/// Fields recovered from the analysis output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub layer_name: String,
    pub image_url: String,
    pub miscolor_note: String,
    pub missing_data_note: String,
}

/// A rich message attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub title: String,
    pub image_url: String,
    pub text: String,
}

/// Outbound message body: a plain string or a list of attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyPayload {
    Text(String),
    Attachments { attachments: Vec<Attachment> },
}

impl ReplyPayload {
    pub fn text(text: impl Into<String>) -> Self {
        ReplyPayload::Text(text.into())
    }

    /// Plain text, if this is a text reply.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ReplyPayload::Text(text) => Some(text),
            ReplyPayload::Attachments { .. } => None,
        }
    }
}

/// IPC message from a client to the daemon.
///
/// Messages are serialized to JSON and sent over the Unix socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum IpcMessage {
    /// Inbound chat event to dispatch
    Event(InboundEvent),

    /// Health check
    Ping,

    /// Shutdown daemon
    Shutdown,
}

/// Response from daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum IpcResponse {
    Ok,
    Error(String),
    /// One outbound message for a channel
    Reply {
        channel: String,
        payload: ReplyPayload,
    },
    /// All replies for an event have been sent
    Done {
        channel: String,
        ts: Option<String>,
    },
    Pong {
        uptime_secs: u64,
        commands_handled: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_payload_wire_shape() {
        let text = serde_json::to_value(ReplyPayload::text("hello")).unwrap();
        assert_eq!(text, serde_json::json!("hello"));

        let attachments = ReplyPayload::Attachments {
            attachments: vec![Attachment {
                title: "VIIRS_SNPP_CorrectedReflectance_TrueColor".into(),
                image_url: "https://example.com/img.png".into(),
                text: "ok\n".into(),
            }],
        };
        let value = serde_json::to_value(&attachments).unwrap();
        assert_eq!(
            value["attachments"][0]["image_url"],
            "https://example.com/img.png"
        );

        let back: ReplyPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, attachments);
    }

    #[test]
    fn test_inbound_event_defaults() {
        let json = r#"{"type":"Event","payload":{"kind":"direct_message","channel":"D1","text":"viirs_check today"}}"#;
        let msg: IpcMessage = serde_json::from_str(json).unwrap();
        match msg {
            IpcMessage::Event(event) => {
                assert_eq!(event.kind, EventKind::DirectMessage);
                assert_eq!(event.text, "viirs_check today");
                assert!(event.user.is_none());
                assert!(event.ts.is_none());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_layer_arg_sentinel() {
        let all = NormalizedQuery {
            date: "2024-01-01".into(),
            layer: None,
        };
        assert_eq!(all.layer_arg(), "");
    }
}
