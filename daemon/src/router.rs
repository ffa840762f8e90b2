//! Event routing
//!
//! The router is built once at startup and owned by the daemon state. A
//! command route matches on the first word of the text plus the event kind;
//! an event route matches on kind alone. The first matching route wins.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use viirsbot_core::{EventKind, InboundEvent, IpcResponse, ReplyPayload};

/// Fire-and-forget reply channel for one inbound event.
#[derive(Clone)]
pub struct ReplySink {
    channel: String,
    tx: UnboundedSender<IpcResponse>,
}

impl ReplySink {
    pub fn new(channel: impl Into<String>, tx: UnboundedSender<IpcResponse>) -> Self {
        Self {
            channel: channel.into(),
            tx,
        }
    }

    /// Queue a reply. Never waits; a closed connection just drops it.
    pub fn say(&self, payload: ReplyPayload) {
        let reply = IpcResponse::Reply {
            channel: self.channel.clone(),
            payload,
        };
        if self.tx.send(reply).is_err() {
            debug!(channel = %self.channel, "Client gone, reply dropped");
        }
    }

    pub fn say_all(&self, payloads: impl IntoIterator<Item = ReplyPayload>) {
        for payload in payloads {
            self.say(payload);
        }
    }
}

/// Handles events picked by the router.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, event: &InboundEvent, replies: &ReplySink);
}

enum Matcher {
    Command { pattern: String, kinds: Vec<EventKind> },
    Event(EventKind),
}

impl Matcher {
    fn matches(&self, event: &InboundEvent) -> bool {
        match self {
            Matcher::Command { pattern, kinds } => {
                kinds.contains(&event.kind)
                    && event
                        .text
                        .split_whitespace()
                        .next()
                        .is_some_and(|word| word.eq_ignore_ascii_case(pattern))
            }
            Matcher::Event(kind) => *kind == event.kind,
        }
    }
}

struct Route {
    matcher: Matcher,
    handler: Arc<dyn CommandHandler>,
}

/// Ordered table of routes.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `pattern` commands arriving as any of `kinds` to `handler`.
    pub fn command<H>(mut self, pattern: &str, kinds: &[EventKind], handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        self.routes.push(Route {
            matcher: Matcher::Command {
                pattern: pattern.to_string(),
                kinds: kinds.to_vec(),
            },
            handler: Arc::new(handler),
        });
        self
    }

    /// Route every event of `kind` to `handler`.
    pub fn on<H>(mut self, kind: EventKind, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        self.routes.push(Route {
            matcher: Matcher::Event(kind),
            handler: Arc::new(handler),
        });
        self
    }

    /// Run the first matching handler. Returns false if nothing matched.
    pub async fn dispatch(&self, event: &InboundEvent, replies: &ReplySink) -> bool {
        match self.routes.iter().find(|r| r.matcher.matches(event)) {
            Some(route) => {
                route.handler.handle(event, replies).await;
                true
            }
            None => {
                debug!(kind = event.kind.as_str(), channel = %event.channel, "No route for event");
                false
            }
        }
    }
}
