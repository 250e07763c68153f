//! Runtime-to-host signalling
//!
//! The script tells the host about pending commands in one of two ways:
//! - navigating to the `re-callback://` sentinel, after which the host
//!   drains the queue with `RE.getCommandQueue()`
//! - posting a message to the `reCallback` channel
//!
//! Each transport is an adapter that recognises its own signal and reports
//! a [`Detection`]. The dispatcher only ever sees the resulting commands.

use rich_editor_protocol::{
    calls, decode_queue_value, is_callback_url, Command, CALLBACK_SCHEME_PREFIX, MESSAGE_CHANNEL,
};
use serde_json::Value;

use crate::bridge::ScriptBridge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// The user activated a link inside the document
    LinkActivated,
    /// Anything else: initial load, reloads, script-driven navigation
    Other,
}

/// A navigation the web surface is about to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub url: String,
    pub kind: NavigationKind,
}

impl NavigationRequest {
    pub fn new(url: impl Into<String>, kind: NavigationKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self::new(url, NavigationKind::LinkActivated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPolicy {
    Allow,
    Cancel,
}

/// A message posted by the script to a named channel
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptMessage {
    pub channel: String,
    pub body: Value,
}

impl ScriptMessage {
    pub fn new(channel: impl Into<String>, body: Value) -> Self {
        Self {
            channel: channel.into(),
            body,
        }
    }
}

/// Something the runtime did that may carry commands
#[derive(Debug, Clone, Copy)]
pub enum RuntimeSignal<'a> {
    Navigation(&'a NavigationRequest),
    Message(&'a ScriptMessage),
}

/// What a transport recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Commands are waiting in the script-side queue
    DrainQueue,
    /// Commands delivered inline with the signal
    Commands(Vec<Command>),
}

/// Adapter for one signalling mechanism
pub trait CallbackTransport: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the signal is not this transport's
    fn detect(&self, signal: RuntimeSignal<'_>) -> Option<Detection>;
}

/// Sentinel-navigation transport
#[derive(Debug, Default, Clone, Copy)]
pub struct InterceptionTransport;

impl CallbackTransport for InterceptionTransport {
    fn name(&self) -> &'static str {
        "interception"
    }

    fn detect(&self, signal: RuntimeSignal<'_>) -> Option<Detection> {
        match signal {
            RuntimeSignal::Navigation(req) if is_callback_url(&req.url) => Some(Detection::DrainQueue),
            _ => None,
        }
    }
}

/// Direct-message transport
///
/// Accepts a single command string, an array of command strings, or the
/// sentinel URL as a request to drain the queue.
#[derive(Debug, Clone)]
pub struct MessageTransport {
    channel: String,
}

impl MessageTransport {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

impl Default for MessageTransport {
    fn default() -> Self {
        Self::new(MESSAGE_CHANNEL)
    }
}

impl CallbackTransport for MessageTransport {
    fn name(&self) -> &'static str {
        "message"
    }

    fn detect(&self, signal: RuntimeSignal<'_>) -> Option<Detection> {
        let RuntimeSignal::Message(msg) = signal else {
            return None;
        };
        if msg.channel != self.channel {
            return None;
        }

        tracing::debug!(channel = %msg.channel, body = %msg.body, "Script message received");
        match &msg.body {
            Value::String(s) if s.starts_with(CALLBACK_SCHEME_PREFIX) => Some(Detection::DrainQueue),
            Value::String(s) => Some(Detection::Commands(vec![Command::from(s.as_str())])),
            Value::Array(_) => match decode_queue_value(&msg.body) {
                Ok(commands) => Some(Detection::Commands(commands)),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping malformed script message");
                    Some(Detection::Commands(Vec::new()))
                }
            },
            other => {
                tracing::warn!(body = %other, "Dropping unrecognised script message");
                Some(Detection::Commands(Vec::new()))
            }
        }
    }
}

/// Turns runtime signals into commands, whatever transport carried them
pub struct CommandQueueChannel {
    transports: Vec<Box<dyn CallbackTransport>>,
}

impl Default for CommandQueueChannel {
    fn default() -> Self {
        Self::empty()
            .with_transport(InterceptionTransport)
            .with_transport(MessageTransport::default())
    }
}

impl CommandQueueChannel {
    /// Channel with no transports registered
    pub fn empty() -> Self {
        Self {
            transports: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_transport(mut self, transport: impl CallbackTransport + 'static) -> Self {
        self.transports.push(Box::new(transport));
        self
    }

    /// First transport to claim the signal wins
    pub fn detect(&self, signal: RuntimeSignal<'_>) -> Option<Detection> {
        self.transports.iter().find_map(|t| {
            let detection = t.detect(signal)?;
            tracing::trace!(transport = t.name(), "Signal detected");
            Some(detection)
        })
    }

    /// Resolve a signal to the commands it carries, draining the queue if needed
    ///
    /// `None` means no transport recognised the signal.
    pub async fn receive(
        &self,
        bridge: &ScriptBridge,
        signal: RuntimeSignal<'_>,
    ) -> Option<Vec<Command>> {
        match self.detect(signal)? {
            Detection::DrainQueue => Some(Self::drain(bridge).await),
            Detection::Commands(commands) => Some(commands),
        }
    }

    /// Fetch and decode the pending queue; any failure yields an empty queue
    pub async fn drain(bridge: &ScriptBridge) -> Vec<Command> {
        let payload = match bridge.execute_for_result(calls::get_command_queue().to_string()).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch command queue");
                return Vec::new();
            }
        };

        decode_queue_value(&payload).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Treating command queue as empty");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_interception_only_claims_sentinel() {
        let channel = CommandQueueChannel::default();
        let sentinel = NavigationRequest::new("re-callback://foo", NavigationKind::Other);
        let link = NavigationRequest::link("https://example.com");

        assert_eq!(
            channel.detect(RuntimeSignal::Navigation(&sentinel)),
            Some(Detection::DrainQueue)
        );
        assert_eq!(channel.detect(RuntimeSignal::Navigation(&link)), None);
    }

    #[test]
    fn test_message_payload_forms() {
        let channel = CommandQueueChannel::default();

        let single = ScriptMessage::new("reCallback", json!("focus"));
        assert_eq!(
            channel.detect(RuntimeSignal::Message(&single)),
            Some(Detection::Commands(vec![Command::Focus]))
        );

        let batch = ScriptMessage::new("reCallback", json!(["input", "action/bold"]));
        assert_eq!(
            channel.detect(RuntimeSignal::Message(&batch)),
            Some(Detection::Commands(vec![
                Command::Input,
                Command::Action("bold".into())
            ]))
        );

        let drain = ScriptMessage::new("reCallback", json!("re-callback://"));
        assert_eq!(
            channel.detect(RuntimeSignal::Message(&drain)),
            Some(Detection::DrainQueue)
        );
    }

    #[test]
    fn test_message_on_other_channel_ignored() {
        let channel = CommandQueueChannel::default();
        let msg = ScriptMessage::new("analytics", json!("ready"));
        assert_eq!(channel.detect(RuntimeSignal::Message(&msg)), None);
    }

    #[test]
    fn test_unusable_message_body_received_without_commands() {
        let channel = CommandQueueChannel::default();
        let msg = ScriptMessage::new("reCallback", json!({"type": "ready"}));
        assert_eq!(
            channel.detect(RuntimeSignal::Message(&msg)),
            Some(Detection::Commands(Vec::new()))
        );
    }

    #[test]
    fn test_empty_channel_detects_nothing() {
        let channel = CommandQueueChannel::empty();
        let sentinel = NavigationRequest::new("re-callback://", NavigationKind::Other);
        assert_eq!(channel.detect(RuntimeSignal::Navigation(&sentinel)), None);
    }
}
