//! Commands enqueued by the editing script
//!
//! Each queued entry is a string of the form `<verb>` or `<verb>/<argument>`.
//! Matching is by prefix, the same way the script builds them, and the
//! `action/` form is only tried after every fixed verb has failed to match.

use std::fmt;

/// Prefix of custom action commands: `action/<name>`
pub const ACTION_PREFIX: &str = "action/";

/// A command dequeued from the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The script has loaded and is ready for configuration
    Ready,
    /// The editable content changed
    Input,
    /// The document height may have changed
    UpdateHeight,
    /// The editor took focus
    Focus,
    /// The editor lost focus
    Blur,
    /// A custom action, name stripped of the `action/` prefix
    Action(String),
    /// Anything outside the closed verb set
    Unknown(String),
}

impl Command {
    /// Verb name as it appears on the wire
    pub fn verb(&self) -> &str {
        match self {
            Self::Ready => "ready",
            Self::Input => "input",
            Self::UpdateHeight => "updateHeight",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Action(_) => "action",
            Self::Unknown(s) => s,
        }
    }

    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        if s.starts_with("ready") {
            Self::Ready
        } else if s.starts_with("input") {
            Self::Input
        } else if s.starts_with("updateHeight") {
            Self::UpdateHeight
        } else if s.starts_with("focus") {
            Self::Focus
        } else if s.starts_with("blur") {
            Self::Blur
        } else if let Some(name) = s.strip_prefix(ACTION_PREFIX).filter(|n| !n.is_empty()) {
            Self::Action(name.to_string())
        } else {
            Self::Unknown(s.to_string())
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(name) => write!(f, "{ACTION_PREFIX}{name}"),
            other => write!(f, "{}", other.verb()),
        }
    }
}
