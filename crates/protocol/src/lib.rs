//! Shared protocol types for the rich editor
//!
//! Defines the contract between the host component and the embedded
//! editing script: the commands the script enqueues, the JSON queue it
//! hands back, and the `RE.*` calls the host evaluates.

pub mod calls;
pub mod command;
pub mod queue;
pub mod script;

pub use command::*;
pub use queue::*;
pub use script::*;

/// Navigation prefix the script uses to signal pending commands.
///
/// A navigation to this target is never a real destination.
pub const CALLBACK_SCHEME_PREFIX: &str = "re-callback://";

/// Name of the direct message channel the script may post to.
pub const MESSAGE_CHANNEL: &str = "reCallback";

/// Namespace object the editing script exports.
pub const SCRIPT_NAMESPACE: &str = "RE";

/// Returns true when `url` is a sentinel callback navigation
pub fn is_callback_url(url: &str) -> bool {
    url.starts_with(CALLBACK_SCHEME_PREFIX)
}
