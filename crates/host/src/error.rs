//! Error types for the editor host
//!
//! None of these are fatal to the component. Callers of request/response
//! operations see them; fire-and-forget paths log and drop them.

use std::path::PathBuf;
use std::time::Duration;

/// A bridge call into the script runtime failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The runtime raised an error while evaluating the script
    #[error("script evaluation failed: {0}")]
    Runtime(String),
    /// The bridge pump is gone, so no result will ever arrive
    #[error("script runtime disconnected")]
    Disconnected,
    /// No result arrived within the configured deadline
    #[error("script call timed out after {0:?}")]
    Timeout(Duration),
}

/// A resource-scheme request could not be served
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("unsupported scheme: {0}")]
    Scheme(String),
    #[error("path escapes resource root: {0}")]
    OutsideRoot(String),
    #[error("resource not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image transcode failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Configuration file could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
