// rich-editor-host library
// WYSIWYG editor component bridging a contenteditable script runtime over tokio

// Script runtime bridge
pub mod bridge;
pub mod error;

// Command transport and dispatch
pub mod channel;
pub mod dispatcher;

// Editor state and host callbacks
pub mod delegate;
pub mod state;

// Caret visibility and scrolling
pub mod caret;

// Configuration
pub mod config;

// Local resource scheme
pub mod resource;

// Public component
pub mod view;

pub use bridge::{ScriptBridge, ScriptCallResult, ScriptRuntime};
pub use caret::{ScrollViewport, ViewportState};
pub use channel::{
    CallbackTransport, CommandQueueChannel, NavigationKind, NavigationPolicy, NavigationRequest,
    ScriptMessage,
};
pub use config::EditorConfig;
pub use delegate::EditorDelegate;
pub use error::{BridgeError, ConfigError, ResourceError};
pub use resource::{ResourceResponse, ResourceSchemeHandler};
pub use state::EditorState;
pub use view::RichEditorView;

pub use rich_editor_protocol as protocol;
