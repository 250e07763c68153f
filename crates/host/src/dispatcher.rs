//! Command handlers
//!
//! Applies each dequeued command to the state store and the delegate.
//! Commands from one drain are handled strictly in queue order; each one's
//! runtime round-trips complete before the next command starts.

use rich_editor_protocol::{calls, Command};

use crate::bridge::ScriptBridge;
use crate::caret::{CaretVisibilityController, ScrollViewport};
use crate::delegate::EditorDelegate;
use crate::state::EditorStateStore;

/// Borrows the editor's parts for the duration of a dispatch
pub struct CommandDispatcher<'a> {
    bridge: &'a ScriptBridge,
    state: &'a mut EditorStateStore,
    delegate: &'a mut EditorDelegate,
    viewport: &'a mut dyn ScrollViewport,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(
        bridge: &'a ScriptBridge,
        state: &'a mut EditorStateStore,
        delegate: &'a mut EditorDelegate,
        viewport: &'a mut dyn ScrollViewport,
    ) -> Self {
        Self {
            bridge,
            state,
            delegate,
            viewport,
        }
    }

    pub async fn dispatch_all(&mut self, commands: &[Command]) {
        for command in commands {
            self.dispatch(command).await;
        }
    }

    #[tracing::instrument(skip(self, command), fields(command = %command), level = "debug")]
    pub async fn dispatch(&mut self, command: &Command) {
        match command {
            Command::Ready => self.on_ready().await,
            Command::Input => self.on_input().await,
            Command::UpdateHeight => self.update_height().await,
            Command::Focus => self.delegate.did_take_focus(),
            Command::Blur => self.delegate.did_lose_focus(),
            Command::Action(name) => {
                self.refresh_content().await;
                self.delegate.handle_custom_action(name);
            }
            Command::Unknown(raw) => {
                tracing::debug!(command = %raw, "Ignoring unknown command");
            }
        }
    }

    async fn on_ready(&mut self) {
        if self.state.mark_loaded() {
            tracing::info!("Editor runtime ready, flushing deferred state");
            for call in self.state.flush_calls() {
                self.bridge.call(&call);
            }
            self.delegate.did_load();
        }
        self.update_height().await;
    }

    async fn on_input(&mut self) {
        if let Err(e) = CaretVisibilityController::run(self.bridge, &mut *self.viewport).await {
            tracing::warn!(error = %e, "Caret visibility check failed");
        }
        self.refresh_content().await;
        self.update_height().await;
    }

    /// Re-read the document and overwrite the cached content
    pub async fn refresh_content(&mut self) {
        match self.bridge.string(&calls::get_html()).await {
            Ok(html) => {
                self.state.set_content(html, self.delegate);
            }
            Err(e) => tracing::warn!(error = %e, "Keeping cached content"),
        }
    }

    pub async fn update_height(&mut self) {
        match self.bridge.int(&calls::get_client_height()).await {
            Ok(height) => {
                self.state.set_height(height, self.delegate);
            }
            Err(e) => tracing::warn!(error = %e, "Keeping cached height"),
        }
    }
}
