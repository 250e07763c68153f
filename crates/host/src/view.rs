//! The rich editor component
//!
//! `RichEditorView` owns the bridge, the cached state and the delegate, and
//! is the single place runtime signals enter. State changes go through
//! `&mut self`, so only one task touches them at a time.

use std::sync::Arc;

use rich_editor_protocol::calls::{self, EditVerb};
use rich_editor_protocol::{is_callback_url, Command, ScriptCall};

use crate::bridge::{ScriptBridge, ScriptRuntime};
use crate::caret::{ScrollViewport, ViewportState};
use crate::channel::{
    CommandQueueChannel, NavigationKind, NavigationPolicy, NavigationRequest, RuntimeSignal,
    ScriptMessage,
};
use crate::config::EditorConfig;
use crate::delegate::EditorDelegate;
use crate::dispatcher::CommandDispatcher;
use crate::error::BridgeError;
use crate::resource::ResourceSchemeHandler;
use crate::state::{Access, EditorState, EditorStateStore};

pub struct RichEditorView {
    bridge: ScriptBridge,
    state: EditorStateStore,
    delegate: EditorDelegate,
    viewport: Box<dyn ScrollViewport>,
    channel: CommandQueueChannel,
    resources: ResourceSchemeHandler,
}

impl RichEditorView {
    /// Create the view and start its bridge on the current tokio runtime
    pub fn new(runtime: Arc<dyn ScriptRuntime>, config: &EditorConfig) -> Self {
        Self {
            bridge: ScriptBridge::spawn(runtime).with_call_timeout(config.call_timeout()),
            state: EditorStateStore::new(config.initial_state()),
            delegate: EditorDelegate::default(),
            viewport: Box::new(ViewportState::default()),
            channel: CommandQueueChannel::default(),
            resources: ResourceSchemeHandler::from_config(&config.resources),
        }
    }

    #[must_use]
    pub fn with_delegate(mut self, delegate: EditorDelegate) -> Self {
        self.delegate = delegate;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: impl ScrollViewport + 'static) -> Self {
        self.viewport = Box::new(viewport);
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: CommandQueueChannel) -> Self {
        self.channel = channel;
        self
    }

    pub fn set_delegate(&mut self, delegate: EditorDelegate) {
        self.delegate = delegate;
    }

    pub const fn bridge(&self) -> &ScriptBridge {
        &self.bridge
    }

    /// Cached state, whatever the readiness
    pub const fn state(&self) -> &EditorState {
        self.state.state()
    }

    pub const fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    pub fn viewport(&self) -> &dyn ScrollViewport {
        self.viewport.as_ref()
    }

    pub fn viewport_mut(&mut self) -> &mut dyn ScrollViewport {
        self.viewport.as_mut()
    }

    pub const fn resources(&self) -> &ResourceSchemeHandler {
        &self.resources
    }

    fn dispatcher(&mut self) -> CommandDispatcher<'_> {
        CommandDispatcher::new(
            &self.bridge,
            &mut self.state,
            &mut self.delegate,
            self.viewport.as_mut(),
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Runtime signals
    // ─────────────────────────────────────────────────────────────────────────

    /// Decide whether the web surface may perform a navigation
    ///
    /// Callback navigations are consumed and always cancelled. Link clicks
    /// ask the delegate and default to allow; other loads are allowed.
    pub async fn decide_navigation(&mut self, request: &NavigationRequest) -> NavigationPolicy {
        if self.process(RuntimeSignal::Navigation(request)).await || is_callback_url(&request.url) {
            return NavigationPolicy::Cancel;
        }

        match request.kind {
            NavigationKind::LinkActivated => {
                if self.delegate.should_interact_with(&request.url).unwrap_or(true) {
                    NavigationPolicy::Allow
                } else {
                    NavigationPolicy::Cancel
                }
            }
            NavigationKind::Other => NavigationPolicy::Allow,
        }
    }

    /// Callback form of [`Self::decide_navigation`]; `decision` runs exactly once
    pub async fn decide_navigation_with(
        &mut self,
        request: &NavigationRequest,
        decision: impl FnOnce(NavigationPolicy) + Send,
    ) {
        decision(self.decide_navigation(request).await);
    }

    /// Receive a message the script posted directly
    pub async fn receive_message(&mut self, message: &ScriptMessage) {
        if !self.process(RuntimeSignal::Message(message)).await {
            tracing::debug!(channel = %message.channel, "Message on unhandled channel");
        }
    }

    /// Dispatch commands obtained some other way, in order
    pub async fn dispatch(&mut self, commands: &[Command]) {
        self.dispatcher().dispatch_all(commands).await;
    }

    /// Returns whether any transport recognised the signal
    async fn process(&mut self, signal: RuntimeSignal<'_>) -> bool {
        let Some(commands) = self.channel.receive(&self.bridge, signal).await else {
            return false;
        };
        self.dispatch(&commands).await;
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn html(&self) -> Result<String, BridgeError> {
        match self.state.access() {
            Access::Cached(state) => Ok(state.content_html.clone()),
            Access::Live => self.bridge.string(&calls::get_html()).await,
        }
    }

    /// Replace the document; pushed immediately once loaded, else on ready
    pub async fn set_html(&mut self, html: impl Into<String>) {
        let html = html.into();
        self.state.set_content(html, &mut self.delegate);
        if self.state.is_loaded() {
            self.bridge.call(&calls::set_html(&self.state.state().content_html));
            self.dispatcher().update_height().await;
        }
    }

    /// Plain text of the document; empty before the runtime is ready
    pub async fn text(&self) -> Result<String, BridgeError> {
        match self.state.access() {
            Access::Cached(_) => Ok(String::new()),
            Access::Live => self.bridge.string(&calls::get_text()).await,
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.state.state().placeholder
    }

    pub fn set_placeholder(&mut self, text: impl Into<String>) {
        if let Some(call) = self.state.set_placeholder(text.into()) {
            self.bridge.call(&call);
        }
    }

    pub async fn line_height(&self) -> Result<i64, BridgeError> {
        match self.state.access() {
            Access::Cached(state) => Ok(state.line_height),
            Access::Live => self.bridge.int(&calls::get_line_height()).await,
        }
    }

    pub fn set_line_height(&mut self, px: i64) {
        if let Some(call) = self.state.set_line_height(px) {
            self.bridge.call(&call);
        }
    }

    /// Height of the editable content in px
    pub async fn client_height(&self) -> Result<i64, BridgeError> {
        match self.state.access() {
            Access::Cached(state) => Ok(state.height),
            Access::Live => self.bridge.int(&calls::get_client_height()).await,
        }
    }

    pub async fn is_editing_enabled(&self) -> Result<bool, BridgeError> {
        match self.state.access() {
            Access::Cached(state) => Ok(state.is_editable),
            Access::Live => self.bridge.bool(&calls::is_content_editable()).await,
        }
    }

    pub fn set_editing_enabled(&mut self, enabled: bool) {
        if let Some(call) = self.state.set_editable(enabled) {
            self.bridge.call(&call);
        }
    }

    /// Target of the link under the selection, empty if none
    pub async fn selected_href(&self) -> Result<String, BridgeError> {
        match self.state.access() {
            Access::Cached(_) => Ok(String::new()),
            Access::Live => self.bridge.string(&calls::get_selected_href()).await,
        }
    }

    pub async fn has_range_selection(&self) -> Result<bool, BridgeError> {
        match self.state.access() {
            Access::Cached(_) => Ok(false),
            Access::Live => self.bridge.bool(&calls::range_selection_exists()).await,
        }
    }

    pub async fn has_range_or_caret_selection(&self) -> Result<bool, BridgeError> {
        match self.state.access() {
            Access::Cached(_) => Ok(false),
            Access::Live => {
                self.bridge
                    .bool(&calls::range_or_caret_selection_exists())
                    .await
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing commands (fire-and-forget)
    // ─────────────────────────────────────────────────────────────────────────

    fn run(&self, call: &ScriptCall) {
        if !self.state.is_loaded() {
            tracing::debug!(method = %call.method, "Runtime not ready, dropping command");
            return;
        }
        self.bridge.call(call);
    }

    fn run_verb(&self, verb: EditVerb) {
        self.run(&verb.call());
    }

    pub fn set_font_size(&self, px: i64) {
        self.run(&calls::set_font_size(px));
    }

    pub fn set_editor_background_color(&self, hex: &str) {
        self.run(&calls::set_editor_background_color(hex));
    }

    pub fn set_text_color(&self, hex: &str) {
        self.run(&calls::set_text_color(hex));
    }

    /// Highlight color behind the selected text
    pub fn set_text_background_color(&self, hex: &str) {
        self.run(&calls::set_text_background_color(hex));
    }

    pub fn bold(&self) {
        self.run_verb(EditVerb::Bold);
    }

    pub fn italic(&self) {
        self.run_verb(EditVerb::Italic);
    }

    pub fn subscript(&self) {
        self.run_verb(EditVerb::Subscript);
    }

    pub fn superscript(&self) {
        self.run_verb(EditVerb::Superscript);
    }

    pub fn strikethrough(&self) {
        self.run_verb(EditVerb::Strikethrough);
    }

    pub fn underline(&self) {
        self.run_verb(EditVerb::Underline);
    }

    /// Heading level, clamped to 1..=6
    pub fn header(&self, level: u8) {
        self.run(&calls::set_heading(level.clamp(1, 6)));
    }

    pub fn indent(&self) {
        self.run_verb(EditVerb::Indent);
    }

    pub fn outdent(&self) {
        self.run_verb(EditVerb::Outdent);
    }

    pub fn ordered_list(&self) {
        self.run_verb(EditVerb::OrderedList);
    }

    pub fn unordered_list(&self) {
        self.run_verb(EditVerb::UnorderedList);
    }

    pub fn blockquote(&self) {
        self.run_verb(EditVerb::Blockquote);
    }

    pub fn align_left(&self) {
        self.run_verb(EditVerb::AlignLeft);
    }

    pub fn align_center(&self) {
        self.run_verb(EditVerb::AlignCenter);
    }

    pub fn align_right(&self) {
        self.run_verb(EditVerb::AlignRight);
    }

    pub fn remove_format(&self) {
        self.run_verb(EditVerb::RemoveFormat);
    }

    /// Save the selection before focus moves to a picker
    pub fn prepare_insert(&self) {
        self.run_verb(EditVerb::PrepareInsert);
    }

    pub fn insert_image(&self, url: &str, alt: &str, width: i64, height: i64) {
        self.run(&calls::insert_image(url, alt, width, height));
    }

    pub fn insert_link(&self, href: &str, title: &str) {
        self.run(&calls::insert_link(href, title));
    }

    pub fn undo(&self) {
        self.run_verb(EditVerb::Undo);
    }

    pub fn redo(&self) {
        self.run_verb(EditVerb::Redo);
    }

    pub fn focus(&self) {
        self.run_verb(EditVerb::Focus);
    }

    /// Focus and place the caret nearest to a point in the document
    pub fn focus_at(&self, x: f64, y: f64) {
        self.run(&calls::focus_at_point(x, y));
    }

    pub fn blur(&self) {
        self.run_verb(EditVerb::Blur);
    }
}
