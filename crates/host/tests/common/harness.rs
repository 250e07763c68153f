//! Test harness wiring a view to the mock runtime
//!
//! Every delegate event is recorded as a short string (`load`,
//! `height:300`, `action:save`, ...) so tests can assert on order.

use std::sync::{Arc, Mutex};

use rich_editor_host::{
    EditorConfig, EditorDelegate, NavigationKind, NavigationPolicy, NavigationRequest,
    RichEditorView, ViewportState,
};

use super::{init_tracing, MockRuntime};

/// Visible height of the harness viewport
pub const VIEWPORT_HEIGHT: i64 = 500;

pub struct TestHarness {
    pub runtime: Arc<MockRuntime>,
    pub view: RichEditorView,
    events: Arc<Mutex<Vec<String>>>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self::build(config, |d| d)
    }

    /// Harness whose delegate also carries the hooks `extend` adds
    pub fn with_delegate(extend: impl FnOnce(EditorDelegate) -> EditorDelegate) -> Self {
        Self::build(&EditorConfig::default(), extend)
    }

    fn build(
        config: &EditorConfig,
        extend: impl FnOnce(EditorDelegate) -> EditorDelegate,
    ) -> Self {
        init_tracing();
        let runtime = Arc::new(MockRuntime::new());
        let events = Arc::new(Mutex::new(Vec::new()));

        let delegate = recording_delegate(&events);
        let view = RichEditorView::new(runtime.clone(), config)
            .with_delegate(extend(delegate))
            .with_viewport(ViewportState::new(VIEWPORT_HEIGHT));

        Self {
            runtime,
            view,
            events,
        }
    }

    /// Queue `commands` script-side and fire the sentinel navigation
    pub async fn signal(&mut self, commands: &[&str]) -> NavigationPolicy {
        self.runtime.enqueue(commands);
        let request = NavigationRequest::new("re-callback://", NavigationKind::Other);
        let policy = self.view.decide_navigation(&request).await;
        self.settle().await;
        policy
    }

    pub async fn ready(&mut self) {
        self.signal(&["ready"]).await;
    }

    /// Wait for every fire-and-forget call issued so far
    pub async fn settle(&self) {
        self.view.bridge().flush().await;
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }
}

fn recording_delegate(events: &Arc<Mutex<Vec<String>>>) -> EditorDelegate {
    let record = |events: &Arc<Mutex<Vec<String>>>| {
        let events = events.clone();
        move |entry: String| events.lock().unwrap().push(entry)
    };

    let height = record(events);
    let content = record(events);
    let focus = record(events);
    let blur = record(events);
    let load = record(events);
    let action = record(events);

    EditorDelegate::new()
        .on_height_change(move |h| height(format!("height:{h}")))
        .on_content_change(move |html| content(format!("content:{html}")))
        .on_focus(move || focus("focus".to_string()))
        .on_blur(move || blur("blur".to_string()))
        .on_load(move || load("load".to_string()))
        .on_custom_action(move |name| action(format!("action:{name}")))
}
