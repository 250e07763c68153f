//! Observer slots for editor events
//!
//! Every hook is optional. An unset slot is a no-op, and for
//! `should_interact_with` an unset slot means "no opinion".

/// Callbacks the editor reports to
#[derive(Default)]
pub struct EditorDelegate {
    height_did_change: Option<Box<dyn FnMut(i64) + Send>>,
    content_did_change: Option<Box<dyn FnMut(&str) + Send>>,
    did_take_focus: Option<Box<dyn FnMut() + Send>>,
    did_lose_focus: Option<Box<dyn FnMut() + Send>>,
    did_load: Option<Box<dyn FnMut() + Send>>,
    should_interact_with: Option<Box<dyn FnMut(&str) -> bool + Send>>,
    handle_custom_action: Option<Box<dyn FnMut(&str) + Send>>,
}

impl EditorDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_height_change(mut self, f: impl FnMut(i64) + Send + 'static) -> Self {
        self.height_did_change = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_content_change(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.content_did_change = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_focus(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.did_take_focus = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_blur(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.did_lose_focus = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_load(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.did_load = Some(Box::new(f));
        self
    }

    /// Decide whether a clicked link may navigate
    #[must_use]
    pub fn on_link(mut self, f: impl FnMut(&str) -> bool + Send + 'static) -> Self {
        self.should_interact_with = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_custom_action(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.handle_custom_action = Some(Box::new(f));
        self
    }

    pub(crate) fn height_did_change(&mut self, height: i64) {
        if let Some(f) = self.height_did_change.as_mut() {
            f(height);
        }
    }

    pub(crate) fn content_did_change(&mut self, html: &str) {
        if let Some(f) = self.content_did_change.as_mut() {
            f(html);
        }
    }

    pub(crate) fn did_take_focus(&mut self) {
        if let Some(f) = self.did_take_focus.as_mut() {
            f();
        }
    }

    pub(crate) fn did_lose_focus(&mut self) {
        if let Some(f) = self.did_lose_focus.as_mut() {
            f();
        }
    }

    pub(crate) fn did_load(&mut self) {
        if let Some(f) = self.did_load.as_mut() {
            f();
        }
    }

    /// `None` when no hook is registered
    pub(crate) fn should_interact_with(&mut self, url: &str) -> Option<bool> {
        self.should_interact_with.as_mut().map(|f| f(url))
    }

    pub(crate) fn handle_custom_action(&mut self, name: &str) {
        if let Some(f) = self.handle_custom_action.as_mut() {
            f(name);
        }
    }
}

impl std::fmt::Debug for EditorDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorDelegate")
            .field("height_did_change", &self.height_did_change.is_some())
            .field("content_did_change", &self.content_did_change.is_some())
            .field("did_take_focus", &self.did_take_focus.is_some())
            .field("did_lose_focus", &self.did_lose_focus.is_some())
            .field("did_load", &self.did_load.is_some())
            .field("should_interact_with", &self.should_interact_with.is_some())
            .field("handle_custom_action", &self.handle_custom_action.is_some())
            .finish()
    }
}
