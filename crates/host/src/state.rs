//! Host-side mirror of the editor's state
//!
//! Until the script reports `ready`, the store is the only source of truth:
//! setters only update the cache and the push into the runtime is deferred
//! to the ready handler. Once loaded, setters hand back the call that pushes
//! the new value through.

use rich_editor_protocol::{calls, ScriptCall};

use crate::delegate::EditorDelegate;

/// Line height the editor starts with, in px
pub const DEFAULT_LINE_HEIGHT: i64 = 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub content_html: String,
    pub height: i64,
    pub line_height: i64,
    pub is_editable: bool,
    pub placeholder: String,
    pub is_loaded: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            content_html: String::new(),
            height: 0,
            line_height: DEFAULT_LINE_HEIGHT,
            is_editable: true,
            placeholder: String::new(),
            is_loaded: false,
        }
    }
}

/// Where a getter reads from
#[derive(Debug, Clone, Copy)]
pub enum Access<'a> {
    /// Runtime not ready; answer from the cache
    Cached(&'a EditorState),
    /// Runtime ready; query through
    Live,
}

#[derive(Debug, Default)]
pub struct EditorStateStore {
    state: EditorState,
}

impl EditorStateStore {
    pub fn new(initial: EditorState) -> Self {
        Self { state: initial }
    }

    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    pub const fn is_loaded(&self) -> bool {
        self.state.is_loaded
    }

    pub const fn access(&self) -> Access<'_> {
        if self.state.is_loaded {
            Access::Live
        } else {
            Access::Cached(&self.state)
        }
    }

    /// Flip to loaded; true only on the first call
    pub(crate) fn mark_loaded(&mut self) -> bool {
        let first = !self.state.is_loaded;
        self.state.is_loaded = true;
        first
    }

    /// Calls that push every deferred value, in flush order
    pub(crate) fn flush_calls(&self) -> [ScriptCall; 4] {
        [
            calls::set_html(&self.state.content_html),
            calls::set_content_editable(self.state.is_editable),
            calls::set_placeholder_text(&self.state.placeholder),
            calls::set_line_height(self.state.line_height),
        ]
    }

    /// Update cached content, notifying only on an actual change
    pub(crate) fn set_content(&mut self, html: String, delegate: &mut EditorDelegate) -> bool {
        if self.state.content_html == html {
            return false;
        }
        self.state.content_html = html;
        delegate.content_did_change(&self.state.content_html);
        true
    }

    /// Update cached height, notifying only on an actual change
    pub(crate) fn set_height(&mut self, height: i64, delegate: &mut EditorDelegate) -> bool {
        if self.state.height == height {
            return false;
        }
        self.state.height = height;
        delegate.height_did_change(height);
        true
    }

    pub(crate) fn set_placeholder(&mut self, text: String) -> Option<ScriptCall> {
        self.state.placeholder = text;
        self.push(calls::set_placeholder_text(&self.state.placeholder))
    }

    pub(crate) fn set_line_height(&mut self, px: i64) -> Option<ScriptCall> {
        self.state.line_height = px;
        self.push(calls::set_line_height(px))
    }

    pub(crate) fn set_editable(&mut self, editable: bool) -> Option<ScriptCall> {
        self.state.is_editable = editable;
        self.push(calls::set_content_editable(editable))
    }

    fn push(&self, call: ScriptCall) -> Option<ScriptCall> {
        self.state.is_loaded.then_some(call)
    }
}
