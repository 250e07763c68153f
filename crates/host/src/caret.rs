//! Keeps the caret inside the visible viewport after input
//!
//! Content height, line height and caret offset are fetched one after the
//! other; each stage starts only once the previous one has resolved, and
//! the scroll decision is made from all three.

use rich_editor_protocol::calls;

use crate::bridge::ScriptBridge;
use crate::error::BridgeError;

/// Vertical gap between the line box and the drawn caret, in px
const CARET_INSET: i64 = 4;

/// The scrollable surface hosting the editor
pub trait ScrollViewport: Send {
    /// Visible height in px
    fn viewport_height(&self) -> i64;
    /// Current vertical scroll offset in px
    fn scroll_y(&self) -> i64;
    fn set_content_height(&mut self, height: i64);
    fn scroll_to(&mut self, y: i64);
}

/// In-memory viewport, for hosts that apply offsets themselves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportState {
    pub height: i64,
    pub scroll_y: i64,
    pub content_height: i64,
}

impl ViewportState {
    pub const fn new(height: i64) -> Self {
        Self {
            height,
            scroll_y: 0,
            content_height: 0,
        }
    }
}

impl ScrollViewport for ViewportState {
    fn viewport_height(&self) -> i64 {
        self.height
    }

    fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    fn set_content_height(&mut self, height: i64) {
        self.content_height = height;
    }

    fn scroll_to(&mut self, y: i64) {
        self.scroll_y = y;
    }
}

/// Measurements gathered from the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretMetrics {
    pub content_height: i64,
    pub line_height: i64,
    /// Caret offset relative to the visible area
    pub caret_y: i64,
}

/// Scroll offset that brings the caret back into view, if any
///
/// Arithmetic saturates; the runtime can report any number.
pub const fn scroll_target(metrics: &CaretMetrics, viewport_height: i64, scroll_y: i64) -> Option<i64> {
    let cursor_height = metrics.line_height.saturating_sub(CARET_INSET);
    if metrics.caret_y.saturating_add(cursor_height) > viewport_height {
        let bottom = metrics.caret_y.saturating_add(metrics.line_height);
        Some(bottom.saturating_sub(viewport_height).saturating_add(scroll_y))
    } else if metrics.caret_y < 0 {
        let y = scroll_y.saturating_add(metrics.caret_y);
        Some(if y < 0 { 0 } else { y })
    } else {
        None
    }
}

pub struct CaretVisibilityController;

impl CaretVisibilityController {
    /// Fetch the three measurements in dependency order
    ///
    /// The viewport's content height is updated as soon as the client
    /// height is known, before the line height is requested.
    pub async fn measure(
        bridge: &ScriptBridge,
        viewport: &mut (dyn ScrollViewport + '_),
    ) -> Result<CaretMetrics, BridgeError> {
        let client_height = bridge.int(&calls::get_client_height()).await?;
        let content_height = if client_height > 0 {
            client_height
        } else {
            viewport.viewport_height()
        };
        viewport.set_content_height(content_height);

        let line_height = bridge.int(&calls::get_line_height()).await?;
        let caret_y = bridge.int(&calls::get_relative_caret_y_position()).await?;

        Ok(CaretMetrics {
            content_height,
            line_height,
            caret_y,
        })
    }

    /// Measure and scroll; returns the offset applied, if any
    ///
    /// A viewport with no height yet is never scrolled.
    pub async fn run(
        bridge: &ScriptBridge,
        viewport: &mut (dyn ScrollViewport + '_),
    ) -> Result<Option<i64>, BridgeError> {
        let metrics = Self::measure(bridge, viewport).await?;
        let viewport_height = viewport.viewport_height();
        if viewport_height <= 0 {
            tracing::debug!(viewport_height, "Viewport not laid out, skipping caret scroll");
            return Ok(None);
        }
        let target = scroll_target(&metrics, viewport_height, viewport.scroll_y());
        if let Some(y) = target {
            tracing::debug!(y, caret_y = metrics.caret_y, "Scrolling caret into view");
            viewport.scroll_to(y);
        }
        Ok(target)
    }
}
