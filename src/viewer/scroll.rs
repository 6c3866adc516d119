//! Scrollbar state machine.
//!
//! One [`ScrollController`] per surface owns the scroll offsets. Wheel input
//! moves them directly; dragging a thumb maps the thumb position back to a
//! content offset. Offsets are clamped to `[0, content - viewport + thickness]`.

use serde::Serialize;

use crate::color::palette;
use crate::render::Surface;

/// Smallest thumb length in pixels
pub const MIN_THUMB_SIZE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// A thumb is held; `grab` is the pointer offset from the thumb start.
    Dragging { axis: ScrollAxis, grab: f64 },
}

/// Scroll offsets handed to the render callback
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPosition {
    pub scroll_left: f64,
    pub scroll_top: f64,
}

/// Thumb geometry for the current offsets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollbarMetrics {
    pub thumb_width: f64,
    pub thumb_height: f64,
    pub thumb_x: f64,
    pub thumb_y: f64,
    pub has_horizontal: bool,
    pub has_vertical: bool,
}

/// Called with the new offsets whenever they change through input
pub type RenderViewport = Box<dyn FnMut(ScrollPosition)>;

pub struct ScrollController {
    viewport_width: f64,
    viewport_height: f64,
    content_width: f64,
    content_height: f64,
    thickness: f64,
    position: ScrollPosition,
    drag: DragState,
    attached: bool,
    on_render: Option<RenderViewport>,
}

impl std::fmt::Debug for ScrollController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollController")
            .field("viewport", &(self.viewport_width, self.viewport_height))
            .field("content", &(self.content_width, self.content_height))
            .field("thickness", &self.thickness)
            .field("position", &self.position)
            .field("drag", &self.drag)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

impl ScrollController {
    pub fn new(thickness: f64) -> Self {
        Self {
            viewport_width: 0.0,
            viewport_height: 0.0,
            content_width: 0.0,
            content_height: 0.0,
            thickness: thickness.max(0.0),
            position: ScrollPosition::default(),
            drag: DragState::Idle,
            attached: true,
            on_render: None,
        }
    }

    /// Store the geometry and reset offsets to zero. Does not render.
    pub fn init(
        &mut self,
        viewport_width: f64,
        viewport_height: f64,
        content_width: f64,
        content_height: f64,
    ) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
        self.content_width = content_width;
        self.content_height = content_height;
        self.position = ScrollPosition::default();
        self.drag = DragState::Idle;
        tracing::trace!(
            viewport_width,
            viewport_height,
            content_width,
            content_height,
            "scroll controller initialized"
        );
    }

    pub fn set_render_callback(&mut self, callback: impl FnMut(ScrollPosition) + 'static) {
        self.on_render = Some(Box::new(callback));
    }

    /// New viewport size; offsets are kept but re-clamped.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.position.scroll_left = self.clamp(ScrollAxis::Horizontal, self.position.scroll_left);
        self.position.scroll_top = self.clamp(ScrollAxis::Vertical, self.position.scroll_top);
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Largest offset on `axis`, including the scrollbar slack.
    pub fn max_scroll(&self, axis: ScrollAxis) -> f64 {
        let (viewport, content) = self.extents(axis);
        (content - viewport + self.thickness).max(0.0)
    }

    /// Clamp a raw offset into the scrollable range.
    pub fn clamp(&self, axis: ScrollAxis, offset: f64) -> f64 {
        if offset.is_nan() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_scroll(axis))
    }

    /// Apply a wheel delta. Every event renders once.
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        if !self.attached {
            return false;
        }
        let left = self.position.scroll_left + delta_x;
        let top = self.position.scroll_top + delta_y;
        self.position.scroll_left = self.clamp(ScrollAxis::Horizontal, left);
        self.position.scroll_top = self.clamp(ScrollAxis::Vertical, top);
        tracing::trace!(
            delta_x,
            delta_y,
            scroll_left = self.position.scroll_left,
            scroll_top = self.position.scroll_top,
            "wheel"
        );
        self.emit();
        true
    }

    /// Jump to absolute offsets.
    pub fn scroll_to(&mut self, left: f64, top: f64) -> bool {
        if !self.attached {
            return false;
        }
        self.position.scroll_left = self.clamp(ScrollAxis::Horizontal, left);
        self.position.scroll_top = self.clamp(ScrollAxis::Vertical, top);
        self.emit();
        true
    }

    /// Start a drag when `(x, y)` is on a thumb. Returns whether it was.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        if !self.attached {
            return false;
        }
        let m = self.scrollbar_metrics();
        let t = self.thickness;
        let on_vertical = m.has_vertical
            && x >= self.viewport_width - t
            && x <= self.viewport_width
            && y >= m.thumb_y
            && y <= m.thumb_y + m.thumb_height;
        let on_horizontal = m.has_horizontal
            && y >= self.viewport_height - t
            && y <= self.viewport_height
            && x >= m.thumb_x
            && x <= m.thumb_x + m.thumb_width;

        self.drag = if on_vertical {
            DragState::Dragging {
                axis: ScrollAxis::Vertical,
                grab: y - m.thumb_y,
            }
        } else if on_horizontal {
            DragState::Dragging {
                axis: ScrollAxis::Horizontal,
                grab: x - m.thumb_x,
            }
        } else {
            return false;
        };
        tracing::trace!(state = ?self.drag, "drag start");
        true
    }

    /// Follow the pointer while dragging. Returns whether offsets were updated.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let DragState::Dragging { axis, grab } = self.drag else {
            return false;
        };
        let (viewport, _) = self.extents(axis);
        let thumb_size = self.thumb_size(axis);
        let pointer = match axis {
            ScrollAxis::Horizontal => x,
            ScrollAxis::Vertical => y,
        };
        let travel = (viewport - thumb_size).max(0.0);
        let thumb = (pointer - grab).clamp(0.0, travel);
        let ratio = if travel > 0.0 { thumb / travel } else { 0.0 };
        let offset = self.clamp(axis, ratio * self.max_scroll(axis));
        match axis {
            ScrollAxis::Horizontal => self.position.scroll_left = offset,
            ScrollAxis::Vertical => self.position.scroll_top = offset,
        }
        tracing::trace!(?axis, thumb, offset, "drag");
        self.emit();
        true
    }

    /// End any drag. Returns whether one was in progress.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = matches!(self.drag, DragState::Dragging { .. });
        if was_dragging {
            tracing::trace!("drag end");
        }
        self.drag = DragState::Idle;
        was_dragging
    }

    /// Accept input again. No-op when already attached.
    pub fn attach(&mut self) {
        if !self.attached {
            self.attached = true;
            tracing::trace!("scroll controller attached");
        }
    }

    /// Stop accepting input and drop any drag. No-op when already detached.
    pub fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            self.drag = DragState::Idle;
            tracing::trace!("scroll controller detached");
        }
    }

    pub fn scrollbar_metrics(&self) -> ScrollbarMetrics {
        let thumb_width = self.thumb_size(ScrollAxis::Horizontal);
        let thumb_height = self.thumb_size(ScrollAxis::Vertical);
        ScrollbarMetrics {
            thumb_width,
            thumb_height,
            thumb_x: self.thumb_position(ScrollAxis::Horizontal),
            thumb_y: self.thumb_position(ScrollAxis::Vertical),
            has_horizontal: thumb_width < self.viewport_width,
            has_vertical: thumb_height < self.viewport_height,
        }
    }

    /// Draw the track and thumb of every overflowing axis.
    pub fn render_scrollbar<S: Surface + ?Sized>(&self, surface: &mut S) {
        let m = self.scrollbar_metrics();
        let t = self.thickness;
        let (vw, vh) = (self.viewport_width, self.viewport_height);
        if m.has_vertical {
            surface.set_fill_color(palette::SCROLLBAR_TRACK);
            surface.fill_rect(vw - t, 0.0, t, vh);
            surface.set_fill_color(palette::SCROLLBAR_THUMB);
            surface.fill_rect(vw - t * 0.75, m.thumb_y, t / 2.0, m.thumb_height);
        }
        if m.has_horizontal {
            surface.set_fill_color(palette::SCROLLBAR_TRACK);
            surface.fill_rect(0.0, vh - t, vw, t);
            surface.set_fill_color(palette::SCROLLBAR_THUMB);
            surface.fill_rect(m.thumb_x, vh - t * 0.75, m.thumb_width, t / 2.0);
        }
    }

    fn extents(&self, axis: ScrollAxis) -> (f64, f64) {
        match axis {
            ScrollAxis::Horizontal => (self.viewport_width, self.content_width),
            ScrollAxis::Vertical => (self.viewport_height, self.content_height),
        }
    }

    fn thumb_size(&self, axis: ScrollAxis) -> f64 {
        let (viewport, content) = self.extents(axis);
        if content <= 0.0 {
            return viewport;
        }
        (viewport * (viewport / content)).max(MIN_THUMB_SIZE)
    }

    fn thumb_position(&self, axis: ScrollAxis) -> f64 {
        let (viewport, content) = self.extents(axis);
        if content <= 0.0 {
            return 0.0;
        }
        let offset = match axis {
            ScrollAxis::Horizontal => self.position.scroll_left,
            ScrollAxis::Vertical => self.position.scroll_top,
        };
        offset / content * viewport
    }

    fn emit(&mut self) {
        let position = self.position;
        if let Some(callback) = self.on_render.as_mut() {
            callback(position);
        }
    }
}
