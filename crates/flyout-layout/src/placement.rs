#![forbid(unsafe_code)]

//! Placement output and horizontal alignment preferences.

use flyout_core::geometry::{Rect, Size, Viewport};

/// Which trigger edge the panel's leading edge should line up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreferredSide {
    /// Panel's left edge on the trigger's left edge.
    #[default]
    Start,
    /// Panel's right edge on the trigger's right edge (trailing action buttons).
    End,
    /// Panel centered under the trigger.
    Center,
}

/// The horizontal alignment the solver actually chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    /// Left edges aligned.
    Start,
    /// Right edges aligned.
    End,
    /// Centered on the trigger.
    AnchorCenter,
    /// Neither edge fit; centered in the viewport inside the safe margin.
    ViewportCenter,
}

/// Where and how big a floating panel renders.
///
/// All values are viewport-relative (fixed positioning). Exactly one of
/// `top`/`bottom` is set: `top` when the panel opens downward, `bottom`
/// (distance from the viewport's bottom edge to the panel's bottom edge)
/// when `open_upward` is true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub left: f32,
    pub max_height: f32,
    pub max_width: f32,
    pub open_upward: bool,
    pub alignment: HorizontalAlignment,
}

impl Placement {
    /// Bounding box of a panel of `panel` size rendered with this placement,
    /// in viewport-relative coordinates.
    #[must_use]
    pub fn panel_rect(&self, viewport: &Viewport, panel: Size) -> Rect {
        let width = panel.width.min(self.max_width);
        let height = panel.height.min(self.max_height);
        let y = match (self.top, self.bottom) {
            (Some(top), _) => top,
            (None, Some(bottom)) => viewport.height - bottom - height,
            (None, None) => 0.0,
        };
        Rect::new(self.left, y, width, height)
    }

    /// Bounding box in document coordinates (scroll offsets folded in).
    #[must_use]
    pub fn document_rect(&self, viewport: &Viewport, panel: Size) -> Rect {
        self.panel_rect(viewport, panel)
            .offset(viewport.scroll_x, viewport.scroll_y)
    }

    /// Whether switching from `previous` to `self` flipped the vertical side
    /// or horizontal alignment.
    #[must_use]
    pub fn flipped_from(&self, previous: &Placement) -> bool {
        self.open_upward != previous.open_upward || self.alignment != previous.alignment
    }
}
