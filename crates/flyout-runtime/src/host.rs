#![forbid(unsafe_code)]

//! The environment boundary.
//!
//! An [`Overlay`](crate::Overlay) never touches the platform directly. Every
//! read (viewport, anchor position, focus) and every side effect (focus moves,
//! scroll suspension, listener registration) goes through a [`Host`], so the
//! whole lifecycle runs deterministically against a scripted host in tests.

use std::fmt;

use bitflags::bitflags;
use flyout_core::geometry::{AnchorRect, Viewport};
use flyout_core::scroll_lock::PageScroll;

/// Host-assigned handle for an element (trigger, focusable control).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Registry-assigned identity of one overlay instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub(crate) u64);

impl OverlayId {
    /// Raw numeric id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// What an overlay is positioned against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorRef {
    /// A live element, re-measured by the host on every solve. If the host
    /// can no longer find it the overlay closes.
    Element(ElementId),
    /// A fixed rectangle (context menus at the pointer, tests).
    Fixed(AnchorRect),
}

impl AnchorRef {
    /// The element to hand focus back to, if this anchor is one.
    #[must_use]
    pub const fn element(&self) -> Option<ElementId> {
        match self {
            Self::Element(id) => Some(*id),
            Self::Fixed(_) => None,
        }
    }
}

impl From<ElementId> for AnchorRef {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl From<AnchorRect> for AnchorRef {
    fn from(rect: AnchorRect) -> Self {
        Self::Fixed(rect)
    }
}

bitflags! {
    /// Environment listeners an open overlay holds.
    ///
    /// Attached in one batch on open and detached in one batch on every
    /// close path. A closed overlay holds none.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Listeners: u8 {
        /// Pointer down anywhere outside trigger and panel.
        const OUTSIDE_POINTER = 1 << 0;
        /// Escape key.
        const ESCAPE_KEY      = 1 << 1;
        /// Viewport resize.
        const RESIZE          = 1 << 2;
        /// Scroll of the window or any ancestor (capture phase).
        const SCROLL_CAPTURE  = 1 << 3;
        /// Tab/Shift-Tab wrapping inside the panel.
        const FOCUS_TRAP      = 1 << 4;
        /// Pointer drag on the drawer handle.
        const DRAWER_GESTURE  = 1 << 5;
        /// Pointer movement tracking for hover menus.
        const HOVER_INTENT    = 1 << 6;
    }
}

impl Listeners {
    /// Number of individual listeners in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits().count_ones()
    }
}

/// The platform an overlay runs inside.
///
/// `PageScroll` is the same trait the drawer uses for its scroll lock.
pub trait Host: PageScroll {
    /// Current viewport metrics. Read fresh on every solve.
    fn viewport(&self) -> Viewport;

    /// Where `element` is right now, or `None` if it is gone.
    fn anchor_rect(&self, element: ElementId) -> Option<AnchorRect>;

    /// The element that currently has focus.
    fn focused(&self) -> Option<ElementId>;

    /// Move focus to `element`.
    fn focus(&mut self, element: ElementId);

    /// Focusable elements inside the panel of `overlay`, in tab order.
    fn focusables(&self, overlay: OverlayId) -> Vec<ElementId>;

    /// Start delivering the events behind `listeners` for `overlay`.
    fn attach(&mut self, overlay: OverlayId, listeners: Listeners) {
        let _ = (overlay, listeners);
    }

    /// Stop delivering the events behind `listeners` for `overlay`.
    fn detach(&mut self, overlay: OverlayId, listeners: Listeners) {
        let _ = (overlay, listeners);
    }
}
