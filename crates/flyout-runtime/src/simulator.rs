#![forbid(unsafe_code)]

//! Deterministic in-memory host for testing.
//!
//! `SimulatedHost` implements [`Host`] without any platform: anchors,
//! focusables and the viewport are plain data, and every side effect an
//! overlay performs is appended to a call log so tests can assert on
//! ordering (for example that an evicted overlay detaches before the new one
//! attaches).
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Instant;
//! use flyout_core::geometry::{AnchorRect, Size, Viewport};
//! use flyout_runtime::simulator::SimulatedHost;
//! use flyout_runtime::{ActiveOverlayRegistry, ElementId, OpenRequest, Overlay, OverlayConfig};
//!
//! let mut host = SimulatedHost::new(Viewport::new(1024.0, 768.0))
//!     .with_anchor(ElementId(1), AnchorRect::new(700.0, 500.0, 40.0, 40.0));
//! let registry = Rc::new(ActiveOverlayRegistry::new());
//! let menu = Overlay::new(&registry, OverlayConfig::default()).unwrap();
//!
//! menu.open(&mut host, OpenRequest::new(ElementId(1), Size::new(280.0, 400.0)), Instant::now())
//!     .unwrap();
//! assert!(menu.placement().unwrap().open_upward);
//! assert_eq!(host.listeners_for(menu.id()), menu.listeners());
//! ```

use std::collections::HashMap;

use flyout_core::geometry::{AnchorRect, Viewport};
use flyout_core::scroll_lock::PageScroll;

use crate::host::{ElementId, Host, Listeners, OverlayId};

/// Record of a side effect performed on the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCall {
    /// Listeners attached for an overlay.
    Attach(OverlayId, Listeners),
    /// Listeners detached for an overlay.
    Detach(OverlayId, Listeners),
    /// Focus moved.
    Focus(ElementId),
    /// Document scrolled programmatically.
    ScrollTo(f32, f32),
    /// Page scrolling suspended or resumed.
    ScrollSuspended(bool),
}

/// Scriptable [`Host`] for tests and examples.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHost {
    viewport: Viewport,
    anchors: HashMap<ElementId, AnchorRect>,
    focused: Option<ElementId>,
    focusables: HashMap<OverlayId, Vec<ElementId>>,
    default_focusables: Vec<ElementId>,
    attached: HashMap<OverlayId, Listeners>,
    scroll_suspended: bool,
    calls: Vec<HostCall>,
}

impl SimulatedHost {
    /// Create a host with the given viewport (its scroll offset included).
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Register an anchor element.
    #[must_use]
    pub fn with_anchor(mut self, element: ElementId, rect: AnchorRect) -> Self {
        self.anchors.insert(element, rect);
        self
    }

    /// Focusables reported for every panel without an explicit list.
    #[must_use]
    pub fn with_panel_focusables(mut self, elements: Vec<ElementId>) -> Self {
        self.default_focusables = elements;
        self
    }

    /// Move or add an anchor.
    pub fn set_anchor(&mut self, element: ElementId, rect: AnchorRect) {
        self.anchors.insert(element, rect);
    }

    /// Remove an anchor from the page.
    pub fn remove_anchor(&mut self, element: ElementId) {
        self.anchors.remove(&element);
    }

    /// Resize the viewport, keeping the scroll offset.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Simulate the user scrolling the document.
    pub fn user_scroll(&mut self, x: f32, y: f32) {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
    }

    /// Set the focusables of one overlay's panel.
    pub fn set_focusables(&mut self, overlay: OverlayId, elements: Vec<ElementId>) {
        self.focusables.insert(overlay, elements);
    }

    /// Simulate the user focusing an element.
    pub fn set_focus(&mut self, element: Option<ElementId>) {
        self.focused = element;
    }

    /// Listeners currently attached for `overlay`.
    #[must_use]
    pub fn listeners_for(&self, overlay: OverlayId) -> Listeners {
        self.attached.get(&overlay).copied().unwrap_or_default()
    }

    /// Listeners attached across all overlays.
    #[must_use]
    pub fn total_listeners(&self) -> u32 {
        self.attached.values().map(|l| l.count()).sum()
    }

    /// Whether page scrolling is suspended.
    #[must_use]
    pub fn is_scroll_suspended(&self) -> bool {
        self.scroll_suspended
    }

    /// Every side effect so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Forget the call log.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl PageScroll for SimulatedHost {
    fn scroll_offset(&self) -> (f32, f32) {
        (self.viewport.scroll_x, self.viewport.scroll_y)
    }

    fn set_scroll_offset(&mut self, x: f32, y: f32) {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
        self.calls.push(HostCall::ScrollTo(x, y));
    }

    fn set_scroll_suspended(&mut self, suspended: bool) {
        self.scroll_suspended = suspended;
        self.calls.push(HostCall::ScrollSuspended(suspended));
    }
}

impl Host for SimulatedHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn anchor_rect(&self, element: ElementId) -> Option<AnchorRect> {
        self.anchors.get(&element).copied()
    }

    fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    fn focus(&mut self, element: ElementId) {
        self.focused = Some(element);
        self.calls.push(HostCall::Focus(element));
    }

    fn focusables(&self, overlay: OverlayId) -> Vec<ElementId> {
        self.focusables
            .get(&overlay)
            .unwrap_or(&self.default_focusables)
            .clone()
    }

    fn attach(&mut self, overlay: OverlayId, listeners: Listeners) {
        *self.attached.entry(overlay).or_default() |= listeners;
        self.calls.push(HostCall::Attach(overlay, listeners));
    }

    fn detach(&mut self, overlay: OverlayId, listeners: Listeners) {
        if let Some(held) = self.attached.get_mut(&overlay) {
            held.remove(listeners);
            if held.is_empty() {
                self.attached.remove(&overlay);
            }
        }
        self.calls.push(HostCall::Detach(overlay, listeners));
    }
}
