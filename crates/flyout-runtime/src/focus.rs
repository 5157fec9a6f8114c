#![forbid(unsafe_code)]

//! Focus handling for one open session.
//!
//! On open the scope remembers who had focus and moves it into the panel.
//! On close it hands focus back. When trapping, Tab and Shift-Tab cycle
//! through the panel's focusables and wrap at either end.

use crate::host::{ElementId, Host, OverlayId};

/// Focus bookkeeping for an open overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusScope {
    previous: Option<ElementId>,
    trap: bool,
}

impl FocusScope {
    /// Record the current focus and move it to the panel's first focusable.
    pub fn enter(host: &mut dyn Host, overlay: OverlayId, trap: bool) -> Self {
        let previous = host.focused();
        if let Some(&first) = host.focusables(overlay).first() {
            host.focus(first);
        }
        tracing::trace!(overlay_id = overlay.get(), ?previous, trap, "focus scope entered");
        Self { previous, trap }
    }

    /// The element that had focus before the overlay opened.
    #[must_use]
    pub const fn previous(&self) -> Option<ElementId> {
        self.previous
    }

    /// Whether Tab wraps inside the panel.
    #[must_use]
    pub const fn traps(&self) -> bool {
        self.trap
    }

    /// Move focus one step. Returns `false` when the key should fall
    /// through to the host (not trapping, or nothing to focus).
    pub fn cycle(&self, host: &mut dyn Host, overlay: OverlayId, forward: bool) -> bool {
        if !self.trap {
            return false;
        }
        let order = host.focusables(overlay);
        if order.is_empty() {
            return false;
        }
        let last = order.len() - 1;
        let next = match host.focused().and_then(|f| order.iter().position(|&e| e == f)) {
            Some(i) if forward => if i == last { 0 } else { i + 1 },
            Some(i) => if i == 0 { last } else { i - 1 },
            // Focus escaped the panel: pull it back to the near end.
            None if forward => 0,
            None => last,
        };
        host.focus(order[next]);
        true
    }

    /// Hand focus back to where it was before opening.
    pub fn restore(self, host: &mut dyn Host) {
        if let Some(previous) = self.previous {
            host.focus(previous);
        }
    }
}
