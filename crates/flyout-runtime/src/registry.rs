#![forbid(unsafe_code)]

//! The single "active overlay" slot.
//!
//! At most one overlay is visible at a time. The registry is an explicit
//! object injected into every [`Overlay`](crate::Overlay) rather than a
//! global, so each test (or each independent UI root) gets its own.
//!
//! The slot holds a weak reference: an overlay dropped without closing
//! never keeps the slot occupied.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::host::OverlayId;
use crate::overlay::Shared;

#[derive(Default)]
struct Slot {
    next_id: u64,
    active: Option<(OverlayId, Weak<Shared>)>,
}

/// Mutual-exclusion registry shared by a group of overlays.
#[derive(Default)]
pub struct ActiveOverlayRegistry {
    slot: RefCell<Slot>,
}

impl ActiveOverlayRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The overlay currently holding the slot, if it is still alive.
    #[must_use]
    pub fn active(&self) -> Option<OverlayId> {
        let slot = self.slot.borrow();
        slot.active
            .as_ref()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .map(|(id, _)| *id)
    }

    /// Whether `id` holds the slot.
    #[must_use]
    pub fn is_active(&self, id: OverlayId) -> bool {
        self.active() == Some(id)
    }

    /// Whether no live overlay holds the slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active().is_none()
    }

    pub(crate) fn allocate(&self) -> OverlayId {
        let mut slot = self.slot.borrow_mut();
        slot.next_id += 1;
        OverlayId(slot.next_id)
    }

    /// Empty the slot if someone other than `id` holds it, handing back the
    /// occupant so the caller can close it.
    pub(crate) fn displace(&self, id: OverlayId) -> Option<Rc<Shared>> {
        let mut slot = self.slot.borrow_mut();
        if !matches!(&slot.active, Some((holder, _)) if *holder != id) {
            return None;
        }
        slot.active.take().and_then(|(_, weak)| weak.upgrade())
    }

    pub(crate) fn claim(&self, id: OverlayId, overlay: Weak<Shared>) {
        self.slot.borrow_mut().active = Some((id, overlay));
    }

    /// Clear the slot if `id` holds it.
    pub(crate) fn release(&self, id: OverlayId) -> bool {
        let mut slot = self.slot.borrow_mut();
        if !matches!(&slot.active, Some((holder, _)) if *holder == id) {
            return false;
        }
        slot.active = None;
        true
    }
}

impl fmt::Debug for ActiveOverlayRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveOverlayRegistry")
            .field("active", &self.active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let registry = ActiveOverlayRegistry::new();
        let a = registry.allocate();
        let b = registry.allocate();
        assert!(b > a);
    }

    #[test]
    fn dead_occupant_reads_as_empty() {
        let registry = ActiveOverlayRegistry::new();
        let id = registry.allocate();
        registry.claim(id, Weak::new());
        assert!(registry.is_empty());
        assert!(registry.displace(registry.allocate()).is_none());
    }

    #[test]
    fn release_only_by_holder() {
        let registry = ActiveOverlayRegistry::new();
        let a = registry.allocate();
        let b = registry.allocate();
        registry.claim(a, Weak::new());
        assert!(!registry.release(b));
        assert!(registry.release(a));
        assert!(!registry.release(a));
    }

    #[test]
    fn displace_skips_self() {
        let registry = ActiveOverlayRegistry::new();
        let a = registry.allocate();
        registry.claim(a, Weak::new());
        assert!(registry.displace(a).is_none());
        assert!(registry.release(a));
    }
}
