#![forbid(unsafe_code)]

//! Page scroll suspension for page-blocking overlays.
//!
//! Modal overlays and the drawer both freeze the underlying page while open.
//! [`ScrollLock`] captures the exact document offset on engage and writes it
//! back on release, so closing never jumps the page (to the top or anywhere
//! else).

/// Host-side access to the document scroll position.
pub trait PageScroll {
    /// Current document scroll offset `(x, y)`.
    fn scroll_offset(&self) -> (f32, f32);

    /// Scroll the document to `(x, y)`.
    fn set_scroll_offset(&mut self, x: f32, y: f32);

    /// Suspend or resume user scrolling of the document.
    fn set_scroll_suspended(&mut self, suspended: bool);
}

/// Captured page scroll state. Engaging twice is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollLock {
    saved: Option<(f32, f32)>,
}

impl ScrollLock {
    /// Create a released lock.
    #[must_use]
    pub const fn new() -> Self {
        Self { saved: None }
    }

    /// Whether the page is currently locked by this guard.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.saved.is_some()
    }

    /// Offset recorded when the lock was engaged.
    #[must_use]
    pub const fn saved_offset(&self) -> Option<(f32, f32)> {
        self.saved
    }

    /// Capture the current offset and suspend scrolling.
    ///
    /// Returns `false` if the lock was already engaged.
    pub fn engage<P: PageScroll + ?Sized>(&mut self, page: &mut P) -> bool {
        if self.saved.is_some() {
            return false;
        }
        let offset = page.scroll_offset();
        self.saved = Some(offset);
        page.set_scroll_suspended(true);
        crate::trace!(x = offset.0, y = offset.1, "page scroll locked");
        true
    }

    /// Resume scrolling and restore the captured offset.
    ///
    /// Returns `false` if the lock was not engaged.
    pub fn release<P: PageScroll + ?Sized>(&mut self, page: &mut P) -> bool {
        let Some((x, y)) = self.saved.take() else {
            return false;
        };
        page.set_scroll_suspended(false);
        page.set_scroll_offset(x, y);
        crate::trace!(x, y, "page scroll restored");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Page {
        offset: (f32, f32),
        suspended: bool,
        writes: usize,
    }

    impl PageScroll for Page {
        fn scroll_offset(&self) -> (f32, f32) {
            self.offset
        }
        fn set_scroll_offset(&mut self, x: f32, y: f32) {
            self.offset = (x, y);
            self.writes += 1;
        }
        fn set_scroll_suspended(&mut self, suspended: bool) {
            self.suspended = suspended;
        }
    }

    #[test]
    fn restores_exact_offset() {
        let mut page = Page {
            offset: (0.0, 1234.5),
            ..Page::default()
        };
        let mut lock = ScrollLock::new();
        assert!(lock.engage(&mut page));
        assert!(page.suspended);
        assert_eq!(lock.saved_offset(), Some((0.0, 1234.5)));

        // Something moved the page while locked (e.g. body position: fixed).
        page.offset = (0.0, 0.0);
        assert!(lock.release(&mut page));
        assert!(!page.suspended);
        assert_eq!(page.offset, (0.0, 1234.5));
        assert!(!lock.is_engaged());
    }

    #[test]
    fn double_engage_keeps_first_offset() {
        let mut page = Page {
            offset: (0.0, 50.0),
            ..Page::default()
        };
        let mut lock = ScrollLock::new();
        assert!(lock.engage(&mut page));
        page.offset = (0.0, 80.0);
        assert!(!lock.engage(&mut page));
        assert_eq!(lock.saved_offset(), Some((0.0, 50.0)));
    }

    #[test]
    fn release_without_engage_is_noop() {
        let mut page = Page::default();
        let mut lock = ScrollLock::new();
        assert!(!lock.release(&mut page));
        assert_eq!(page.writes, 0);
    }
}
