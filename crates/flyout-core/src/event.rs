#![forbid(unsafe_code)]

//! Canonical input and environment events.
//!
//! The host adapts whatever its platform delivers (DOM events, winit, a test
//! script) into these types and feeds them to overlays through a single
//! `dispatch` entry point.
//!
//! # Design Notes
//!
//! - Mouse, touch, and pen input are unified into [`PointerEvent`]; the
//!   drawer gesture only ever sees one `down/move/up` stream.
//! - Scroll events carry their [`ScrollSource`] so hosts listening in capture
//!   mode can report nested scroll containers, not just the window.
//! - `KeyEventKind` defaults to `Press`.

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer (mouse, touch, or pen) event.
    Pointer(PointerEvent),

    /// The viewport was resized.
    Resize {
        /// New viewport width.
        width: f32,
        /// New viewport height.
        height: f32,
    },

    /// The window or a scrollable ancestor of the trigger scrolled.
    Scroll(ScrollEvent),

    /// The first layout pass measured the panel.
    Measured {
        /// Measured panel width.
        width: f32,
        /// Measured panel height.
        height: f32,
    },

    /// A timer tick from the host's event loop.
    ///
    /// Drives delayed phase transitions (drawer open/close, hover intent).
    Tick,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Press or auto-repeat (not a release).
    #[must_use]
    pub const fn is_press(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }

    /// Escape pressed.
    #[must_use]
    pub const fn is_cancel(&self) -> bool {
        self.is_press() && matches!(self.code, KeyCode::Escape)
    }

    /// Focus-cycling direction, if this is a Tab press.
    ///
    /// `Some(true)` is forward, `Some(false)` is backward (Shift+Tab or BackTab).
    #[must_use]
    pub const fn tab_direction(&self) -> Option<bool> {
        if !self.is_press() {
            return None;
        }
        match self.code {
            KeyCode::Tab => Some(!self.shift()),
            KeyCode::BackTab => Some(false),
            _ => None,
        }
    }
}

/// Key codes that overlays care about. Everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Tab key.
    Tab,
    /// Shift+Tab as reported by some hosts.
    BackTab,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Any key the overlay engine does not interpret.
    Other,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,
    /// Key is being held (repeat event).
    Repeat,
    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Which input device produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerDevice {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// The phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Button pressed or finger placed.
    Down,
    /// Pointer moved (with or without a button held).
    Move,
    /// Button released or finger lifted.
    Up,
    /// The platform aborted the gesture (touchcancel, lost capture).
    Cancel,
}

/// A pointer event in viewport-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub device: PointerDevice,
}

impl PointerEvent {
    /// Create a mouse pointer event.
    #[must_use]
    pub const fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            device: PointerDevice::Mouse,
        }
    }

    /// Set the originating device.
    #[must_use]
    pub const fn with_device(mut self, device: PointerDevice) -> Self {
        self.device = device;
        self
    }

    /// Shorthand for a touch event.
    #[must_use]
    pub const fn touch(kind: PointerKind, x: f32, y: f32) -> Self {
        Self::new(kind, x, y).with_device(PointerDevice::Touch)
    }

    /// Get the position as a tuple.
    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Where a scroll event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollSource {
    /// The top-level document scrolled.
    #[default]
    Window,
    /// A nested scroll container scrolled (seen via a capture-phase listener).
    Ancestor,
}

/// A scroll notification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollEvent {
    pub source: ScrollSource,
    /// Document scroll offset after the scroll, for window scrolls.
    pub scroll_x: f32,
    pub scroll_y: f32,
}

impl ScrollEvent {
    /// Window-level scroll to the given offset.
    #[must_use]
    pub const fn window(scroll_x: f32, scroll_y: f32) -> Self {
        Self {
            source: ScrollSource::Window,
            scroll_x,
            scroll_y,
        }
    }

    /// A nested container scrolled.
    #[must_use]
    pub const fn ancestor() -> Self {
        Self {
            source: ScrollSource::Ancestor,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_press_is_cancel() {
        assert!(KeyEvent::new(KeyCode::Escape).is_cancel());
        assert!(
            !KeyEvent::new(KeyCode::Escape)
                .with_kind(KeyEventKind::Release)
                .is_cancel()
        );
        assert!(!KeyEvent::new(KeyCode::Enter).is_cancel());
    }

    #[test]
    fn tab_direction() {
        assert_eq!(KeyEvent::new(KeyCode::Tab).tab_direction(), Some(true));
        assert_eq!(
            KeyEvent::new(KeyCode::Tab)
                .with_modifiers(Modifiers::SHIFT)
                .tab_direction(),
            Some(false)
        );
        assert_eq!(KeyEvent::new(KeyCode::BackTab).tab_direction(), Some(false));
        assert_eq!(KeyEvent::new(KeyCode::Char('a')).tab_direction(), None);
        assert_eq!(
            KeyEvent::new(KeyCode::Tab)
                .with_kind(KeyEventKind::Release)
                .tab_direction(),
            None
        );
    }

    #[test]
    fn repeat_counts_as_press() {
        let ev = KeyEvent::new(KeyCode::Escape).with_kind(KeyEventKind::Repeat);
        assert!(ev.is_press());
        assert!(ev.is_cancel());
    }

    #[test]
    fn pointer_constructors() {
        let m = PointerEvent::new(PointerKind::Down, 10.0, 20.0);
        assert_eq!(m.device, PointerDevice::Mouse);
        assert_eq!(m.position(), (10.0, 20.0));

        let t = PointerEvent::touch(PointerKind::Move, 1.0, 2.0);
        assert_eq!(t.device, PointerDevice::Touch);
        assert_eq!(t.kind, PointerKind::Move);
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        let ev = KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT | Modifiers::CTRL);
        assert!(ev.shift());
    }

    #[test]
    fn scroll_event_sources() {
        assert_eq!(ScrollEvent::window(0.0, 40.0).source, ScrollSource::Window);
        assert_eq!(ScrollEvent::ancestor().source, ScrollSource::Ancestor);
    }
}
