#![forbid(unsafe_code)]

//! Overlay lifecycle runtime.
//!
//! - [`Overlay`]: open/close state machine for one panel, with a single
//!   [`Overlay::dispatch`] entry point for every environment event.
//! - [`ActiveOverlayRegistry`]: the injected "at most one open" slot.
//! - [`Host`]: the environment boundary (viewport, anchors, focus, page
//!   scroll, listener registration).
//! - [`simulator::SimulatedHost`]: a deterministic host for tests.

pub mod config;
pub mod focus;
pub mod host;
pub mod overlay;
pub mod registry;
pub mod simulator;

pub use config::OverlayConfig;
pub use focus::FocusScope;
pub use host::{AnchorRef, ElementId, Host, Listeners, OverlayId};
pub use overlay::{CloseReason, OpenRequest, Overlay, OverlayError, OverlayNotice, OverlayState};
pub use registry::ActiveOverlayRegistry;
