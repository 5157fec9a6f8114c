#![forbid(unsafe_code)]

//! Core: geometry, input events, page scroll locking, and phase timers
//! shared by the overlay solver, drawer, and lifecycle coordinator.

pub mod env;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod scroll_lock;
pub mod timer;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
