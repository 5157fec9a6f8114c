#![forbid(unsafe_code)]

//! Logging shim.
//!
//! With the `tracing` feature, `debug!`, `trace!` and `warn!` forward to
//! `tracing`, so the drawer and scroll lock can write
//! `flyout_core::trace!(from = 70.0, to = 100.0, "drawer snapped")`.
//! Without it the same call sites compile to nothing and pull in no
//! dependency. The runtime crate depends on `tracing` directly and does
//! not go through here.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Discards its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}
