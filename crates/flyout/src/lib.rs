#![forbid(unsafe_code)]

//! Flyout public facade crate.
//!
//! Re-exports the types an embedder needs from the internal crates and
//! offers a prelude for day-to-day usage.
//!
//! ```
//! use flyout::prelude::*;
//!
//! let solver = PositionSolver::default();
//! let input = solver.input(
//!     AnchorRect::new(700.0, 500.0, 40.0, 40.0),
//!     Viewport::new(1024.0, 768.0),
//!     Size::new(280.0, 400.0),
//! );
//! assert!(solver.solve(&input).open_upward);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use flyout_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerDevice, PointerEvent, PointerKind,
    ScrollEvent, ScrollSource,
};
pub use flyout_core::geometry::{AnchorRect, Rect, Sides, Size, Space, Viewport};
pub use flyout_core::scroll_lock::{PageScroll, ScrollLock};

// --- Layout re-exports -----------------------------------------------------

pub use flyout_layout::{
    HorizontalAlignment, Placement, PositionSolver, PreferredSide, Refinement, SolveInput,
    SolverConfig, solve,
};

// --- Widget re-exports -----------------------------------------------------

pub use flyout_widgets::{
    DrawerConfig, DrawerConfigError, DrawerController, DrawerEvent, DrawerPhase, DrawerState,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use flyout_runtime::{
    ActiveOverlayRegistry, AnchorRef, CloseReason, ElementId, Host, Listeners, OpenRequest,
    Overlay, OverlayConfig, OverlayError, OverlayId, OverlayNotice, OverlayState,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for flyout embedders.
#[derive(Debug)]
pub enum Error {
    /// Drawer configuration failed validation.
    Config(DrawerConfigError),
    /// An overlay rejected an open or close request.
    #[cfg(feature = "runtime")]
    Overlay(OverlayError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Overlay(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Overlay(err) => Some(err),
        }
    }
}

impl From<DrawerConfigError> for Error {
    fn from(err: DrawerConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "runtime")]
impl From<OverlayError> for Error {
    fn from(err: OverlayError) -> Self {
        Self::Overlay(err)
    }
}

/// Standard result type for flyout APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnchorRect, DrawerConfig, DrawerController, Error, Event, KeyCode, KeyEvent, Placement,
        PointerEvent, PointerKind, PositionSolver, PreferredSide, Result, Size, Viewport,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{
        ActiveOverlayRegistry, CloseReason, ElementId, Host, OpenRequest, Overlay, OverlayConfig,
        OverlayNotice,
    };

    pub use crate::{core, layout, widgets};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use flyout_core as core;
pub use flyout_layout as layout;
#[cfg(feature = "runtime")]
pub use flyout_runtime as runtime;
pub use flyout_widgets as widgets;
