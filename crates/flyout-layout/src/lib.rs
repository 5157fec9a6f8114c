#![forbid(unsafe_code)]

//! Overlay position solving.
//!
//! Given the trigger's [`AnchorRect`], the current [`Viewport`], and a
//! [`Size`] estimate for the floating panel, [`PositionSolver::solve`]
//! produces a [`Placement`]: which vertical side to open on, where the
//! leading edge goes, and how tall the panel may grow.
//!
//! # Two-phase placement
//!
//! The first solve runs before the panel has been laid out, using the
//! caller's estimate. Once the panel is measured, the caller makes a second,
//! explicit call to [`PositionSolver::refine`] with the real size. The
//! returned [`Refinement`] says whether the correction moved anything, so
//! the flip is observable (and testable) rather than an internal retry.
//!
//! ```
//! use flyout_layout::{PositionSolver, SolveInput};
//! use flyout_core::geometry::{AnchorRect, Size, Viewport};
//!
//! let solver = PositionSolver::default();
//! let input = SolveInput::new(
//!     AnchorRect::new(700.0, 500.0, 40.0, 40.0),
//!     Viewport::new(1024.0, 768.0),
//!     Size::new(280.0, 400.0),
//! );
//! let placement = solver.solve(&input);
//! assert!(placement.open_upward);
//! ```

mod placement;
mod solver;

pub use flyout_core::geometry::{AnchorRect, Rect, Size, Space, Viewport};
pub use placement::{HorizontalAlignment, Placement, PreferredSide};
pub use solver::{PositionSolver, Refinement, SolveInput, SolverConfig, solve};
