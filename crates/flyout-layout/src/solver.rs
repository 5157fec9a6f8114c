#![forbid(unsafe_code)]

//! The anchor-relative position solver.
//!
//! # Algorithm
//!
//! 1. Measure [`available_space`] around the anchor. The usable room on each
//!    vertical side is that space minus the anchor gap and the safe margin.
//! 2. Vertical: open below if the estimate fits there. Otherwise open above
//!    when there is strictly more room above, else stay below and let the
//!    height budget shrink.
//! 3. Horizontal: try the preferred edge alignment, then the opposite one,
//!    then center in the viewport inside the safe margin.
//! 4. `max_height = max(min(estimate.height, room), floor)` where the floor
//!    is `min_height` capped at what the viewport can hold. When the floor
//!    exceeds the room the panel slides inward instead of leaving the screen.
//!
//! # Invariants
//!
//! 1. Pure: identical inputs give bit-identical output.
//! 2. For anchors inside the viewport and estimates no larger than it, the
//!    panel box lies within the viewport shrunk by the safe margin.
//! 3. `max_height` is never zero or negative while the viewport can hold
//!    the floor.

use flyout_core::env::env_f32;
use flyout_core::geometry::{AnchorRect, Size, Viewport, available_space, clamp, fits};

use crate::placement::{HorizontalAlignment, Placement, PreferredSide};

const ENV_SAFE_MARGIN: &str = "FLYOUT_SAFE_MARGIN";
const ENV_MIN_HEIGHT: &str = "FLYOUT_MIN_HEIGHT";
const ENV_ANCHOR_GAP: &str = "FLYOUT_ANCHOR_GAP";

/// Tunables shared by every solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Distance kept from every viewport edge (default: 8).
    pub safe_margin: f32,
    /// Smallest usable panel height (default: 120).
    pub min_height: f32,
    /// Gap between the trigger edge and the panel edge (default: 4).
    pub anchor_gap: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            safe_margin: 8.0,
            min_height: 120.0,
            anchor_gap: 4.0,
        }
    }
}

impl SolverConfig {
    /// Set the safe margin.
    #[must_use]
    pub fn with_safe_margin(mut self, margin: f32) -> Self {
        self.safe_margin = margin;
        self
    }

    /// Set the minimum usable height.
    #[must_use]
    pub fn with_min_height(mut self, height: f32) -> Self {
        self.min_height = height;
        self
    }

    /// Set the trigger-to-panel gap.
    #[must_use]
    pub fn with_anchor_gap(mut self, gap: f32) -> Self {
        self.anchor_gap = gap;
        self
    }

    /// Defaults overridden by `FLYOUT_SAFE_MARGIN`, `FLYOUT_MIN_HEIGHT`,
    /// and `FLYOUT_ANCHOR_GAP`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = env_f32(&get_env, ENV_SAFE_MARGIN) {
            config.safe_margin = v;
        }
        if let Some(v) = env_f32(&get_env, ENV_MIN_HEIGHT) {
            config.min_height = v;
        }
        if let Some(v) = env_f32(&get_env, ENV_ANCHOR_GAP) {
            config.anchor_gap = v;
        }
        config
    }
}

/// Everything one solve reads. Sampled fresh for every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveInput {
    pub anchor: AnchorRect,
    pub viewport: Viewport,
    pub estimate: Size,
    pub safe_margin: f32,
    pub preferred_side: PreferredSide,
}

impl SolveInput {
    /// Input with the default safe margin and [`PreferredSide::Start`].
    #[must_use]
    pub fn new(anchor: AnchorRect, viewport: Viewport, estimate: Size) -> Self {
        Self {
            anchor,
            viewport,
            estimate,
            safe_margin: SolverConfig::default().safe_margin,
            preferred_side: PreferredSide::Start,
        }
    }

    /// Set the safe margin.
    #[must_use]
    pub fn with_safe_margin(mut self, margin: f32) -> Self {
        self.safe_margin = margin;
        self
    }

    /// Set the preferred horizontal alignment.
    #[must_use]
    pub fn with_preferred_side(mut self, side: PreferredSide) -> Self {
        self.preferred_side = side;
        self
    }

    /// Replace the size estimate (e.g. with a measured size).
    #[must_use]
    pub fn with_estimate(mut self, estimate: Size) -> Self {
        self.estimate = estimate;
        self
    }
}

/// Result of the measure-and-correct pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement {
    /// Placement computed from the measured size.
    pub placement: Placement,
    /// Whether it differs from the estimate-based placement.
    pub corrected: bool,
}

/// Stateless solver carrying its [`SolverConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionSolver {
    config: SolverConfig,
}

impl PositionSolver {
    /// Create a solver with the given configuration.
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver configuration.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Build a [`SolveInput`] using this solver's safe margin.
    #[must_use]
    pub fn input(&self, anchor: AnchorRect, viewport: Viewport, estimate: Size) -> SolveInput {
        SolveInput::new(anchor, viewport, estimate).with_safe_margin(self.config.safe_margin)
    }

    /// First pass: place the panel from an estimate.
    #[must_use]
    pub fn solve(&self, input: &SolveInput) -> Placement {
        debug_assert!(
            input.estimate.is_valid(),
            "size estimate must be finite and non-negative: {:?}",
            input.estimate
        );
        let viewport = input.viewport;
        let anchor = input.anchor;
        let estimate = sanitize(input.estimate);
        let margin = non_negative(input.safe_margin);
        let gap = non_negative(self.config.anchor_gap);

        let space = available_space(&anchor, &viewport);
        let room_below = non_negative(space.below - gap - margin);
        let room_above = non_negative(space.above - gap - margin);

        let open_upward = if fits_vertically(estimate, room_below) {
            false
        } else {
            room_above > room_below
        };
        let room = if open_upward { room_above } else { room_below };

        // The floor keeps the panel usable but must itself fit the viewport.
        let usable_height = non_negative(viewport.height - 2.0 * margin);
        let floor = non_negative(self.config.min_height).min(usable_height);
        let max_height = estimate.height.min(room).max(floor);
        let panel_height = estimate.height.min(max_height);
        let vertical_limit = viewport.height - margin - panel_height;

        let (top, bottom) = if open_upward {
            let bottom = clamp(viewport.height - anchor.top + gap, margin, vertical_limit);
            (None, Some(bottom))
        } else {
            let top = clamp(anchor.bottom + gap, margin, vertical_limit);
            (Some(top), None)
        };

        let max_width = non_negative(viewport.width - 2.0 * margin);
        let width = estimate.width.min(max_width);
        let (left, alignment) =
            horizontal(&anchor, &viewport, width, margin, input.preferred_side);

        Placement {
            top,
            bottom,
            left,
            max_height,
            max_width,
            open_upward,
            alignment,
        }
    }

    /// Second pass: re-solve with the measured panel size.
    ///
    /// `previous` is the placement produced from the estimate.
    #[must_use]
    pub fn refine(&self, input: &SolveInput, previous: &Placement, measured: Size) -> Refinement {
        let placement = self.solve(&input.with_estimate(measured));
        Refinement {
            placement,
            corrected: placement != *previous,
        }
    }
}

/// Solve with the default gap and height floor.
///
/// The safe margin and preferred side come from `input`.
#[must_use]
pub fn solve(input: &SolveInput) -> Placement {
    PositionSolver::default().solve(input)
}

fn horizontal(
    anchor: &AnchorRect,
    viewport: &Viewport,
    width: f32,
    margin: f32,
    preferred: PreferredSide,
) -> (f32, HorizontalAlignment) {
    let lo = margin;
    let hi = viewport.width - margin - width;
    let in_bounds = |left: f32| left >= lo && left <= hi;

    let start = (anchor.left, HorizontalAlignment::Start);
    let end = (anchor.right - width, HorizontalAlignment::End);
    let centered = (
        anchor.center_x() - width / 2.0,
        HorizontalAlignment::AnchorCenter,
    );

    let candidates = match preferred {
        PreferredSide::Start => [start, end, end],
        PreferredSide::End => [end, start, start],
        PreferredSide::Center => [centered, start, end],
    };

    candidates
        .into_iter()
        .find(|(left, _)| in_bounds(*left))
        .unwrap_or_else(|| {
            (
                clamp((viewport.width - width) / 2.0, lo, hi),
                HorizontalAlignment::ViewportCenter,
            )
        })
}

#[inline]
fn fits_vertically(estimate: Size, room: f32) -> bool {
    fits(Size::new(0.0, estimate.height), Size::new(0.0, room))
}

#[inline]
fn non_negative(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Release-build recovery for malformed estimates: treat as empty.
fn sanitize(size: Size) -> Size {
    Size::new(non_negative(size.width), non_negative(size.height))
}
