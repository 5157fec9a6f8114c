//! Property-based invariant tests for the geometry helpers.
//!
//! 1. `clamp` output always lies in `[min, max]` when `min <= max`.
//! 2. `clamp` is idempotent.
//! 3. `available_space` edges sum back to the viewport size.
//! 4. `fits` is monotone: shrinking the estimate never breaks a fit.
//! 5. Intersection fits within both inputs.
//! 6. Union contains both inputs.

use flyout_core::geometry::{AnchorRect, Rect, Size, Viewport, available_space, clamp, fits};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0f32..2000.0, 0.0f32..2000.0, 0.0f32..800.0, 0.0f32..800.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

/// `outer.encloses(inner)` with a little slack for f32 edge rounding.
fn encloses_approx(outer: &Rect, inner: &Rect) -> bool {
    const EPS: f32 = 1e-3;
    inner.x >= outer.x - EPS
        && inner.y >= outer.y - EPS
        && inner.right() <= outer.right() + EPS
        && inner.bottom() <= outer.bottom() + EPS
}

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (200.0f32..2560.0, 200.0f32..1600.0).prop_map(|(w, h)| Viewport::new(w, h))
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. clamp
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_stays_in_bounds(v in -1e6f32..1e6, a in -1e4f32..1e4, span in 0.0f32..1e4) {
        let (lo, hi) = (a, a + span);
        let c = clamp(v, lo, hi);
        prop_assert!(c >= lo && c <= hi, "clamp({v}, {lo}, {hi}) = {c}");
    }

    #[test]
    fn clamp_idempotent(v in -1e6f32..1e6, a in -1e4f32..1e4, span in 0.0f32..1e4) {
        let once = clamp(v, a, a + span);
        prop_assert_eq!(clamp(once, a, a + span).to_bits(), once.to_bits());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. available_space accounts for every unit of the viewport
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn space_partitions_viewport(vp in viewport_strategy(), fx in 0.0f32..1.0, fy in 0.0f32..1.0,
                                 w in 0.0f32..100.0, h in 0.0f32..100.0) {
        let anchor = AnchorRect::new(fy * vp.height, fx * vp.width, w, h);
        let space = available_space(&anchor, &vp);
        let vertical = space.above + anchor.height + space.below;
        let horizontal = space.left + anchor.width + space.right;
        prop_assert!((vertical - vp.height).abs() < 0.01);
        prop_assert!((horizontal - vp.width).abs() < 0.01);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. fits is monotone
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fits_monotone(w in 0.0f32..1000.0, h in 0.0f32..1000.0, sw in 0.0f32..1000.0,
                     sh in 0.0f32..1000.0, shrink in 0.0f32..1.0) {
        let space = Size::new(sw, sh);
        if fits(Size::new(w, h), space) {
            prop_assert!(fits(Size::new(w * shrink, h * shrink), space));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-6. intersection / union
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_fits_within_both(a in rect_strategy(), b in rect_strategy()) {
        if let Some(inter) = a.intersection_opt(&b) {
            prop_assert!(encloses_approx(&a, &inter));
            prop_assert!(encloses_approx(&b, &inter));
        }
    }

    #[test]
    fn union_contains_both(a in rect_strategy(), b in rect_strategy()) {
        let u = a.union(&b);
        prop_assert!(encloses_approx(&u, &a));
        prop_assert!(encloses_approx(&u, &b));
    }
}
