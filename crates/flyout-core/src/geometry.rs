#![forbid(unsafe_code)]

//! Geometric primitives and fit helpers for overlay placement.
//!
//! All coordinates are viewport-relative floating point units (CSS pixels on
//! the web, logical points elsewhere), origin at the top-left of the visible
//! viewport. Scroll offsets live on [`Viewport`] and are only folded in by
//! callers that need document coordinates.
//!
//! # Preconditions
//!
//! Sizes are never negative. Passing a negative width or height is a caller
//! contract violation; debug builds assert, release builds let the value
//! through and leave recovery to the caller (the lifecycle coordinator closes
//! the overlay).

/// An axis-aligned rectangle used for hit testing and panel bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f32,
    /// Top edge (inclusive).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Left edge (inclusive). Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge (inclusive). Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point lies inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle (edges may touch).
    pub fn encloses(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink the rectangle by the given margins. Never goes negative.
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x + margin.left,
            y: self.y + margin.top,
            width: (self.width - margin.horizontal_sum()).max(0.0),
            height: (self.height - margin.vertical_sum()).max(0.0),
        }
    }

    /// Smallest rectangle containing both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Compute the overlap with another rectangle, `None` if they don't overlap.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Translate the rectangle by `(dx, dy)`.
    #[must_use]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Per-edge insets (padding, safe margins).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Sides {
    /// Equal insets on every edge.
    pub const fn all(val: f32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }
}

impl From<f32> for Sides {
    fn from(val: f32) -> Self {
        Self::all(val)
    }
}

/// A width/height pair: a caller estimate before first paint, or a measured
/// size afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero-sized.
    pub const ZERO: Size = Size::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Finite and non-negative on both axes.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// The trigger element's bounding box, sampled when the overlay opens and on
/// every re-solve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorRect {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl AnchorRect {
    /// Build from top-left corner and size; right/bottom are derived.
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "anchor size must be non-negative (got {width}x{height})"
        );
        Self {
            top,
            left,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }

    /// Convert a hit-test rectangle into an anchor.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.y, rect.x, rect.width, rect.height)
    }

    /// The anchor as a [`Rect`].
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Whether the anchor is fully or partially inside the viewport.
    pub fn is_visible_in(&self, viewport: &Viewport) -> bool {
        self.right > 0.0
            && self.bottom > 0.0
            && self.left < viewport.width
            && self.top < viewport.height
    }

    /// Horizontal center line.
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// Visible viewport metrics. Read fresh for every solve, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
}

impl Viewport {
    /// An unscrolled viewport of the given size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Set the document scroll offsets.
    #[must_use]
    pub const fn with_scroll(mut self, scroll_x: f32, scroll_y: f32) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// The visible area in viewport-relative coordinates.
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// The visible area shrunk by `margin` on every edge.
    pub fn safe_area(&self, margin: f32) -> Rect {
        self.bounds().inner(Sides::all(margin))
    }
}

/// Distances from each anchor edge to the matching viewport edge.
///
/// Values go negative when the anchor pokes past that viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Space {
    pub above: f32,
    pub below: f32,
    pub left: f32,
    pub right: f32,
}

/// Measure the room around `anchor` inside `viewport`.
///
/// Viewport-relative: scroll offsets are ignored here.
pub fn available_space(anchor: &AnchorRect, viewport: &Viewport) -> Space {
    debug_assert!(
        anchor.width >= 0.0 && anchor.height >= 0.0,
        "anchor size must be non-negative"
    );
    debug_assert!(
        viewport.width >= 0.0 && viewport.height >= 0.0,
        "viewport size must be non-negative"
    );
    Space {
        above: anchor.top,
        below: viewport.height - anchor.bottom,
        left: anchor.left,
        right: viewport.width - anchor.right,
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics: when `min > max` the floor wins
/// and `min` is returned. A NaN `value` also resolves to `min`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if max < min {
        return min;
    }
    value.max(min).min(max)
}

/// Whether `estimate` fits inside `space` on both axes.
#[inline]
pub fn fits(estimate: Size, space: Size) -> bool {
    debug_assert!(estimate.is_valid(), "size estimate must be non-negative");
    estimate.width <= space.width && estimate.height <= space.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(2.0, 3.0));
        assert!(rect.contains(5.5, 7.9));
        assert!(!rect.contains(6.0, 3.0));
        assert!(!rect.contains(2.0, 8.0));
    }

    #[test]
    fn rect_contains_empty_rect() {
        let r = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert!(!r.contains(5.0, 5.0));
        assert!(r.is_empty());
    }

    #[test]
    fn rect_intersection_no_overlap() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(3.0, 3.0, 2.0, 2.0);
        assert_eq!(a.intersection_opt(&b), None);
    }

    #[test]
    fn rect_intersection_adjacent_is_none() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(5.0, 0.0, 5.0, 5.0);
        assert_eq!(a.intersection_opt(&b), None);
    }

    #[test]
    fn rect_union_disjoint() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(10.0, 10.0, 3.0, 3.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 13.0, 13.0));
    }

    #[test]
    fn rect_inner_large_margin_clamps_to_zero() {
        let inner = Rect::new(0.0, 0.0, 10.0, 10.0).inner(Sides::all(20.0));
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.height, 0.0);
    }

    #[test]
    fn rect_encloses() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.encloses(&Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(outer.encloses(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(!outer.encloses(&Rect::new(96.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn anchor_derives_right_and_bottom() {
        let a = AnchorRect::new(700.0, 500.0, 40.0, 40.0);
        assert_eq!(a.right, 540.0);
        assert_eq!(a.bottom, 740.0);
        assert_eq!(a.to_rect(), Rect::new(500.0, 700.0, 40.0, 40.0));
        assert_eq!(AnchorRect::from_rect(a.to_rect()), a);
    }

    #[test]
    fn anchor_visibility() {
        let vp = Viewport::new(1024.0, 768.0);
        assert!(AnchorRect::new(10.0, 10.0, 20.0, 20.0).is_visible_in(&vp));
        // Partially above the viewport still counts.
        assert!(AnchorRect::new(-10.0, 10.0, 20.0, 20.0).is_visible_in(&vp));
        assert!(!AnchorRect::new(-30.0, 10.0, 20.0, 20.0).is_visible_in(&vp));
        assert!(!AnchorRect::new(10.0, 1024.0, 20.0, 20.0).is_visible_in(&vp));
    }

    #[test]
    fn available_space_measures_each_edge() {
        let anchor = AnchorRect::new(700.0, 500.0, 40.0, 40.0);
        let vp = Viewport::new(1024.0, 768.0);
        let space = available_space(&anchor, &vp);
        assert_eq!(space.above, 700.0);
        assert_eq!(space.below, 28.0);
        assert_eq!(space.left, 500.0);
        assert_eq!(space.right, 484.0);
    }

    #[test]
    fn available_space_ignores_scroll() {
        let anchor = AnchorRect::new(100.0, 100.0, 10.0, 10.0);
        let plain = available_space(&anchor, &Viewport::new(800.0, 600.0));
        let scrolled = available_space(
            &anchor,
            &Viewport::new(800.0, 600.0).with_scroll(0.0, 2500.0),
        );
        assert_eq!(plain, scrolled);
    }

    #[test]
    fn clamp_basic() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn clamp_inverted_bounds_prefers_floor() {
        assert_eq!(clamp(50.0, 120.0, 80.0), 120.0);
    }

    #[test]
    fn clamp_nan_resolves_to_floor() {
        assert_eq!(clamp(f32::NAN, 30.0, 100.0), 30.0);
    }

    #[test]
    fn fits_checks_both_axes() {
        let space = Size::new(300.0, 200.0);
        assert!(fits(Size::new(300.0, 200.0), space));
        assert!(!fits(Size::new(301.0, 10.0), space));
        assert!(!fits(Size::new(10.0, 201.0), space));
    }

    #[test]
    fn size_validity() {
        assert!(Size::new(0.0, 0.0).is_valid());
        assert!(!Size::new(-1.0, 0.0).is_valid());
        assert!(!Size::new(f32::INFINITY, 0.0).is_valid());
    }

    #[test]
    fn safe_area_shrinks_viewport() {
        let vp = Viewport::new(1024.0, 768.0);
        assert_eq!(vp.safe_area(8.0), Rect::new(8.0, 8.0, 1008.0, 752.0));
    }
}
