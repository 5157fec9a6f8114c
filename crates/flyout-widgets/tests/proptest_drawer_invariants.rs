//! Property-based invariant tests for the drawer gesture.
//!
//! 1. While dragging, height stays in `[drag_floor, max_height]`.
//! 2. A release either dismisses (height was below the close threshold) or
//!    leaves the height in `[min_height, max_height]`.
//! 3. Moves without a drag in progress never change the height.
//! 4. Cancelling a drag restores the starting height exactly.
//! 5. The scroll lock is released whenever the drawer reaches `Closed`.

use std::time::{Duration, Instant};

use flyout_core::event::{PointerEvent, PointerKind};
use flyout_core::scroll_lock::PageScroll;
use flyout_widgets::{DrawerConfig, DrawerController, DrawerEvent, DrawerPhase};
use proptest::prelude::*;

#[derive(Default)]
struct Page {
    offset: (f32, f32),
    suspended: bool,
}

impl PageScroll for Page {
    fn scroll_offset(&self) -> (f32, f32) {
        self.offset
    }
    fn set_scroll_offset(&mut self, x: f32, y: f32) {
        self.offset = (x, y);
    }
    fn set_scroll_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }
}

fn opened(vh: f32, t0: Instant, page: &mut Page) -> DrawerController {
    let mut drawer = DrawerController::new(DrawerConfig::default(), vh).unwrap();
    drawer.open(t0, page);
    drawer.tick(t0 + Duration::from_secs(1), page);
    drawer
}

proptest! {
    #[test]
    fn drag_height_within_drag_bounds(
        vh in 200.0f32..2000.0,
        start in 0.0f32..2000.0,
        moves in proptest::collection::vec(-3000.0f32..3000.0, 1..20),
    ) {
        let t0 = Instant::now();
        let mut page = Page::default();
        let mut drawer = opened(vh, t0, &mut page);
        let config = *drawer.config();
        prop_assert!(drawer.drag_start(start));
        for y in moves {
            drawer.drag_move(y);
            let h = drawer.height_fraction();
            prop_assert!(h >= config.drag_floor && h <= config.max_height, "height {h}");
        }
    }

    #[test]
    fn release_dismisses_or_rests_in_bounds(
        vh in 200.0f32..2000.0,
        start in 0.0f32..2000.0,
        end in -3000.0f32..3000.0,
    ) {
        let t0 = Instant::now();
        let mut page = Page::default();
        let mut drawer = opened(vh, t0, &mut page);
        let config = *drawer.config();
        drawer.drag_start(start);
        drawer.drag_move(end);
        let before = drawer.height_fraction();
        let events = drawer.drag_end(t0 + Duration::from_secs(2));

        if before < config.close_threshold {
            prop_assert_eq!(events.first(), Some(&DrawerEvent::Dismissed));
            prop_assert_eq!(drawer.phase(), DrawerPhase::Closing);
        } else {
            let h = drawer.height_fraction();
            prop_assert!(h >= config.min_height && h <= config.max_height, "rest {h}");
            prop_assert_eq!(drawer.phase(), DrawerPhase::Open);
        }
        prop_assert!(!drawer.is_dragging());
    }

    #[test]
    fn moves_without_drag_are_inert(
        ys in proptest::collection::vec(-3000.0f32..3000.0, 1..20),
    ) {
        let t0 = Instant::now();
        let mut page = Page::default();
        let mut drawer = opened(800.0, t0, &mut page);
        let before = drawer.height_fraction();
        for y in ys {
            drawer.handle_pointer(PointerEvent::touch(PointerKind::Move, 0.0, y), t0);
        }
        prop_assert_eq!(drawer.height_fraction().to_bits(), before.to_bits());
    }

    #[test]
    fn cancel_restores_baseline(
        start in 0.0f32..1000.0,
        moves in proptest::collection::vec(-3000.0f32..3000.0, 0..10),
    ) {
        let t0 = Instant::now();
        let mut page = Page::default();
        let mut drawer = opened(800.0, t0, &mut page);
        let baseline = drawer.height_fraction();
        drawer.drag_start(start);
        for y in moves {
            drawer.drag_move(y);
        }
        drawer.drag_cancel();
        prop_assert_eq!(drawer.height_fraction().to_bits(), baseline.to_bits());
        prop_assert!(!drawer.is_dragging());
    }

    #[test]
    fn closed_always_releases_scroll(
        scroll_y in 0.0f32..5000.0,
        close_after_ms in 0u64..400,
    ) {
        let t0 = Instant::now();
        let mut page = Page { offset: (0.0, scroll_y), ..Page::default() };
        let mut drawer = DrawerController::new(DrawerConfig::default(), 800.0).unwrap();
        drawer.open(t0, &mut page);
        let t1 = t0 + Duration::from_millis(close_after_ms);
        drawer.tick(t1, &mut page);
        drawer.close(t1);
        drawer.tick(t1 + Duration::from_secs(1), &mut page);

        prop_assert_eq!(drawer.phase(), DrawerPhase::Closed);
        prop_assert!(!drawer.holds_scroll_lock());
        prop_assert!(!page.suspended);
        prop_assert_eq!(page.offset, (0.0, scroll_y));
    }
}
