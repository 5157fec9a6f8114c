//! Property-based invariant tests for the overlay lifecycle.
//!
//! Random sequences of opens, closes, dismissals, re-solves and drawer
//! gestures across several overlays sharing one registry.
//!
//! 1. At most one overlay is not `Closed`, and it is the registry's active one.
//! 2. Closed overlays hold zero listeners, on both sides of the host boundary.
//! 3. The host's attached listeners are exactly the open overlay's.
//! 4. Page scroll is suspended only while a modal or drawer overlay is open.

use std::rc::Rc;
use std::time::{Duration, Instant};

use flyout_core::event::{Event, KeyCode, KeyEvent, PointerEvent, PointerKind, ScrollEvent};
use flyout_core::geometry::{AnchorRect, Size, Viewport};
use flyout_runtime::simulator::SimulatedHost;
use flyout_runtime::{
    ActiveOverlayRegistry, ElementId, OpenRequest, Overlay, OverlayConfig, OverlayState,
};
use proptest::prelude::*;

const OVERLAYS: usize = 4;

#[derive(Debug, Clone)]
enum Op {
    Open(usize),
    Close(usize),
    Unmount(usize),
    Escape(usize),
    PointerDown(usize, f32, f32),
    Scroll(usize),
    Resize(usize, f32),
    RemoveAnchor(usize),
    Drag(usize, f32),
    Tick(usize, u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let idx = 0..OVERLAYS;
    prop_oneof![
        4 => idx.clone().prop_map(Op::Open),
        1 => idx.clone().prop_map(Op::Close),
        1 => idx.clone().prop_map(Op::Unmount),
        1 => idx.clone().prop_map(Op::Escape),
        1 => (idx.clone(), 0.0f32..1024.0, 0.0f32..768.0).prop_map(|(i, x, y)| Op::PointerDown(i, x, y)),
        1 => idx.clone().prop_map(Op::Scroll),
        1 => (idx.clone(), 400.0f32..1400.0).prop_map(|(i, w)| Op::Resize(i, w)),
        1 => idx.clone().prop_map(Op::RemoveAnchor),
        1 => (idx.clone(), -600.0f32..600.0).prop_map(|(i, dy)| Op::Drag(i, dy)),
        1 => (idx, 0u64..500).prop_map(|(i, ms)| Op::Tick(i, ms)),
    ]
}

fn config_for(i: usize) -> OverlayConfig {
    match i {
        0 => OverlayConfig::modal(),
        1 => OverlayConfig::default().with_hover_close_delay(Duration::from_millis(100)),
        _ => OverlayConfig::default(),
    }
}

fn anchor_for(i: usize) -> AnchorRect {
    AnchorRect::new(100.0 + 150.0 * i as f32, 50.0 + 200.0 * i as f32, 60.0, 30.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn at_most_one_overlay_open(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let registry = Rc::new(ActiveOverlayRegistry::new());
        let mut host = SimulatedHost::new(Viewport::new(1024.0, 768.0).with_scroll(0.0, 300.0));
        for i in 0..OVERLAYS {
            host.set_anchor(ElementId(i as u64), anchor_for(i));
        }
        let overlays: Vec<Overlay> = (0..OVERLAYS)
            .map(|i| Overlay::new(&registry, config_for(i)).unwrap())
            .collect();
        let mut now = Instant::now();

        for op in ops {
            now += Duration::from_millis(10);
            match op {
                Op::Open(i) => {
                    let request = OpenRequest::new(ElementId(i as u64), Size::new(240.0, 300.0));
                    let _ = overlays[i].open(&mut host, request, now);
                }
                Op::Close(i) => {
                    let _ = overlays[i].close(&mut host);
                }
                Op::Unmount(i) => {
                    overlays[i].unmount(&mut host);
                }
                Op::Escape(i) => {
                    overlays[i].dispatch(&mut host, Event::Key(KeyEvent::new(KeyCode::Escape)), now);
                }
                Op::PointerDown(i, x, y) => {
                    let down = PointerEvent::new(PointerKind::Down, x, y);
                    overlays[i].dispatch(&mut host, Event::Pointer(down), now);
                }
                Op::Scroll(i) => {
                    overlays[i].dispatch(&mut host, Event::Scroll(ScrollEvent::ancestor()), now);
                }
                Op::Resize(i, width) => {
                    host.resize(width, 768.0);
                    overlays[i].dispatch(&mut host, Event::Resize { width, height: 768.0 }, now);
                }
                Op::RemoveAnchor(i) => {
                    host.remove_anchor(ElementId(i as u64));
                    overlays[i].dispatch(&mut host, Event::Scroll(ScrollEvent::window(0.0, 300.0)), now);
                    host.set_anchor(ElementId(i as u64), anchor_for(i));
                }
                Op::Drag(i, dy) => {
                    for (kind, y) in [
                        (PointerKind::Down, 600.0),
                        (PointerKind::Move, 600.0 + dy),
                        (PointerKind::Up, 600.0 + dy),
                    ] {
                        let pointer = PointerEvent::touch(kind, 200.0, y);
                        overlays[i].dispatch(&mut host, Event::Pointer(pointer), now);
                    }
                }
                Op::Tick(i, ms) => {
                    now += Duration::from_millis(ms);
                    overlays[i].dispatch(&mut host, Event::Tick, now);
                }
            }

            let live: Vec<&Overlay> = overlays.iter().filter(|o| o.is_open()).collect();
            prop_assert!(live.len() <= 1, "{} overlays open at once", live.len());
            prop_assert_eq!(registry.active(), live.first().map(|o| o.id()));

            for overlay in &overlays {
                if overlay.state() == OverlayState::Closed {
                    prop_assert_eq!(overlay.listener_count(), 0);
                    prop_assert!(host.listeners_for(overlay.id()).is_empty());
                } else {
                    prop_assert_eq!(host.listeners_for(overlay.id()), overlay.listeners());
                }
            }
            let held: u32 = live.iter().map(|o| o.listener_count()).sum();
            prop_assert_eq!(host.total_listeners(), held);

            let blocking = live.iter().any(|o| o.config().modal || o.drawer().is_some());
            prop_assert_eq!(host.is_scroll_suspended(), blocking);
        }
    }
}
