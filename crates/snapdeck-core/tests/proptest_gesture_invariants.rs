//! Property-based invariant tests for the gesture interpreters.
//!
//! ## Invariants
//!
//! 1. Clamping an in-range panel index is a no-op.
//! 2. Stepping never leaves the sequence; outward steps at an edge re-announce
//!    the edge panel as a clamp.
//! 3. A guarded wheel event resets the accumulator to exactly zero.
//! 4. A one-directional wheel burst reaching the threshold steps exactly once
//!    and nothing else steps until the lock expires.
//! 5. Drag release below the threshold snaps back; at or above it steps once
//!    in the sign of the displacement.

use std::time::Duration;

use proptest::prelude::*;
use snapdeck_core::{
    DragConfig, DragInterpreter, DragOutcome, DragSettle, Element, ElementFlags, ElementPath,
    NavReason, Panel, PanelNavigator, PointerButton, PointerKind, ScrollGuard, ScrollMetrics,
    WheelEvent, WheelInterpreter, WheelOutcome,
};
use web_time::Instant;

#[derive(Debug)]
struct Nav {
    current: Panel,
    calls: Vec<(Panel, NavReason)>,
}

impl Nav {
    fn at(current: Panel) -> Self {
        Self {
            current,
            calls: Vec::new(),
        }
    }
}

impl PanelNavigator for Nav {
    fn current(&self) -> Panel {
        self.current
    }

    fn set_panel(&mut self, panel: Panel, reason: NavReason, _now: Instant) {
        self.current = panel;
        self.calls.push((panel, reason));
    }
}

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_panel() -> impl Strategy<Value = Panel> {
    prop::sample::select(Panel::ALL.to_vec())
}

fn arb_viewport() -> impl Strategy<Value = f64> {
    (200u32..=2000).prop_map(f64::from)
}

/// Positive wheel chunks, each below the threshold, summing to at least 140.
fn arb_forward_burst() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1u32..=139, 1..20)
        .prop_filter("burst must reach threshold", |chunks| {
            chunks.iter().sum::<u32>() >= 140
        })
        .prop_map(|chunks| chunks.into_iter().map(f64::from).collect())
}

// ── 1. Clamp is identity in range ─────────────────────────────────────────

proptest! {
    #[test]
    fn clamp_is_noop_for_every_panel(panel in arb_panel()) {
        let index = panel.index() as isize;
        prop_assert_eq!(Panel::clamp_index(index), panel.index());
        prop_assert_eq!(Panel::from_index_clamped(index), panel);
    }
}

// ── 2. Step stays in range ────────────────────────────────────────────────

proptest! {
    #[test]
    fn step_stays_in_range(panel in arb_panel(), delta in -10isize..=10) {
        let mut nav = Nav::at(panel);
        let result = nav.step(delta, NavReason::WheelStep, Instant::now());
        prop_assert!(Panel::ALL.contains(&result));
        prop_assert_eq!(nav.calls.len(), 1);

        let raw = panel.index() as isize + delta;
        if result == panel {
            prop_assert_eq!(nav.calls[0], (panel, NavReason::PanelClamp));
        } else {
            prop_assert_eq!(result.index() as isize, raw.clamp(0, 2));
            prop_assert_eq!(nav.calls[0].1, NavReason::WheelStep);
        }
    }
}

// ── 3. Guard resets accumulator ───────────────────────────────────────────

proptest! {
    #[test]
    fn guarded_wheel_resets_accumulator(prior in -139i32..=139, dy in 1i32..=400) {
        let mut wheel = WheelInterpreter::default();
        let mut nav = Nav::at(Panel::Log);
        let guard = ScrollGuard::default();
        let t = Instant::now();

        wheel.on_wheel(WheelEvent::vertical(f64::from(prior)), &ElementPath::empty(), &guard, &mut nav, t);
        prop_assert_eq!(wheel.accumulated(), f64::from(prior));

        let region = ElementPath::new(vec![
            Element::generic()
                .with_flags(ElementFlags::SCROLL_GUARD)
                .with_metrics(ScrollMetrics::vertical(50.0, 2000.0, 400.0)),
        ]);
        let outcome = wheel.on_wheel(WheelEvent::vertical(f64::from(dy)), &region, &guard, &mut nav, t);
        prop_assert!(matches!(outcome, WheelOutcome::Guarded(_)));
        prop_assert_eq!(wheel.accumulated(), 0.0);
        prop_assert!(nav.calls.is_empty());
    }
}

// ── 4. One step per burst, then locked ────────────────────────────────────

proptest! {
    #[test]
    fn burst_steps_once_then_locks(chunks in arb_forward_burst(), extra in 140u32..=1000) {
        let mut wheel = WheelInterpreter::default();
        let mut nav = Nav::at(Panel::Tasks);
        let guard = ScrollGuard::default();
        let t = Instant::now();

        let mut stepped_at = None;
        for (i, dy) in chunks.iter().enumerate() {
            let now = t + Duration::from_millis(i as u64);
            let outcome = wheel.on_wheel(WheelEvent::vertical(*dy), &ElementPath::empty(), &guard, &mut nav, now);
            if matches!(outcome, WheelOutcome::Stepped { .. }) {
                stepped_at = Some(now);
                break;
            }
        }
        let stepped_at = stepped_at.expect("burst reaching the threshold must step");
        prop_assert_eq!(nav.calls.len(), 1);

        let locked = stepped_at + Duration::from_millis(519);
        wheel.on_wheel(WheelEvent::vertical(f64::from(extra)), &ElementPath::empty(), &guard, &mut nav, locked);
        prop_assert_eq!(nav.calls.len(), 1);

        let released = stepped_at + Duration::from_millis(520);
        wheel.on_wheel(WheelEvent::vertical(f64::from(extra)), &ElementPath::empty(), &guard, &mut nav, released);
        prop_assert_eq!(nav.calls.len(), 2);
    }
}

// ── 5. Drag release threshold ─────────────────────────────────────────────

proptest! {
    #[test]
    fn drag_release_respects_threshold(
        panel in arb_panel(),
        viewport in arb_viewport(),
        dy in -1500i32..=1500,
    ) {
        let config = DragConfig::default();
        let mut drag = DragInterpreter::new(config, viewport);
        let mut nav = Nav::at(panel);
        let dy = f64::from(dy);

        drag.pointer_down(&ElementPath::empty(), &ScrollGuard::default(), 1, PointerKind::Touch, PointerButton::Primary, 1000.0);
        drag.pointer_move(1, 1000.0 + dy, panel);
        let dispatch = drag.pointer_up(1, 1000.0 + dy, &mut nav, Instant::now());

        prop_assert_eq!(nav.calls.len(), 1);
        if dy.abs() < config.threshold(viewport) {
            prop_assert_eq!(dispatch.outcome, DragOutcome::Settled(DragSettle::Snapback));
            prop_assert_eq!(nav.calls[0], (panel, NavReason::DragSnapback));
        } else {
            let direction = if dy > 0.0 { 1 } else { -1 };
            let expected = Panel::from_index_clamped(panel.index() as isize + direction);
            prop_assert_eq!(
                dispatch.outcome,
                DragOutcome::Settled(DragSettle::Step { direction, panel: expected })
            );
            prop_assert_eq!(nav.current, expected);
        }
        prop_assert!(!drag.is_dragging());
    }
}
