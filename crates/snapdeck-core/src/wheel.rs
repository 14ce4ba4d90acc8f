#![forbid(unsafe_code)]

//! Wheel/trackpad interpretation: continuous deltas to discrete panel steps.
//!
//! # State Machine
//!
//! The interpreter keeps a running vertical delta and a lock timeout.
//!
//! 1. Non-finite and mostly-horizontal events (`|dx| > |dy|`) are ignored.
//! 2. While locked, every event is ignored.
//! 3. If the scroll guard claims the event, the accumulator resets to zero so
//!    no delayed catch-up step fires once the inner region stops scrolling.
//! 4. Otherwise `dy` accumulates; once `|acc| >= threshold` the accumulator
//!    resets, the navigator steps by `sign(acc)`, and the lock arms.
//!
//! A high-frequency trackpad burst therefore yields exactly one step.

use std::time::Duration;

use tracing::debug;
use web_time::Instant;

use crate::element::ElementPath;
use crate::panel::{NavReason, Panel, PanelNavigator};
use crate::scroll_guard::{GuardCause, GuardDecision, ScrollGuard};
use crate::timeout::Timeout;

/// Accumulated delta that triggers one step.
pub const WHEEL_STEP_THRESHOLD: f64 = 140.0;

/// Cooldown after a step during which wheel input is ignored.
pub const WHEEL_LOCK: Duration = Duration::from_millis(520);

/// Wheel thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelConfig {
    /// Absolute accumulated delta that triggers a step (default: 140).
    pub threshold: f64,
    /// Lock duration after a step (default: 520ms).
    pub lock: Duration,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            threshold: WHEEL_STEP_THRESHOLD,
            lock: WHEEL_LOCK,
        }
    }
}

/// One wheel event, in delta units as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelEvent {
    pub delta_x: f64,
    /// Positive scrolls down (forward).
    pub delta_y: f64,
}

impl WheelEvent {
    #[must_use]
    pub const fn vertical(delta_y: f64) -> Self {
        Self {
            delta_x: 0.0,
            delta_y,
        }
    }

    #[must_use]
    pub const fn new(delta_x: f64, delta_y: f64) -> Self {
        Self { delta_x, delta_y }
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.delta_x.abs() > self.delta_y.abs()
    }
}

/// Why a wheel event had no effect at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelIgnoredReason {
    /// A delta was NaN or infinite.
    NonFinite,
    Horizontal,
    Locked,
}

/// Result of feeding one wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    Ignored(WheelIgnoredReason),
    /// An inner scroll region consumed the event; the accumulator is zero.
    Guarded(GuardCause),
    /// Delta added; below the threshold.
    Accumulated { total: f64 },
    /// Threshold crossed; the navigator stepped and the lock is armed.
    Stepped { direction: isize, panel: Panel },
}

/// Wheel gesture interpreter.
#[derive(Debug, Clone, Default)]
pub struct WheelInterpreter {
    config: WheelConfig,
    accumulated: f64,
    lock: Timeout,
}

impl WheelInterpreter {
    #[must_use]
    pub fn new(config: WheelConfig) -> Self {
        Self {
            config,
            accumulated: 0.0,
            lock: Timeout::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> WheelConfig {
        self.config
    }

    /// Running delta since the last reset.
    #[must_use]
    pub const fn accumulated(&self) -> f64 {
        self.accumulated
    }

    #[must_use]
    pub fn is_locked(&self, now: Instant) -> bool {
        self.lock.is_pending(now)
    }

    /// When the current lock expires, if locked.
    #[must_use]
    pub const fn lock_expires_at(&self) -> Option<Instant> {
        self.lock.deadline()
    }

    /// Clear an expired lock.
    pub fn poll(&mut self, now: Instant) {
        if self.lock.fire_if_due(now) {
            debug!("wheel lock released");
        }
    }

    /// Feed one wheel event originating at `path`.
    pub fn on_wheel<N: PanelNavigator>(
        &mut self,
        event: WheelEvent,
        path: &ElementPath,
        guard: &ScrollGuard,
        nav: &mut N,
        now: Instant,
    ) -> WheelOutcome {
        self.poll(now);

        if !(event.delta_x.is_finite() && event.delta_y.is_finite()) {
            return WheelOutcome::Ignored(WheelIgnoredReason::NonFinite);
        }
        if event.is_horizontal() {
            return WheelOutcome::Ignored(WheelIgnoredReason::Horizontal);
        }
        if self.is_locked(now) {
            return WheelOutcome::Ignored(WheelIgnoredReason::Locked);
        }

        if let GuardDecision::Guarded(cause) = guard.resolve(path, event.delta_y) {
            self.accumulated = 0.0;
            return WheelOutcome::Guarded(cause);
        }

        self.accumulated += event.delta_y;
        if self.accumulated.abs() < self.config.threshold {
            return WheelOutcome::Accumulated {
                total: self.accumulated,
            };
        }

        let direction = if self.accumulated > 0.0 { 1 } else { -1 };
        self.accumulated = 0.0;
        let panel = nav.step(direction, NavReason::WheelStep, now);
        self.lock.schedule(now, self.config.lock);
        debug!(
            direction,
            panel = panel.id(),
            lock_ms = self.config.lock.as_millis() as u64,
            "wheel step"
        );
        WheelOutcome::Stepped { direction, panel }
    }

    /// Drop accumulated delta and any pending lock.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.lock.cancel();
    }
}
