#![forbid(unsafe_code)]

//! Pointer-drag interpretation with rubber-band resistance and pointer capture.
//!
//! # State Machine
//!
//! `Idle → Dragging → Idle`. At most one [`GestureSession`] exists; events for
//! any other pointer id are ignored while it is active.
//!
//! - **pointer-down** starts a session unless the button is a secondary mouse
//!   button, the origin is an interactive control (so clicks and focus keep
//!   working), or the origin sits inside a scroll-guard region (native
//!   scrolling wins). A started session requests pointer capture.
//! - **pointer-move** produces a damped visual offset for the panel strip:
//!   `base(panel) + dy * resistance`, or `dy * edge_resistance` when dragging
//!   past the first or last panel.
//! - **pointer-up / pointer-cancel** release capture and settle: `|dy|` below
//!   `threshold_ratio * viewport_height` snaps back, otherwise the navigator
//!   steps once in the sign of `dy`.
//! - **lost-pointer-capture** settles as a snapback tagged
//!   [`NavReason::LostPointer`]; capture is already gone so nothing is released.
//!
//! Every dispatch reports whether it was consumed. Hosts only suppress the
//! native default action for consumed events.

use tracing::debug;
use web_time::Instant;

use crate::element::ElementPath;
use crate::panel::{NavReason, Panel, PanelNavigator};
use crate::scroll_guard::ScrollGuard;

/// Visual damping applied to raw drag displacement.
pub const DRAG_RESISTANCE: f64 = 0.35;

/// Stronger damping when dragging past the first or last panel.
pub const DRAG_EDGE_RESISTANCE: f64 = 0.18;

/// Fraction of the viewport height a release must travel to step.
pub const DRAG_THRESHOLD_RATIO: f64 = 0.18;

/// Drag physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Visual offset per unit of pointer travel (default: 0.35).
    pub resistance: f64,
    /// Visual offset per unit of travel past an edge panel (default: 0.18).
    pub edge_resistance: f64,
    /// Release threshold as a fraction of viewport height (default: 0.18).
    pub threshold_ratio: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            resistance: DRAG_RESISTANCE,
            edge_resistance: DRAG_EDGE_RESISTANCE,
            threshold_ratio: DRAG_THRESHOLD_RATIO,
        }
    }
}

impl DragConfig {
    /// Minimum release travel that changes panel.
    #[must_use]
    pub fn threshold(&self, viewport_height: f64) -> f64 {
        self.threshold_ratio * viewport_height
    }

    /// Strip translate while `panel` is being dragged by `dy`.
    #[must_use]
    pub fn offset(&self, panel: Panel, dy: f64, viewport_height: f64) -> f64 {
        let past_edge = (panel.is_first() && dy < 0.0) || (panel.is_last() && dy > 0.0);
        let factor = if past_edge {
            self.edge_resistance
        } else {
            self.resistance
        };
        panel.base_offset(viewport_height) + dy * factor
    }
}

/// Input device behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// Button that went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Host command for browser-style pointer capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCommand {
    Acquire { pointer_id: u32 },
    Release { pointer_id: u32 },
}

/// Lifecycle phase of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    LostPointerCapture,
}

/// Why a pointer signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragIgnoredReason {
    /// Position was NaN or infinite.
    NonFinitePosition,
    ButtonNotAllowed,
    InteractiveTarget,
    ScrollGuardRegion,
    SessionAlreadyActive,
    NoActiveSession,
    PointerMismatch,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSettle {
    /// Travel below threshold; the current panel was re-announced.
    Snapback,
    /// Travel reached threshold; the navigator stepped.
    Step { direction: isize, panel: Panel },
    /// Capture vanished without an up event.
    LostPointer,
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Started,
    Moved,
    Settled(DragSettle),
    Ignored(DragIgnoredReason),
}

/// Result of one pointer lifecycle dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDispatch {
    pub phase: DragPhase,
    pub pointer_id: u32,
    pub outcome: DragOutcome,
    /// Strip translate to render while the session is live.
    pub offset: Option<f64>,
    pub capture_command: Option<CaptureCommand>,
}

impl DragDispatch {
    fn ignored(phase: DragPhase, pointer_id: u32, reason: DragIgnoredReason) -> Self {
        Self {
            phase,
            pointer_id,
            outcome: DragOutcome::Ignored(reason),
            offset: None,
            capture_command: None,
        }
    }

    /// Whether the host should suppress the event's native default action.
    #[must_use]
    pub const fn consumed(&self) -> bool {
        !matches!(self.outcome, DragOutcome::Ignored(_))
    }
}

/// The single live drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub pointer_id: u32,
    pub start_y: f64,
    pub current_y: f64,
    /// Last computed strip translate.
    pub offset: Option<f64>,
}

impl GestureSession {
    #[must_use]
    pub fn dy(&self) -> f64 {
        self.current_y - self.start_y
    }
}

/// Pointer-drag gesture interpreter.
#[derive(Debug, Clone)]
pub struct DragInterpreter {
    config: DragConfig,
    viewport_height: f64,
    session: Option<GestureSession>,
}

impl DragInterpreter {
    #[must_use]
    pub fn new(config: DragConfig, viewport_height: f64) -> Self {
        Self {
            config,
            viewport_height,
            session: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> DragConfig {
        self.config
    }

    #[must_use]
    pub const fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Track a viewport resize; applies to the live session too.
    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
    }

    #[must_use]
    pub const fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Strip translate of the live session, if dragging.
    #[must_use]
    pub fn visual_offset(&self) -> Option<f64> {
        self.session.and_then(|session| session.offset)
    }

    /// Handle pointer-down at `y` on the element chain `path`.
    pub fn pointer_down(
        &mut self,
        path: &ElementPath,
        guard: &ScrollGuard,
        pointer_id: u32,
        kind: PointerKind,
        button: PointerButton,
        y: f64,
    ) -> DragDispatch {
        let phase = DragPhase::PointerDown;
        if !y.is_finite() {
            return DragDispatch::ignored(phase, pointer_id, DragIgnoredReason::NonFinitePosition);
        }
        if kind == PointerKind::Mouse && button != PointerButton::Primary {
            return DragDispatch::ignored(phase, pointer_id, DragIgnoredReason::ButtonNotAllowed);
        }
        if self.session.is_some() {
            return DragDispatch::ignored(
                phase,
                pointer_id,
                DragIgnoredReason::SessionAlreadyActive,
            );
        }
        if path.is_interactive() {
            return DragDispatch::ignored(phase, pointer_id, DragIgnoredReason::InteractiveTarget);
        }
        if guard.region(path).is_some() {
            return DragDispatch::ignored(phase, pointer_id, DragIgnoredReason::ScrollGuardRegion);
        }

        self.session = Some(GestureSession {
            pointer_id,
            start_y: y,
            current_y: y,
            offset: None,
        });
        debug!(pointer_id, start_y = y, "drag session started");
        DragDispatch {
            phase,
            pointer_id,
            outcome: DragOutcome::Started,
            offset: None,
            capture_command: Some(CaptureCommand::Acquire { pointer_id }),
        }
    }

    /// Handle pointer-move for the active pointer while `current` is showing.
    pub fn pointer_move(&mut self, pointer_id: u32, y: f64, current: Panel) -> DragDispatch {
        let phase = DragPhase::PointerMove;
        let Some(session) = self.session.as_mut() else {
            return DragDispatch::ignored(phase, pointer_id, DragIgnoredReason::NoActiveSession);
        };
        if session.pointer_id != pointer_id {
            return DragDispatch::ignored(phase, pointer_id, DragIgnoredReason::PointerMismatch);
        }
        if !y.is_finite() {
            return DragDispatch::ignored(phase, pointer_id, DragIgnoredReason::NonFinitePosition);
        }

        session.current_y = y;
        let offset = self
            .config
            .offset(current, session.dy(), self.viewport_height);
        session.offset = Some(offset);
        DragDispatch {
            phase,
            pointer_id,
            outcome: DragOutcome::Moved,
            offset: Some(offset),
            capture_command: None,
        }
    }

    /// Handle pointer-up at `y` and settle the session.
    pub fn pointer_up<N: PanelNavigator>(
        &mut self,
        pointer_id: u32,
        y: f64,
        nav: &mut N,
        now: Instant,
    ) -> DragDispatch {
        let phase = DragPhase::PointerUp;
        match self.take_session(pointer_id) {
            Ok(mut session) => {
                // A garbled release position settles from the last move.
                if y.is_finite() {
                    session.current_y = y;
                }
                self.settle(phase, session, nav, now)
            }
            Err(reason) => DragDispatch::ignored(phase, pointer_id, reason),
        }
    }

    /// Handle pointer-cancel; settles from the last observed position.
    ///
    /// `None` cancels whatever session is live.
    pub fn pointer_cancel<N: PanelNavigator>(
        &mut self,
        pointer_id: Option<u32>,
        nav: &mut N,
        now: Instant,
    ) -> DragDispatch {
        let phase = DragPhase::PointerCancel;
        let id = match (pointer_id, self.session) {
            (Some(id), _) => id,
            (None, Some(session)) => session.pointer_id,
            (None, None) => {
                return DragDispatch::ignored(phase, 0, DragIgnoredReason::NoActiveSession);
            }
        };
        match self.take_session(id) {
            Ok(session) => self.settle(phase, session, nav, now),
            Err(reason) => DragDispatch::ignored(phase, id, reason),
        }
    }

    /// Handle `lostpointercapture` for a session that never saw its up event.
    pub fn lost_pointer_capture<N: PanelNavigator>(
        &mut self,
        pointer_id: u32,
        nav: &mut N,
        now: Instant,
    ) -> DragDispatch {
        let phase = DragPhase::LostPointerCapture;
        if let Err(reason) = self.take_session(pointer_id) {
            return DragDispatch::ignored(phase, pointer_id, reason);
        }
        let current = nav.current();
        nav.set_panel(current, NavReason::LostPointer, now);
        debug!(pointer_id, panel = current.id(), "drag lost pointer capture");
        DragDispatch {
            phase,
            pointer_id,
            outcome: DragOutcome::Settled(DragSettle::LostPointer),
            offset: None,
            capture_command: None,
        }
    }

    fn take_session(&mut self, pointer_id: u32) -> Result<GestureSession, DragIgnoredReason> {
        match self.session {
            None => Err(DragIgnoredReason::NoActiveSession),
            Some(session) if session.pointer_id != pointer_id => {
                Err(DragIgnoredReason::PointerMismatch)
            }
            Some(session) => {
                self.session = None;
                Ok(session)
            }
        }
    }

    fn settle<N: PanelNavigator>(
        &self,
        phase: DragPhase,
        session: GestureSession,
        nav: &mut N,
        now: Instant,
    ) -> DragDispatch {
        let dy = session.dy();
        let threshold = self.config.threshold(self.viewport_height);
        let settle = if dy.abs() < threshold {
            let current = nav.current();
            nav.set_panel(current, NavReason::DragSnapback, now);
            DragSettle::Snapback
        } else {
            let direction = if dy > 0.0 { 1 } else { -1 };
            let panel = nav.step(direction, NavReason::DragStep, now);
            DragSettle::Step { direction, panel }
        };
        debug!(
            pointer_id = session.pointer_id,
            dy,
            threshold,
            settle = ?settle,
            "drag session settled"
        );
        DragDispatch {
            phase,
            pointer_id: session.pointer_id,
            outcome: DragOutcome::Settled(settle),
            offset: None,
            capture_command: Some(CaptureCommand::Release {
                pointer_id: session.pointer_id,
            }),
        }
    }
}
