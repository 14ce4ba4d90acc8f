#![forbid(unsafe_code)]

//! Navigation facade: owns the interpreters and hint controller for one view.
//!
//! # Mounting
//!
//! [`NavigationController::mount`] checks the host's roots first. Without a
//! panel root there is nothing to navigate, so the controller logs a warning
//! and stays inert: every input handler returns `None` and the store is left
//! untouched. A missing hint root only hides that edge's hint.
//!
//! # Host loop
//!
//! ```rust,ignore
//! let mut nav = NavigationController::mount(&config, roots, store.clone(), flags, now);
//! // on input:
//! nav.on_wheel(event, &path, now);
//! // on wake-up:
//! nav.tick(now);
//! host.schedule_wakeup(nav.next_deadline());
//! render(nav.frame());
//! ```

use snapdeck_core::timeout::earliest;
use snapdeck_core::{
    DragDispatch, DragInterpreter, ElementPath, NavReason, PointerButton, PointerKind,
    ScrollGuard, WheelEvent, WheelInterpreter, WheelOutcome,
};
use thiserror::Error;
use tracing::{debug, warn};
use web_time::Instant;

use crate::config::NavConfig;
use crate::flags::FlagStore;
use crate::hints::{EdgeHintController, EdgeHintState, HintEdge, HintEdges, HintMode};
use crate::store::PanelStore;
use crate::view::{PanelFrame, describe};

/// Why navigation could not be mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MountError {
    #[error("panel root is missing; navigation is inert")]
    MissingPanelRoot,
}

/// What the host could find at mount time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostRoots {
    pub panel_root: bool,
    pub top_hint: bool,
    pub bottom_hint: bool,
    pub viewport_height: f64,
}

impl HostRoots {
    /// All roots present.
    #[must_use]
    pub const fn complete(viewport_height: f64) -> Self {
        Self {
            panel_root: true,
            top_hint: true,
            bottom_hint: true,
            viewport_height,
        }
    }

    const fn hint_edges(&self) -> HintEdges {
        HintEdges {
            top: self.top_hint,
            bottom: self.bottom_hint,
        }
    }
}

const HIDDEN_HINT: EdgeHintState = EdgeHintState {
    visible: false,
    mode: HintMode::Compact,
    label: "",
};

struct Mounted {
    store: PanelStore,
    guard: ScrollGuard,
    wheel: WheelInterpreter,
    drag: DragInterpreter,
    hints: Option<EdgeHintController>,
    viewport_height: f64,
}

/// Wheel, drag, and hint handling bound to one [`PanelStore`].
pub struct NavigationController {
    store: PanelStore,
    mounted: Option<Mounted>,
}

impl std::fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("store", &self.store)
            .field("active", &self.is_active())
            .finish()
    }
}

impl NavigationController {
    /// Mount navigation, degrading to an inert controller on failure.
    ///
    /// On success the current panel is re-announced with [`NavReason::Init`]
    /// so renderers and hints sync their initial state.
    pub fn mount(
        config: &NavConfig,
        roots: HostRoots,
        store: PanelStore,
        flags: Box<dyn FlagStore>,
        now: Instant,
    ) -> Self {
        match Self::try_mount(config, roots, store.clone(), flags, now) {
            Ok(controller) => controller,
            Err(error) => {
                warn!(%error, "navigation mount failed");
                Self {
                    store,
                    mounted: None,
                }
            }
        }
    }

    /// Mount navigation, reporting missing roots to the caller.
    pub fn try_mount(
        config: &NavConfig,
        roots: HostRoots,
        store: PanelStore,
        flags: Box<dyn FlagStore>,
        now: Instant,
    ) -> Result<Self, MountError> {
        if !roots.panel_root {
            return Err(MountError::MissingPanelRoot);
        }
        let edges = roots.hint_edges();
        if edges != HintEdges::BOTH {
            debug!(
                top = edges.top,
                bottom = edges.bottom,
                "edge hint roots missing; those edges stay hidden"
            );
        }
        let hints = edges.any().then(|| {
            EdgeHintController::with_edges(&store, config.to_hint_config(), flags, edges, now)
        });
        let mounted = Mounted {
            store: store.clone(),
            guard: config.to_scroll_guard(),
            wheel: WheelInterpreter::new(config.to_wheel_config()),
            drag: DragInterpreter::new(config.to_drag_config(), roots.viewport_height),
            hints,
            viewport_height: roots.viewport_height,
        };
        store.set_panel(store.current(), NavReason::Init, now);
        Ok(Self {
            store,
            mounted: Some(mounted),
        })
    }

    /// Whether input handling is live.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mounted.is_some()
    }

    /// Shared store handle, usable even while inert.
    #[must_use]
    pub fn store(&self) -> &PanelStore {
        &self.store
    }

    /// Restore a persisted panel id. Unknown ids are ignored.
    pub fn restore(&self, id: &str, now: Instant) -> bool {
        self.store.set_panel_by_id(id, NavReason::Restore, now)
    }

    pub fn on_wheel(
        &mut self,
        event: WheelEvent,
        path: &ElementPath,
        now: Instant,
    ) -> Option<WheelOutcome> {
        let Mounted {
            store,
            guard,
            wheel,
            ..
        } = self.mounted.as_mut()?;
        Some(wheel.on_wheel(event, path, guard, store, now))
    }

    pub fn on_pointer_down(
        &mut self,
        path: &ElementPath,
        pointer_id: u32,
        kind: PointerKind,
        button: PointerButton,
        y: f64,
    ) -> Option<DragDispatch> {
        let m = self.mounted.as_mut()?;
        Some(m.drag.pointer_down(path, &m.guard, pointer_id, kind, button, y))
    }

    pub fn on_pointer_move(&mut self, pointer_id: u32, y: f64) -> Option<DragDispatch> {
        let m = self.mounted.as_mut()?;
        Some(m.drag.pointer_move(pointer_id, y, m.store.current()))
    }

    pub fn on_pointer_up(&mut self, pointer_id: u32, y: f64, now: Instant) -> Option<DragDispatch> {
        let m = self.mounted.as_mut()?;
        Some(m.drag.pointer_up(pointer_id, y, &mut m.store, now))
    }

    pub fn on_pointer_cancel(&mut self, pointer_id: Option<u32>, now: Instant) -> Option<DragDispatch> {
        let m = self.mounted.as_mut()?;
        Some(m.drag.pointer_cancel(pointer_id, &mut m.store, now))
    }

    pub fn on_lost_pointer_capture(&mut self, pointer_id: u32, now: Instant) -> Option<DragDispatch> {
        let m = self.mounted.as_mut()?;
        Some(m.drag.lost_pointer_capture(pointer_id, &mut m.store, now))
    }

    /// Click on an edge hint. Returns whether it navigated.
    pub fn on_hint_click(&mut self, edge: HintEdge, now: Instant) -> bool {
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };
        match &m.hints {
            Some(hints) => hints.click(edge, &mut m.store, now),
            None => false,
        }
    }

    pub fn on_resize(&mut self, viewport_height: f64) {
        if let Some(m) = self.mounted.as_mut() {
            m.viewport_height = viewport_height;
            m.drag.set_viewport_height(viewport_height);
        }
    }

    /// Fire every due timer.
    pub fn tick(&mut self, now: Instant) {
        if let Some(m) = self.mounted.as_mut() {
            m.wheel.poll(now);
            if let Some(hints) = &m.hints {
                hints.tick(now);
            }
        }
    }

    /// Earliest pending timer across interpreters and hints.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let m = self.mounted.as_ref()?;
        earliest([
            m.wheel.lock_expires_at(),
            m.hints.as_ref().and_then(EdgeHintController::next_deadline),
        ])
    }

    /// Describe the current frame. Inert controllers report a zero-height
    /// strip with hidden hints.
    #[must_use]
    pub fn frame(&self) -> PanelFrame {
        let state = self.store.state();
        match &self.mounted {
            Some(m) => describe(
                state,
                m.drag.visual_offset(),
                m.hints
                    .as_ref()
                    .map_or([HIDDEN_HINT; 2], EdgeHintController::hints),
                m.viewport_height,
            ),
            None => describe(state, None, [HIDDEN_HINT; 2], 0.0),
        }
    }

    /// Tear down hints and interpreters. The store stays usable.
    pub fn unmount(&mut self) {
        if let Some(mut m) = self.mounted.take()
            && let Some(hints) = m.hints.as_mut()
        {
            hints.dispose();
        }
    }
}
