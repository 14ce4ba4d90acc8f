#![forbid(unsafe_code)]

//! Pure mapping from navigation state to a render description.
//!
//! Renderers never inspect interpreters directly; they call [`describe`] after
//! each store notification or drag dispatch and apply the resulting
//! [`PanelFrame`].

use snapdeck_core::Panel;

use crate::hints::{EdgeHintState, HintMode};
use crate::store::PanelState;

/// How one edge hint should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintView {
    pub visible: bool,
    pub mode: HintMode,
    pub label: &'static str,
}

impl HintView {
    /// Class tag of the hint's mode (`is-compact` / `is-peek`).
    #[must_use]
    pub const fn class_tag(&self) -> &'static str {
        self.mode.class_tag()
    }
}

impl From<EdgeHintState> for HintView {
    fn from(state: EdgeHintState) -> Self {
        Self {
            visible: state.visible,
            mode: state.mode,
            label: state.label,
        }
    }
}

/// Everything a renderer needs for one frame of the panel strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelFrame {
    pub active: Panel,
    /// Class tag of the active panel, e.g. `is-log`.
    pub class_tag: &'static str,
    /// Vertical translate of the panel strip, in pixels.
    pub translate_y: f64,
    /// Transitions are disabled while the strip follows a finger.
    pub animate: bool,
    pub top_hint: HintView,
    pub bottom_hint: HintView,
}

/// Describe the frame for `state`.
///
/// `drag_offset` is the live session's strip translate, if any; it overrides
/// the panel's resting offset and disables animation.
#[must_use]
pub fn describe(
    state: PanelState,
    drag_offset: Option<f64>,
    hints: [EdgeHintState; 2],
    viewport_height: f64,
) -> PanelFrame {
    let [top, bottom] = hints;
    let panel = state.panel;
    PanelFrame {
        active: panel,
        class_tag: panel.class_tag(),
        translate_y: drag_offset.unwrap_or_else(|| panel.base_offset(viewport_height)),
        animate: drag_offset.is_none(),
        top_hint: top.into(),
        bottom_hint: bottom.into(),
    }
}
