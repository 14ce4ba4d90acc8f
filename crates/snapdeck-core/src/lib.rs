#![forbid(unsafe_code)]

//! Core: panel sequence, input origin model, and gesture interpreters.
//!
//! # Role in snapdeck
//! `snapdeck-core` is the input layer. It decides whether a wheel burst or a
//! pointer drag should change the showing panel, and it funnels every such
//! decision through the [`PanelNavigator`] seam. It knows nothing about
//! subscribers, storage, or rendering.
//!
//! # Primary responsibilities
//! - **Panel**: the fixed, ordered panel set and clamped index arithmetic.
//! - **ScrollGuard**: yields gestures to inner scroll regions that can still scroll.
//! - **WheelInterpreter**: threshold + lock debouncing of wheel/trackpad deltas.
//! - **DragInterpreter**: one pointer-drag session with rubber-band resistance.
//! - **Timeout**: owned, replaceable deadlines driven by an explicit clock.
//!
//! # How it fits in the system
//! `snapdeck-runtime` implements [`PanelNavigator`] with its panel store and
//! owns one interpreter of each kind behind the navigation controller.

pub mod drag;
pub mod element;
pub mod panel;
pub mod scroll_guard;
pub mod timeout;
pub mod wheel;

pub use drag::{
    CaptureCommand, DragConfig, DragDispatch, DragIgnoredReason, DragInterpreter, DragOutcome,
    DragPhase, DragSettle, GestureSession, PointerButton, PointerKind,
};
pub use element::{Element, ElementFlags, ElementKind, ElementPath, ScrollMetrics};
pub use panel::{NavReason, Panel, PanelNavigator, UnknownPanel};
pub use scroll_guard::{GuardCause, GuardDecision, ScrollGuard};
pub use timeout::Timeout;
pub use wheel::{WheelConfig, WheelEvent, WheelIgnoredReason, WheelInterpreter, WheelOutcome};
