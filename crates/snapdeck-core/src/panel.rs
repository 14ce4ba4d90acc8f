#![forbid(unsafe_code)]

//! The fixed panel sequence and the navigation seam every interpreter drives.
//!
//! # Invariants
//!
//! 1. [`Panel::ALL`] is the only ordering; it never changes at runtime.
//! 2. Index arithmetic always clamps to `[0, N-1]`.
//! 3. [`PanelNavigator::step`] never produces an out-of-range panel. A step
//!    that would leave the sequence re-announces the current panel with
//!    [`NavReason::PanelClamp`] so a bounce can play.

use std::fmt;
use std::str::FromStr;

use web_time::Instant;

/// One of the full-screen panels, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Panel {
    /// Daily task wall (first).
    Tasks,
    /// Class log (middle).
    Log,
    /// Summon gate (last).
    Summon,
}

impl Panel {
    /// Fixed navigation order.
    pub const ALL: [Panel; 3] = [Panel::Tasks, Panel::Log, Panel::Summon];

    /// Panel shown before anything else has been selected.
    pub const DEFAULT: Panel = Panel::Log;

    /// Number of panels in the sequence.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this panel in [`Panel::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Tasks => 0,
            Self::Log => 1,
            Self::Summon => 2,
        }
    }

    /// Clamp an arbitrary index into range.
    #[must_use]
    pub fn clamp_index(index: isize) -> usize {
        index.clamp(0, Self::COUNT as isize - 1) as usize
    }

    /// Panel at `index`, clamped into the sequence.
    #[must_use]
    pub fn from_index_clamped(index: isize) -> Self {
        Self::ALL[Self::clamp_index(index)]
    }

    /// Stable identifier used by hosts and persisted records.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Log => "log",
            Self::Summon => "summon",
        }
    }

    /// Class tag a renderer applies to the panel strip.
    #[must_use]
    pub const fn class_tag(self) -> &'static str {
        match self {
            Self::Tasks => "is-tasks",
            Self::Log => "is-log",
            Self::Summon => "is-summon",
        }
    }

    /// Whether no panel precedes this one.
    #[must_use]
    pub const fn is_first(self) -> bool {
        self.index() == 0
    }

    /// Whether no panel follows this one.
    #[must_use]
    pub const fn is_last(self) -> bool {
        self.index() == Self::COUNT - 1
    }

    /// Panel before this one, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Panel after this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Resting translate of the panel strip when this panel is showing.
    #[must_use]
    pub fn base_offset(self, viewport_height: f64) -> f64 {
        -(self.index() as f64) * viewport_height
    }

    /// Label of the hint pointing at the previous panel.
    #[must_use]
    pub const fn top_hint_label(self) -> &'static str {
        match self {
            Self::Log => "↑ Daily tasks",
            Self::Summon => "↑ Class log",
            Self::Tasks => "↑",
        }
    }

    /// Label of the hint pointing at the next panel.
    #[must_use]
    pub const fn bottom_hint_label(self) -> &'static str {
        match self {
            Self::Tasks => "↓ Class log",
            Self::Log => "↓ Summon gate",
            Self::Summon => "↓",
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a string is not a known panel identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPanel(pub String);

impl fmt::Display for UnknownPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown panel identifier {:?}", self.0)
    }
}

impl std::error::Error for UnknownPanel {}

impl FromStr for Panel {
    type Err = UnknownPanel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|panel| panel.id() == s)
            .ok_or_else(|| UnknownPanel(s.to_owned()))
    }
}

/// Why the current panel was (re)announced.
///
/// Downstream consumers use the tag to decide secondary behavior, e.g.
/// whether the edge hints should peek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavReason {
    /// Initial announcement when navigation mounts.
    Init,
    /// A wheel burst crossed the step threshold.
    WheelStep,
    /// A drag was released past the step threshold.
    DragStep,
    /// An edge hint was clicked.
    HintClick,
    /// A step would have left the sequence; the edge panel is re-announced.
    PanelClamp,
    /// A drag was released short of the threshold.
    DragSnapback,
    /// Pointer capture vanished mid-drag.
    LostPointer,
    /// Programmatic or debug-console navigation.
    Console,
    /// Restoring the last-known panel on load.
    Restore,
}

impl NavReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::WheelStep => "wheel-step",
            Self::DragStep => "drag-step",
            Self::HintClick => "hint-click",
            Self::PanelClamp => "panel-clamp",
            Self::DragSnapback => "drag-snapback",
            Self::LostPointer => "lost-pointer",
            Self::Console => "console",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for NavReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of the current panel. Gesture interpreters and hint controls funnel
/// every navigation decision through this trait.
///
/// `set_panel` must accept the already-current panel and still notify; that
/// is how snapback and bounce feedback reach renderers.
pub trait PanelNavigator {
    /// Currently showing panel.
    fn current(&self) -> Panel;

    /// Show `panel` and notify observers with `reason`.
    fn set_panel(&mut self, panel: Panel, reason: NavReason, now: Instant);

    /// Move `delta` panels along the sequence, clamping at either end.
    ///
    /// Returns the panel showing afterwards.
    fn step(&mut self, delta: isize, reason: NavReason, now: Instant) -> Panel {
        let current = self.current();
        let next = Panel::from_index_clamped((current.index() as isize).saturating_add(delta));
        if next != current {
            self.set_panel(next, reason, now);
        } else {
            self.set_panel(current, NavReason::PanelClamp, now);
        }
        next
    }
}
