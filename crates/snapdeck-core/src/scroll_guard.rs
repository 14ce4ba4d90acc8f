#![forbid(unsafe_code)]

//! Scroll-guard resolution: should an inner scroll region consume a gesture?
//!
//! # Rules
//!
//! 1. The guard region is the nearest element on the path carrying
//!    [`ElementFlags::SCROLL_GUARD`] or one of the configured container
//!    class names.
//! 2. No region: not guarded.
//! 3. A region with any horizontal overflow is always guarded, so wide
//!    content can be browsed without switching panels.
//! 4. Otherwise the region is guarded only while it still has room to scroll
//!    in the gesture's direction: up needs `scroll_top > 0`, down needs
//!    `scroll_top < scroll_height - client_height`.
//!
//! Resolution is pure; the wheel and drag interpreters both call it.

use crate::element::{Element, ElementFlags, ElementPath};

/// Container class names guarded without an explicit marker.
pub const DEFAULT_GUARD_CONTAINERS: &[&str] = &["studentsList"];

/// Why a region consumed the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardCause {
    HorizontalOverflow,
    VerticalRoom,
}

/// Outcome of [`ScrollGuard::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Gesture proceeds to panel navigation.
    NotGuarded,
    /// Gesture belongs to the inner scroll region.
    Guarded(GuardCause),
}

impl GuardDecision {
    #[must_use]
    pub const fn is_guarded(self) -> bool {
        matches!(self, Self::Guarded(_))
    }
}

/// Scroll-guard resolver with its container allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollGuard {
    containers: Vec<String>,
}

impl Default for ScrollGuard {
    fn default() -> Self {
        Self::new(DEFAULT_GUARD_CONTAINERS.iter().copied())
    }
}

impl ScrollGuard {
    #[must_use]
    pub fn new<I, S>(containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            containers: containers.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    fn is_region(&self, element: &Element) -> bool {
        element.flags.contains(ElementFlags::SCROLL_GUARD)
            || self.containers.iter().any(|name| element.has_class(name))
    }

    /// Nearest guard region on the path, regardless of scroll room.
    #[must_use]
    pub fn region<'a>(&self, path: &'a ElementPath) -> Option<&'a Element> {
        path.closest(|element| self.is_region(element))
    }

    /// Decide whether a vertical delta `dy` (positive = down) is consumed
    /// by an inner scroll region on `path`.
    #[must_use]
    pub fn resolve(&self, path: &ElementPath, dy: f64) -> GuardDecision {
        let Some(region) = self.region(path) else {
            return GuardDecision::NotGuarded;
        };
        let metrics = region.metrics;
        if metrics.overflows_x() {
            return GuardDecision::Guarded(GuardCause::HorizontalOverflow);
        }
        if !metrics.overflows_y() {
            return GuardDecision::NotGuarded;
        }

        let room = if dy < 0.0 {
            metrics.scroll_top > 0.0
        } else if dy > 0.0 {
            metrics.scroll_top < metrics.max_scroll_top()
        } else {
            false
        };
        if room {
            GuardDecision::Guarded(GuardCause::VerticalRoom)
        } else {
            GuardDecision::NotGuarded
        }
    }
}
