#![forbid(unsafe_code)]

//! Panel state store with change notification.
//!
//! # Design
//!
//! [`PanelStore`] is an explicitly constructed context object: the render
//! layer, both gesture interpreters, and the edge hint controller each hold a
//! clone of the same handle. State lives in shared `Rc<RefCell<..>>` storage.
//! Unlike a value-diffing observable, every `set_panel` notifies, including
//! re-announcing the current panel; snapback and bounce feedback depend on it.
//!
//! # Invariants
//!
//! 1. The current panel is always a member of [`Panel::ALL`].
//! 2. `version` increments by exactly 1 per notification.
//! 3. Subscribers are notified synchronously, in registration order.
//! 4. No borrow is held while callbacks run, so subscribers may navigate
//!    re-entrantly.
//! 5. Dropped [`PanelSubscription`] guards are never called again; their
//!    entries are pruned lazily on the next notification.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use snapdeck_core::{NavReason, Panel, PanelNavigator};
use tracing::debug;
use web_time::Instant;

type CallbackRc = Rc<dyn Fn(&PanelChange)>;
type CallbackWeak = Weak<dyn Fn(&PanelChange)>;

/// Navigation state visible to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelState {
    pub panel: Panel,
}

/// One notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelChange {
    pub state: PanelState,
    /// Panel showing before this change; equal to `state.panel` on re-announce.
    pub previous: Panel,
    pub reason: NavReason,
    pub at: Instant,
}

impl PanelChange {
    /// Whether the logical panel actually moved.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.previous != self.state.panel
    }
}

struct StoreInner {
    state: PanelState,
    version: u64,
    subscribers: Vec<CallbackWeak>,
}

/// Shared handle to the current panel.
///
/// Cloning creates another handle to the **same** state and subscribers.
#[derive(Clone)]
pub struct PanelStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl std::fmt::Debug for PanelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PanelStore")
            .field("panel", &inner.state.panel)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl Default for PanelStore {
    fn default() -> Self {
        Self::new(Panel::DEFAULT)
    }
}

impl PanelStore {
    /// Create a store showing `initial`. No notification is sent.
    #[must_use]
    pub fn new(initial: Panel) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: PanelState { panel: initial },
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.inner.borrow().state
    }

    #[must_use]
    pub fn current(&self) -> Panel {
        self.inner.borrow().state.panel
    }

    /// Number of notifications sent so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Show `panel` and notify every subscriber with `reason`.
    pub fn set_panel(&self, panel: Panel, reason: NavReason, now: Instant) {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            let previous = inner.state.panel;
            inner.state.panel = panel;
            inner.version += 1;
            previous
        };
        debug!(
            panel = panel.id(),
            previous = previous.id(),
            reason = reason.as_str(),
            "panel set"
        );
        self.notify(&PanelChange {
            state: PanelState { panel },
            previous,
            reason,
            at: now,
        });
    }

    /// Show the panel named `id`.
    ///
    /// Unknown identifiers are rejected silently: no state change, no
    /// notification. Returns whether the id was recognized.
    pub fn set_panel_by_id(&self, id: &str, reason: NavReason, now: Instant) -> bool {
        match id.parse::<Panel>() {
            Ok(panel) => {
                self.set_panel(panel, reason, now);
                true
            }
            Err(_) => false,
        }
    }

    /// Move `delta` panels, clamping at the ends (see [`PanelNavigator::step`]).
    pub fn step(&self, delta: isize, reason: NavReason, now: Instant) -> Panel {
        let mut handle = self.clone();
        PanelNavigator::step(&mut handle, delta, reason, now)
    }

    /// Register `callback` for every notification.
    ///
    /// Dropping the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&PanelChange) + 'static) -> PanelSubscription {
        let strong: CallbackRc = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        PanelSubscription {
            _guard: Box::new(strong),
        }
    }

    fn notify(&self, change: &PanelChange) {
        let callbacks: Vec<CallbackRc> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.iter().filter_map(|w| w.upgrade()).collect()
        };
        for callback in &callbacks {
            callback(change);
        }
    }
}

impl PanelNavigator for PanelStore {
    fn current(&self) -> Panel {
        PanelStore::current(self)
    }

    fn set_panel(&mut self, panel: Panel, reason: NavReason, now: Instant) {
        PanelStore::set_panel(self, panel, reason, now);
    }
}

/// RAII guard for a store subscriber.
///
/// Dropping it makes the callback unreachable; the store prunes the dead
/// entry on its next notification.
pub struct PanelSubscription {
    _guard: Box<dyn std::any::Any>,
}

impl PanelSubscription {
    /// Explicitly unsubscribe.
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for PanelSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelSubscription").finish_non_exhaustive()
    }
}
