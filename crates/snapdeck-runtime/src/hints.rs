#![forbid(unsafe_code)]

//! Edge hints: directional affordances toward the previous and next panel.
//!
//! # State Machine
//!
//! Each edge is `{ visible, mode }` with `mode ∈ { Compact, Peek }` and its
//! own expiry timer.
//!
//! - An edge is visible only while the host rendered it and its direction
//!   leads to another panel. Each edge is independent of the other.
//! - Every store notification recomputes visibility and labels and returns
//!   both edges to `Compact`, cancelling pending peek timers.
//! - Notifications whose reason is not [`NavReason::HintClick`] then peek every
//!   visible edge for `peek` (1400ms).
//! - Clicking a visible edge steps the store and peeks for `click_peek` (900ms).
//! - A peek expires back to `Compact`.
//! - First reveal: if the durable seen-flag is absent at construction, a
//!   timer fires after `first_reveal_delay` (420ms), peeks, and writes the flag.
//!   Flag read/write failures are swallowed; the reveal may then repeat.
//!
//! # Failure Modes
//!
//! - The controller must not be borrowed from inside a store callback that it
//!   triggered itself; [`EdgeHintController::click`] releases its own state
//!   before stepping the store for that reason.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use snapdeck_core::timeout::earliest;
use snapdeck_core::{NavReason, Panel, PanelNavigator, Timeout};
use tracing::debug;
use web_time::Instant;

use crate::flags::FlagStore;
use crate::store::{PanelChange, PanelStore, PanelSubscription};

/// Peek duration after an implicit panel change.
pub const HINT_PEEK: Duration = Duration::from_millis(1400);

/// Peek duration after an explicit hint click.
pub const HINT_CLICK_PEEK: Duration = Duration::from_millis(900);

/// Delay before the one-shot first reveal, so layout can settle.
pub const HINT_FIRST_REVEAL_DELAY: Duration = Duration::from_millis(420);

/// Durable key recording that the first reveal happened.
pub const HINT_SEEN_FLAG_KEY: &str = "nomad.edgeHints.peeked.v1";

/// Hint timings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintConfig {
    pub peek: Duration,
    pub click_peek: Duration,
    pub first_reveal_delay: Duration,
    pub seen_flag_key: String,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            peek: HINT_PEEK,
            click_peek: HINT_CLICK_PEEK,
            first_reveal_delay: HINT_FIRST_REVEAL_DELAY,
            seen_flag_key: HINT_SEEN_FLAG_KEY.to_owned(),
        }
    }
}

/// Screen edge a hint sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintEdge {
    /// Points at the previous panel.
    Top,
    /// Points at the next panel.
    Bottom,
}

impl HintEdge {
    pub const BOTH: [HintEdge; 2] = [HintEdge::Top, HintEdge::Bottom];

    /// Step delta a click on this edge requests.
    #[must_use]
    pub const fn direction(self) -> isize {
        match self {
            Self::Top => -1,
            Self::Bottom => 1,
        }
    }

    /// Whether this edge leads anywhere from `panel`.
    #[must_use]
    pub fn leads_somewhere(self, panel: Panel) -> bool {
        match self {
            Self::Top => panel.previous().is_some(),
            Self::Bottom => panel.next().is_some(),
        }
    }

    #[must_use]
    pub const fn label(self, panel: Panel) -> &'static str {
        match self {
            Self::Top => panel.top_hint_label(),
            Self::Bottom => panel.bottom_hint_label(),
        }
    }
}

/// Presentation mode of a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HintMode {
    /// Arrow only; never blocks content.
    #[default]
    Compact,
    /// Full label, briefly.
    Peek,
}

impl HintMode {
    #[must_use]
    pub const fn class_tag(self) -> &'static str {
        match self {
            Self::Compact => "is-compact",
            Self::Peek => "is-peek",
        }
    }
}

/// Snapshot of one edge hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeHintState {
    pub visible: bool,
    pub mode: HintMode,
    pub label: &'static str,
}

#[derive(Debug)]
struct EdgeHint {
    edge: HintEdge,
    /// Whether the host rendered this edge at all.
    mounted: bool,
    visible: bool,
    mode: HintMode,
    label: &'static str,
    expiry: Timeout,
}

impl EdgeHint {
    fn new(edge: HintEdge, mounted: bool, panel: Panel) -> Self {
        let mut hint = Self {
            edge,
            mounted,
            visible: false,
            mode: HintMode::Compact,
            label: "",
            expiry: Timeout::new(),
        };
        hint.sync(panel);
        hint
    }

    fn sync(&mut self, panel: Panel) {
        self.visible = self.mounted && self.edge.leads_somewhere(panel);
        self.label = self.edge.label(panel);
        self.compact();
    }

    fn compact(&mut self) {
        self.mode = HintMode::Compact;
        self.expiry.cancel();
    }

    fn peek(&mut self, now: Instant, duration: Duration) {
        if self.visible {
            self.mode = HintMode::Peek;
            self.expiry.schedule(now, duration);
        } else {
            self.compact();
        }
    }

    fn snapshot(&self) -> EdgeHintState {
        EdgeHintState {
            visible: self.visible,
            mode: self.mode,
            label: self.label,
        }
    }
}

struct HintState {
    config: HintConfig,
    top: EdgeHint,
    bottom: EdgeHint,
    first_reveal: Timeout,
    flags: Box<dyn FlagStore>,
}

impl HintState {
    fn edge(&self, edge: HintEdge) -> &EdgeHint {
        match edge {
            HintEdge::Top => &self.top,
            HintEdge::Bottom => &self.bottom,
        }
    }

    fn edges_mut(&mut self) -> [&mut EdgeHint; 2] {
        [&mut self.top, &mut self.bottom]
    }

    fn peek_all(&mut self, now: Instant, duration: Duration) {
        for hint in self.edges_mut() {
            hint.peek(now, duration);
        }
        debug!(
            duration_ms = duration.as_millis() as u64,
            top = self.top.visible,
            bottom = self.bottom.visible,
            "edge hints peek"
        );
    }

    fn on_panel_change(&mut self, change: &PanelChange) {
        let panel = change.state.panel;
        for hint in self.edges_mut() {
            hint.sync(panel);
        }
        if change.reason != NavReason::HintClick {
            let peek = self.config.peek;
            self.peek_all(change.at, peek);
        }
    }

    fn mark_seen(&mut self) {
        if let Err(error) = self.flags.set(&self.config.seen_flag_key, "1") {
            debug!(%error, key = %self.config.seen_flag_key, "edge hint seen-flag write failed");
        }
    }

    fn cancel_timers(&mut self) {
        self.first_reveal.cancel();
        for hint in self.edges_mut() {
            hint.expiry.cancel();
        }
    }
}

/// Which edges the host rendered. Missing edges stay hidden; the other
/// edge works on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintEdges {
    pub top: bool,
    pub bottom: bool,
}

impl HintEdges {
    pub const BOTH: Self = Self {
        top: true,
        bottom: true,
    };

    #[must_use]
    pub const fn any(self) -> bool {
        self.top || self.bottom
    }
}

/// Compact/peek edge hint controller subscribed to a [`PanelStore`].
pub struct EdgeHintController {
    state: Rc<RefCell<HintState>>,
    subscription: Option<PanelSubscription>,
}

impl std::fmt::Debug for EdgeHintController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EdgeHintController")
            .field("top", &state.top.snapshot())
            .field("bottom", &state.bottom.snapshot())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

impl EdgeHintController {
    /// Subscribe to `store` and arm the first reveal if `flags` has no
    /// record of it.
    pub fn new(
        store: &PanelStore,
        config: HintConfig,
        flags: Box<dyn FlagStore>,
        now: Instant,
    ) -> Self {
        Self::with_edges(store, config, flags, HintEdges::BOTH, now)
    }

    /// Like [`EdgeHintController::new`], for a host that rendered only
    /// some of the edges.
    pub fn with_edges(
        store: &PanelStore,
        config: HintConfig,
        flags: Box<dyn FlagStore>,
        edges: HintEdges,
        now: Instant,
    ) -> Self {
        let panel = store.current();
        let mut first_reveal = Timeout::new();
        let seen = match flags.get(&config.seen_flag_key) {
            Ok(value) => value.is_some(),
            Err(error) => {
                debug!(%error, key = %config.seen_flag_key, "edge hint seen-flag read failed");
                false
            }
        };
        if !seen {
            first_reveal.schedule(now, config.first_reveal_delay);
        }

        let state = Rc::new(RefCell::new(HintState {
            top: EdgeHint::new(HintEdge::Top, edges.top, panel),
            bottom: EdgeHint::new(HintEdge::Bottom, edges.bottom, panel),
            first_reveal,
            config,
            flags,
        }));
        let sink = Rc::clone(&state);
        let subscription = store.subscribe(move |change| {
            sink.borrow_mut().on_panel_change(change);
        });
        Self {
            state,
            subscription: Some(subscription),
        }
    }

    /// Snapshot of one edge.
    #[must_use]
    pub fn hint(&self, edge: HintEdge) -> EdgeHintState {
        self.state.borrow().edge(edge).snapshot()
    }

    /// Snapshots of `[top, bottom]`.
    #[must_use]
    pub fn hints(&self) -> [EdgeHintState; 2] {
        HintEdge::BOTH.map(|edge| self.hint(edge))
    }

    /// Whether the first reveal is still pending.
    #[must_use]
    pub fn first_reveal_pending(&self) -> bool {
        self.state.borrow().first_reveal.is_armed()
    }

    /// Peek every visible edge for `duration`.
    pub fn peek(&self, now: Instant, duration: Duration) {
        self.state.borrow_mut().peek_all(now, duration);
    }

    /// Handle a click on `edge`. Hidden edges ignore clicks.
    ///
    /// Returns whether the click navigated.
    pub fn click<N: PanelNavigator>(&self, edge: HintEdge, nav: &mut N, now: Instant) -> bool {
        if !self.state.borrow().edge(edge).visible {
            return false;
        }
        nav.step(edge.direction(), NavReason::HintClick, now);
        let mut state = self.state.borrow_mut();
        let duration = state.config.click_peek;
        state.peek_all(now, duration);
        true
    }

    /// Fire due timers.
    pub fn tick(&self, now: Instant) {
        let mut state = self.state.borrow_mut();
        for hint in state.edges_mut() {
            if hint.expiry.fire_if_due(now) {
                hint.mode = HintMode::Compact;
            }
        }
        if state.first_reveal.fire_if_due(now) {
            let duration = state.config.peek;
            state.peek_all(now, duration);
            state.mark_seen();
        }
    }

    /// Earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let state = self.state.borrow();
        earliest([
            state.top.expiry.deadline(),
            state.bottom.expiry.deadline(),
            state.first_reveal.deadline(),
        ])
    }

    /// Unsubscribe and cancel every timer. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            self.state.borrow_mut().cancel_timers();
        }
    }
}

impl Drop for EdgeHintController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{FlagStoreError, MemoryFlagStore};

    const MS_1: Duration = Duration::from_millis(1);

    struct BrokenFlags;

    impl FlagStore for BrokenFlags {
        fn get(&self, _key: &str) -> Result<Option<String>, FlagStoreError> {
            Err(std::io::Error::other("storage disabled").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), FlagStoreError> {
            Err(std::io::Error::other("storage disabled").into())
        }
    }

    fn seen_flags() -> Box<dyn FlagStore> {
        let mut flags = MemoryFlagStore::new();
        flags.set(HINT_SEEN_FLAG_KEY, "1").unwrap();
        Box::new(flags)
    }

    fn controller(store: &PanelStore, now: Instant) -> EdgeHintController {
        EdgeHintController::new(store, HintConfig::default(), seen_flags(), now)
    }

    #[test]
    fn visibility_follows_boundaries() {
        let t = Instant::now();
        let store = PanelStore::new(Panel::Tasks);
        let hints = controller(&store, t);
        assert!(!hints.hint(HintEdge::Top).visible);
        assert!(hints.hint(HintEdge::Bottom).visible);

        store.set_panel(Panel::Summon, NavReason::Console, t);
        assert!(hints.hint(HintEdge::Top).visible);
        assert!(!hints.hint(HintEdge::Bottom).visible);

        store.set_panel(Panel::Log, NavReason::Console, t);
        assert!(hints.hint(HintEdge::Top).visible);
        assert!(hints.hint(HintEdge::Bottom).visible);
    }

    #[test]
    fn labels_follow_destination() {
        let t = Instant::now();
        let store = PanelStore::new(Panel::Log);
        let hints = controller(&store, t);
        assert_eq!(hints.hint(HintEdge::Top).label, "↑ Daily tasks");
        assert_eq!(hints.hint(HintEdge::Bottom).label, "↓ Summon gate");

        store.set_panel(Panel::Summon, NavReason::WheelStep, t);
        assert_eq!(hints.hint(HintEdge::Top).label, "↑ Class log");
    }

    #[test]
    fn implicit_change_peeks_then_compacts() {
        let t = Instant::now();
        let store = PanelStore::new(Panel::Log);
        let hints = controller(&store, t);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Compact);

        store.set_panel(Panel::Log, NavReason::WheelStep, t);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Peek);
        assert_eq!(hints.hint(HintEdge::Bottom).mode, HintMode::Peek);
        assert_eq!(hints.next_deadline(), Some(t + HINT_PEEK));

        hints.tick(t + HINT_PEEK - MS_1);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Peek);
        hints.tick(t + HINT_PEEK);
        assert_eq!(hints.hints().map(|h| h.mode), [HintMode::Compact; 2]);
        assert_eq!(hints.next_deadline(), None);
    }

    #[test]
    fn hidden_edge_never_peeks() {
        let t = Instant::now();
        let store = PanelStore::new(Panel::Log);
        let hints = controller(&store, t);
        store.set_panel(Panel::Tasks, NavReason::DragStep, t);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Compact);
        assert_eq!(hints.hint(HintEdge::Bottom).mode, HintMode::Peek);
    }

    #[test]
    fn new_change_replaces_pending_peek() {
        let t = Instant::now();
        let store = PanelStore::new(Panel::Log);
        let hints = controller(&store, t);
        store.set_panel(Panel::Log, NavReason::WheelStep, t);
        let later = t + Duration::from_millis(1000);
        store.set_panel(Panel::Log, NavReason::DragSnapback, later);

        hints.tick(t + HINT_PEEK);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Peek);
        hints.tick(later + HINT_PEEK);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Compact);
    }

    #[test]
    fn click_steps_and_peeks_briefly() {
        let t = Instant::now();
        let mut store = PanelStore::new(Panel::Log);
        let hints = controller(&store, t);

        assert!(hints.click(HintEdge::Bottom, &mut store, t));
        assert_eq!(store.current(), Panel::Summon);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Peek);
        assert!(!hints.hint(HintEdge::Bottom).visible);
        assert_eq!(hints.next_deadline(), Some(t + HINT_CLICK_PEEK));

        hints.tick(t + HINT_CLICK_PEEK);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Compact);
    }

    #[test]
    fn click_on_hidden_edge_is_ignored() {
        let t = Instant::now();
        let mut store = PanelStore::new(Panel::Tasks);
        let hints = controller(&store, t);
        assert!(!hints.click(HintEdge::Top, &mut store, t));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn hint_click_reason_does_not_peek() {
        let t = Instant::now();
        let store = PanelStore::new(Panel::Log);
        let hints = controller(&store, t);
        store.set_panel(Panel::Tasks, NavReason::HintClick, t);
        assert_eq!(hints.hint(HintEdge::Bottom).mode, HintMode::Compact);
        assert_eq!(hints.next_deadline(), None);
    }

    #[test]
    fn first_reveal_fires_once_and_records_flag() {
        let t = Instant::now();
        let store = PanelStore::new(Panel::Log);
        let hints =
            EdgeHintController::new(&store, HintConfig::default(), Box::new(MemoryFlagStore::new()), t);
        assert!(hints.first_reveal_pending());
        assert_eq!(hints.next_deadline(), Some(t + HINT_FIRST_REVEAL_DELAY));

        hints.tick(t + HINT_FIRST_REVEAL_DELAY - MS_1);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Compact);

        let revealed = t + HINT_FIRST_REVEAL_DELAY;
        hints.tick(revealed);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Peek);
        assert!(!hints.first_reveal_pending());
        assert_eq!(hints.next_deadline(), Some(revealed + HINT_PEEK));

        let state = hints.state.borrow();
        assert_eq!(
            state.flags.get(HINT_SEEN_FLAG_KEY).unwrap().as_deref(),
            Some("1")
        );
    }

    #[test]
    fn seen_flag_suppresses_first_reveal() {
        let hints = controller(&PanelStore::default(), Instant::now());
        assert!(!hints.first_reveal_pending());
    }

    #[test]
    fn flag_failures_degrade_to_not_seen() {
        let t = Instant::now();
        let store = PanelStore::default();
        let hints = EdgeHintController::new(&store, HintConfig::default(), Box::new(BrokenFlags), t);
        assert!(hints.first_reveal_pending());
        hints.tick(t + HINT_FIRST_REVEAL_DELAY);
        assert_eq!(hints.hint(HintEdge::Top).mode, HintMode::Peek);
    }

    #[test]
    fn dispose_unsubscribes_and_cancels_timers() {
        let t = Instant::now();
        let store = PanelStore::new(Panel::Log);
        let mut hints =
            EdgeHintController::new(&store, HintConfig::default(), Box::new(MemoryFlagStore::new()), t);
        store.set_panel(Panel::Log, NavReason::WheelStep, t);
        hints.dispose();
        assert_eq!(hints.next_deadline(), None);

        store.set_panel(Panel::Tasks, NavReason::WheelStep, t);
        assert!(hints.hint(HintEdge::Top).visible);
        assert_eq!(store.subscriber_count(), 0);
        hints.dispose();
    }

    #[test]
    fn missing_edge_stays_hidden_while_the_other_peeks() {
        let t = Instant::now();
        let mut store = PanelStore::new(Panel::Log);
        let edges = HintEdges {
            top: false,
            bottom: true,
        };
        let hints =
            EdgeHintController::with_edges(&store, HintConfig::default(), seen_flags(), edges, t);
        store.set_panel(Panel::Log, NavReason::Init, t);

        let [top, bottom] = hints.hints();
        assert!(!top.visible);
        assert_eq!(top.mode, HintMode::Compact);
        assert!(bottom.visible);
        assert_eq!(bottom.mode, HintMode::Peek);
        assert_eq!(bottom.label, "↓ Summon gate");

        assert!(!hints.click(HintEdge::Top, &mut store, t));
        assert_eq!(store.current(), Panel::Log);
        assert!(hints.click(HintEdge::Bottom, &mut store, t));
        assert_eq!(store.current(), Panel::Summon);
    }

    #[test]
    fn drop_releases_subscription() {
        let store = PanelStore::default();
        let hints = controller(&store, Instant::now());
        drop(hints);
        store.set_panel(Panel::Tasks, NavReason::Console, Instant::now());
        assert_eq!(store.subscriber_count(), 0);
    }
}
