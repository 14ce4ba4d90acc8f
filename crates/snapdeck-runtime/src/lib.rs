#![forbid(unsafe_code)]

//! Runtime: panel store, edge hints, configuration, and the navigation facade.
//!
//! # Role in snapdeck
//! `snapdeck-runtime` wires the interpreters from `snapdeck-core` to shared
//! state. The [`PanelStore`] is the single source of truth for the showing
//! panel; everything else either writes to it through
//! [`snapdeck_core::PanelNavigator`] or subscribes to it.
//!
//! # Primary responsibilities
//! - **PanelStore**: owned, cloneable state handle with RAII subscriptions.
//! - **EdgeHintController**: compact/peek hints with a one-shot first reveal.
//! - **FlagStore**: durable "already happened" markers.
//! - **NavConfig**: TOML/JSON tuning with validation.
//! - **NavigationController**: mounts everything and degrades to inert.
//! - **describe**: pure state-to-frame mapping for renderers.

pub mod config;
pub mod controller;
pub mod flags;
pub mod hints;
pub mod store;
pub mod view;

pub use config::{ConfigError, DragPolicy, GuardPolicy, HintPolicy, NavConfig, WheelPolicy};
pub use controller::{HostRoots, MountError, NavigationController};
pub use flags::{FileFlagStore, FlagStore, FlagStoreError, MemoryFlagStore};
pub use hints::{EdgeHintController, EdgeHintState, HintConfig, HintEdge, HintEdges, HintMode};
pub use store::{PanelChange, PanelState, PanelStore, PanelSubscription};
pub use view::{HintView, PanelFrame, describe};
