#![forbid(unsafe_code)]

//! Navigation tuning as data.
//!
//! Every gesture constant can be overridden from TOML or JSON at startup.
//! Omitted keys keep their defaults, which equal the interpreter constants in
//! `snapdeck-core`, so `NavConfig::default()` behaves exactly like the
//! hardcoded navigation.
//!
//! ```toml
//! [wheel]
//! threshold = 120.0
//! lock_ms = 600
//!
//! [guard]
//! containers = ["studentsList", "auditLog"]
//! ```
//!
//! Loaders validate after parsing; an out-of-range value is reported as
//! [`ConfigError::Validation`] with every problem found.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use snapdeck_core::drag::{DRAG_EDGE_RESISTANCE, DRAG_RESISTANCE, DRAG_THRESHOLD_RATIO};
use snapdeck_core::scroll_guard::DEFAULT_GUARD_CONTAINERS;
use snapdeck_core::wheel::{WHEEL_LOCK, WHEEL_STEP_THRESHOLD};
use snapdeck_core::{DragConfig, ScrollGuard, WheelConfig};
use thiserror::Error;

use crate::hints::{
    HINT_CLICK_PEEK, HINT_FIRST_REVEAL_DELAY, HINT_PEEK, HINT_SEEN_FLAG_KEY, HintConfig,
};

/// Errors that can occur when loading a navigation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Top-level navigation configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub wheel: WheelPolicy,
    pub drag: DragPolicy,
    pub hints: HintPolicy,
    pub guard: GuardPolicy,
}

/// Wheel debouncing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelPolicy {
    pub threshold: f64,
    pub lock_ms: u64,
}

impl Default for WheelPolicy {
    fn default() -> Self {
        Self {
            threshold: WHEEL_STEP_THRESHOLD,
            lock_ms: WHEEL_LOCK.as_millis() as u64,
        }
    }
}

/// Drag physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragPolicy {
    pub resistance: f64,
    pub edge_resistance: f64,
    pub threshold_ratio: f64,
}

impl Default for DragPolicy {
    fn default() -> Self {
        Self {
            resistance: DRAG_RESISTANCE,
            edge_resistance: DRAG_EDGE_RESISTANCE,
            threshold_ratio: DRAG_THRESHOLD_RATIO,
        }
    }
}

/// Edge hint timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintPolicy {
    pub peek_ms: u64,
    pub click_peek_ms: u64,
    pub first_reveal_delay_ms: u64,
    pub seen_flag_key: String,
}

impl Default for HintPolicy {
    fn default() -> Self {
        Self {
            peek_ms: HINT_PEEK.as_millis() as u64,
            click_peek_ms: HINT_CLICK_PEEK.as_millis() as u64,
            first_reveal_delay_ms: HINT_FIRST_REVEAL_DELAY.as_millis() as u64,
            seen_flag_key: HINT_SEEN_FLAG_KEY.to_owned(),
        }
    }
}

/// Scroll-guard container allow-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardPolicy {
    pub containers: Vec<String>,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            containers: DEFAULT_GUARD_CONTAINERS
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
        }
    }
}

impl NavConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.wheel.threshold.is_finite() && self.wheel.threshold > 0.0) {
            errors.push(format!(
                "wheel.threshold must be > 0, got {}",
                self.wheel.threshold
            ));
        }

        for (name, value) in [
            ("drag.resistance", self.drag.resistance),
            ("drag.edge_resistance", self.drag.edge_resistance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(format!("{name} must be >= 0, got {value}"));
            }
        }

        if !(self.drag.threshold_ratio > 0.0 && self.drag.threshold_ratio < 1.0) {
            errors.push(format!(
                "drag.threshold_ratio must be in (0, 1), got {}",
                self.drag.threshold_ratio
            ));
        }

        if self.hints.peek_ms == 0 {
            errors.push("hints.peek_ms must be > 0".into());
        }
        if self.hints.click_peek_ms == 0 {
            errors.push("hints.click_peek_ms must be > 0".into());
        }
        if self.hints.seen_flag_key.trim().is_empty() {
            errors.push("hints.seen_flag_key must not be empty".into());
        }

        if self.guard.containers.iter().any(|c| c.trim().is_empty()) {
            errors.push("guard.containers must not contain empty names".into());
        }

        errors
    }

    #[must_use]
    pub fn to_wheel_config(&self) -> WheelConfig {
        WheelConfig {
            threshold: self.wheel.threshold,
            lock: Duration::from_millis(self.wheel.lock_ms),
        }
    }

    #[must_use]
    pub fn to_drag_config(&self) -> DragConfig {
        DragConfig {
            resistance: self.drag.resistance,
            edge_resistance: self.drag.edge_resistance,
            threshold_ratio: self.drag.threshold_ratio,
        }
    }

    #[must_use]
    pub fn to_hint_config(&self) -> HintConfig {
        HintConfig {
            peek: Duration::from_millis(self.hints.peek_ms),
            click_peek: Duration::from_millis(self.hints.click_peek_ms),
            first_reveal_delay: Duration::from_millis(self.hints.first_reveal_delay_ms),
            seen_flag_key: self.hints.seen_flag_key.clone(),
        }
    }

    #[must_use]
    pub fn to_scroll_guard(&self) -> ScrollGuard {
        ScrollGuard::new(self.guard.containers.iter().cloned())
    }
}
