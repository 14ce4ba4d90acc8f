#![forbid(unsafe_code)]

//! Host-side description of where an input event originated.
//!
//! Hosts translate their element tree into an [`ElementPath`]: the chain of
//! [`Element`]s from the event target up to the root. The scroll guard and
//! the interactive-control check both walk this path nearest-first.

use bitflags::bitflags;

bitflags! {
    /// Explicit opt-in/opt-out markers on an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u8 {
        const NONE             = 0b000;
        /// Inner scroll region that should consume gestures while it can scroll.
        const SCROLL_GUARD     = 0b001;
        /// Never start a panel drag from this element or its descendants.
        const NO_PANEL_DRAG    = 0b010;
        /// Carries an accessible control role (e.g. `role="button"`).
        const LABELLED_CONTROL = 0b100;
    }
}

/// Broad element category, as far as gesture handling cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    #[default]
    Generic,
    Button,
    Link,
    Input,
    Select,
    TextArea,
    Label,
}

impl ElementKind {
    /// Native controls that own their own click and focus behavior.
    #[must_use]
    pub const fn is_control(self) -> bool {
        !matches!(self, Self::Generic)
    }
}

/// Scroll extents of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

impl ScrollMetrics {
    /// Vertical-only metrics.
    #[must_use]
    pub const fn vertical(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
            scroll_left: 0.0,
            scroll_width: 0.0,
            client_width: 0.0,
        }
    }

    #[must_use]
    pub const fn with_horizontal(mut self, scroll_width: f64, client_width: f64) -> Self {
        self.scroll_width = scroll_width;
        self.client_width = client_width;
        self
    }

    /// Largest reachable `scroll_top`.
    #[must_use]
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    #[must_use]
    pub fn overflows_x(&self) -> bool {
        self.scroll_width > self.client_width
    }

    #[must_use]
    pub fn overflows_y(&self) -> bool {
        self.scroll_height > self.client_height
    }
}

/// One element on the path from an event target to the root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub kind: ElementKind,
    pub flags: ElementFlags,
    pub class_names: Vec<String>,
    pub metrics: ScrollMetrics,
}

impl Element {
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Plain container.
    #[must_use]
    pub fn generic() -> Self {
        Self::new(ElementKind::Generic)
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_names.push(class_name.into());
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: ScrollMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_names.iter().any(|c| c == class_name)
    }

    /// Whether pressing on this element should keep its native behavior.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.kind.is_control()
            || self
                .flags
                .intersects(ElementFlags::NO_PANEL_DRAG | ElementFlags::LABELLED_CONTROL)
    }
}

/// Chain of elements from the event target (index 0) to the root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementPath {
    elements: Vec<Element>,
}

impl ElementPath {
    /// Path with the target first and the root last.
    #[must_use]
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Event originated outside any described element (e.g. the window).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<&Element> {
        self.elements.first()
    }

    /// Nearest element (target included) satisfying `predicate`.
    #[must_use]
    pub fn closest(&self, predicate: impl Fn(&Element) -> bool) -> Option<&Element> {
        self.elements.iter().find(|element| predicate(element))
    }

    /// Whether the target or any ancestor is an interactive control.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.closest(Element::is_interactive).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<Element> for ElementPath {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_scroll_top_never_negative() {
        assert_eq!(ScrollMetrics::vertical(0.0, 100.0, 300.0).max_scroll_top(), 0.0);
        assert_eq!(ScrollMetrics::vertical(0.0, 500.0, 300.0).max_scroll_top(), 200.0);
    }

    #[test]
    fn controls_and_opt_outs_are_interactive() {
        assert!(Element::new(ElementKind::Button).is_interactive());
        assert!(Element::new(ElementKind::Link).is_interactive());
        assert!(Element::generic()
            .with_flags(ElementFlags::NO_PANEL_DRAG)
            .is_interactive());
        assert!(Element::generic()
            .with_flags(ElementFlags::LABELLED_CONTROL)
            .is_interactive());
        assert!(!Element::generic()
            .with_flags(ElementFlags::SCROLL_GUARD)
            .is_interactive());
    }

    #[test]
    fn interactive_ancestor_counts() {
        let path: ElementPath = [
            Element::generic().with_class("icon"),
            Element::new(ElementKind::Button),
            Element::generic(),
        ]
        .into_iter()
        .collect();
        assert!(path.is_interactive());
        assert!(!ElementPath::empty().is_interactive());
    }

    #[test]
    fn closest_is_nearest_first() {
        let path = ElementPath::new(vec![
            Element::generic().with_class("row"),
            Element::generic().with_class("list"),
            Element::generic().with_class("list"),
        ]);
        let found = path.closest(|e| e.has_class("list"));
        assert!(std::ptr::eq(found.unwrap(), &path.elements[1]));
    }
}
