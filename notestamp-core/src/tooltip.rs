//! Tooltip collaborator.
//!
//! The refresh pass treats tooltips as an opaque capability: attach once per
//! element, look up, dispose when the element is terminalized.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a tooltip is drawn relative to its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::Bottom => "bottom",
            Placement::Left => "left",
            Placement::Right => "right",
        }
    }
}

/// Options passed when attaching a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipOptions {
    pub placement: Placement,
    pub title: String,
}

/// A tooltip bound to an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub element_id: String,
    pub placement: Placement,
    pub title: String,
}

/// Anything that can attach and dispose tooltips keyed by element id.
pub trait TooltipHost {
    /// Bind a tooltip to `element_id`, replacing any existing one.
    fn attach(&mut self, element_id: &str, options: TooltipOptions);

    /// Tooltip currently bound to `element_id`.
    fn get(&self, element_id: &str) -> Option<&Tooltip>;

    /// Dispose the tooltip bound to `element_id`. Returns whether one existed.
    fn dispose(&mut self, element_id: &str) -> bool;
}

/// In-memory tooltip host.
#[derive(Debug, Default, Serialize)]
pub struct TooltipRegistry {
    tooltips: HashMap<String, Tooltip>,
}

impl TooltipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tooltips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tooltips.is_empty()
    }

    /// Tooltips sorted by element id.
    pub fn tooltips(&self) -> Vec<&Tooltip> {
        let mut all: Vec<_> = self.tooltips.values().collect();
        all.sort_by(|a, b| a.element_id.cmp(&b.element_id));
        all
    }
}

impl TooltipHost for TooltipRegistry {
    fn attach(&mut self, element_id: &str, options: TooltipOptions) {
        tracing::trace!(
            element = element_id,
            placement = options.placement.as_str(),
            "Attaching tooltip"
        );
        self.tooltips.insert(
            element_id.to_string(),
            Tooltip {
                element_id: element_id.to_string(),
                placement: options.placement,
                title: options.title,
            },
        );
    }

    fn get(&self, element_id: &str) -> Option<&Tooltip> {
        self.tooltips.get(element_id)
    }

    fn dispose(&mut self, element_id: &str) -> bool {
        self.tooltips.remove(element_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_and_dispose() {
        let mut registry = TooltipRegistry::new();
        registry.attach(
            "a",
            TooltipOptions {
                placement: Placement::Top,
                title: "Mon, 2024-01-01 09:30:00".to_string(),
            },
        );

        let tip = registry.get("a").unwrap();
        assert_eq!(tip.placement, Placement::Top);
        assert_eq!(tip.title, "Mon, 2024-01-01 09:30:00");

        assert!(registry.dispose("a"));
        assert!(!registry.dispose("a"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_placement_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Placement::Top).unwrap(), "\"top\"");
        let right: Placement = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(right, Placement::Right);
        assert_eq!(Placement::Left.as_str(), "left");
        assert_eq!(Placement::default(), Placement::Top);
    }
}
