//! Refresh pass over timestamped display elements.
//!
//! Each pass visits every element carrying the marker attribute and either
//! updates its relative label or terminalizes it into the absolute
//! timestamp. Terminalized and invalid elements lose the marker, so later
//! passes never see them again.
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use notestamp_core::document::{Document, Element};
//! use notestamp_core::refresh::{refresh, RefreshOptions};
//! use notestamp_core::tooltip::TooltipRegistry;
//!
//! let now = Utc::now();
//! let sent = (now - Duration::minutes(75)).to_rfc3339();
//!
//! let mut doc = Document::new();
//! doc.push(Element::new("note-1-time").with_attr("iso", sent));
//!
//! let mut tooltips = TooltipRegistry::new();
//! refresh(&mut doc, &mut tooltips, now, &RefreshOptions::default());
//!
//! assert_eq!(doc.get("note-1-time").unwrap().text(), "1hr 15min ago");
//! ```

use crate::document::{Document, Element, TooltipState};
use crate::format::{format_absolute, parse_timestamp, time_ago};
use crate::tooltip::{Placement, TooltipHost, TooltipOptions};
use chrono::{DateTime, FixedOffset, Offset, Utc};

pub const DEFAULT_MARKER_ATTRIBUTE: &str = "iso";
pub const DEFAULT_TRIGGER_ATTRIBUTE: &str = "data-bs-toggle";

/// Value written to the trigger attribute once a tooltip is attached
pub const TRIGGER_VALUE: &str = "tooltip";

/// Knobs for a refresh pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Attribute holding the raw timestamp
    pub marker_attribute: String,
    /// Attribute marking an attached tooltip
    pub trigger_attribute: String,
    /// Offset assumed for timestamps written without one
    pub source_offset: FixedOffset,
    /// Offset used to render absolute timestamps
    pub display_offset: FixedOffset,
    /// Where attached tooltips are drawn
    pub tooltip_placement: Placement,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        let utc = Utc.fix();
        Self {
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
            trigger_attribute: DEFAULT_TRIGGER_ATTRIBUTE.to_string(),
            source_offset: utc,
            display_offset: utc,
            tooltip_placement: Placement::Top,
        }
    }
}

/// What a pass did to a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No marker, or already terminal
    Skipped,
    /// Marker removed because the timestamp did not parse
    Invalidated,
    /// Relative label written
    Relabeled { tooltip_attached: bool },
    /// Switched to the absolute timestamp for good
    Terminalized,
}

/// Tally of a refresh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub relabeled: usize,
    pub tooltips_attached: usize,
    pub terminalized: usize,
    pub invalidated: usize,
}

impl RefreshReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Skipped => {}
            Outcome::Invalidated => self.invalidated += 1,
            Outcome::Relabeled { tooltip_attached } => {
                self.relabeled += 1;
                if tooltip_attached {
                    self.tooltips_attached += 1;
                }
            }
            Outcome::Terminalized => self.terminalized += 1,
        }
    }

    /// Number of elements whose state changed in a way that outlives the pass.
    pub fn transitions(&self) -> usize {
        self.tooltips_attached + self.terminalized + self.invalidated
    }
}

/// Run a refresh pass over every marked element of `document`.
pub fn refresh<H: TooltipHost>(
    document: &mut Document,
    tooltips: &mut H,
    now: DateTime<Utc>,
    options: &RefreshOptions,
) -> RefreshReport {
    let mut report = RefreshReport::default();

    for element in document.elements_with_attr_mut(&options.marker_attribute) {
        report.record(refresh_element(element, tooltips, now, options));
    }

    tracing::debug!(
        relabeled = report.relabeled,
        tooltips_attached = report.tooltips_attached,
        terminalized = report.terminalized,
        invalidated = report.invalidated,
        "Refresh pass complete"
    );

    report
}

/// Refresh a single element.
pub fn refresh_element<H: TooltipHost>(
    element: &mut Element,
    tooltips: &mut H,
    now: DateTime<Utc>,
    options: &RefreshOptions,
) -> Outcome {
    if element.tooltip_state() == TooltipState::Terminal {
        return Outcome::Skipped;
    }

    let Some(raw) = element.attr(&options.marker_attribute) else {
        return Outcome::Skipped;
    };

    let Some(ts) = parse_timestamp(raw, options.source_offset) else {
        tracing::debug!(element = %element.id, raw, "Dropping unparseable timestamp");
        element.remove_attr(&options.marker_attribute);
        return Outcome::Invalidated;
    };

    let absolute = format_absolute(&ts, options.display_offset);

    let Some(relative) = time_ago(&ts, now) else {
        tooltips.dispose(&element.id);
        element.set_text(absolute);
        element.remove_attr(&options.marker_attribute);
        element.remove_attr(&options.trigger_attribute);
        element.set_tooltip_state(TooltipState::Terminal);
        tracing::trace!(element = %element.id, "Terminalized timestamp");
        return Outcome::Terminalized;
    };

    element.set_text(relative.to_string());

    if element.tooltip_state() == TooltipState::Attached {
        return Outcome::Relabeled {
            tooltip_attached: false,
        };
    }

    // Markup from an earlier pass already carries a tooltip
    if element.has_attr(&options.trigger_attribute) {
        element.set_tooltip_state(TooltipState::Attached);
        return Outcome::Relabeled {
            tooltip_attached: false,
        };
    }

    element.set_attr(options.trigger_attribute.clone(), TRIGGER_VALUE);
    tooltips.attach(
        &element.id,
        TooltipOptions {
            placement: options.tooltip_placement,
            title: absolute,
        },
    );
    element.set_tooltip_state(TooltipState::Attached);

    Outcome::Relabeled {
        tooltip_attached: true,
    }
}
