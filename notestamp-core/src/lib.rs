//! # notestamp-core
//!
//! Core library for notestamp - "time ago" labels for note cards.
//!
//! This library provides:
//! - Relative time formatting ("Now", "45min ago", "2d 3hr ago")
//! - A document model of timestamped display elements
//! - The refresh pass that labels elements and manages their tooltips
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Lifecycle
//!
//! An element carrying the marker attribute is labelled relatively on every
//! pass and gets a tooltip with the absolute time the first time it is seen.
//! Once a week has passed it is terminalized: the text becomes the absolute
//! timestamp, the tooltip is disposed and the marker is removed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use notestamp_core::{refresh, Config, Document, TooltipRegistry};
//!
//! let config = Config::load().expect("failed to load config");
//! let options = config.timestamps.refresh_options().expect("invalid config");
//!
//! let mut doc = Document::load("notes.json".as_ref()).expect("failed to load document");
//! let mut tooltips = TooltipRegistry::new();
//! refresh(&mut doc, &mut tooltips, chrono::Utc::now(), &options);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use document::{Document, Element, TooltipState};
pub use error::{Error, Result};
pub use format::{format_absolute, parse_timestamp, time_ago, TimeAgo};
pub use refresh::{refresh, RefreshOptions, RefreshReport};
pub use tooltip::{Placement, Tooltip, TooltipHost, TooltipOptions, TooltipRegistry};

// Public modules
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod logging;
pub mod refresh;
pub mod tooltip;
