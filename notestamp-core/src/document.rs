//! Display elements and the document that holds them.
//!
//! A [`Document`] is a flat list of [`Element`]s, each with text content and
//! string attributes, mirroring the server-rendered note cards the refresh
//! pass operates on. Documents round-trip through JSON:
//!
//! ```json
//! {"elements": [{"id": "note-7-time", "text": "", "attributes": {"iso": "2024-01-01T09:30:00"}}]}
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Whether a tooltip has been attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipState {
    /// Never touched by a refresh pass
    #[default]
    Detached,
    /// Showing a relative label with a tooltip
    Attached,
    /// Showing the absolute timestamp; never reprocessed
    Terminal,
}

/// A single display element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "is_detached")]
    tooltip: TooltipState,
}

fn is_detached(state: &TooltipState) -> bool {
    *state == TooltipState::Detached
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            attributes: BTreeMap::new(),
            tooltip: TooltipState::Detached,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn tooltip_state(&self) -> TooltipState {
        self.tooltip
    }

    pub fn set_tooltip_state(&mut self, state: TooltipState) {
        self.tooltip = state;
    }
}

/// An ordered collection of display elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject an element. Run another refresh pass afterwards to label it.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements currently carrying the attribute `name`.
    pub fn elements_with_attr_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.elements.iter_mut().filter(move |e| e.has_attr(name))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let doc = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), elements = doc.len(), "Loaded document");
        Ok(doc)
    }

    /// Write the document to disk as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
