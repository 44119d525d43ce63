//! Heuristic checks for newly inserted page elements.
//!
//! # Responsibilities
//! - Flag images without a source
//! - Flag links with neither a destination nor a click handler
//! - Flag required fields that are empty
//!
//! # Design Decisions
//! - Warnings only; nothing here touches the error log or breakers
//! - The host decides which inserted nodes to hand over

use std::collections::HashMap;
use std::fmt;

/// The parts of an element the checks look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Upper-case tag name, e.g. `IMG`.
    pub tag: String,
    pub attributes: HashMap<String, String>,
    /// Current value for form controls.
    pub value: Option<String>,
    pub has_click_handler: bool,
}

impl ElementSnapshot {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_uppercase(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_click_handler(mut self) -> Self {
        self.has_click_handler = true;
        self
    }

    fn non_empty_attr(&self, name: &str) -> bool {
        self.attributes.get(name).is_some_and(|v| !v.is_empty())
    }
}

/// A problem found on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementWarning {
    ImageWithoutSource,
    LinkWithoutTarget,
    RequiredWithoutValue,
}

impl fmt::Display for ElementWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ElementWarning::ImageWithoutSource => "Image element without src found",
            ElementWarning::LinkWithoutTarget => "Link element without href or onclick found",
            ElementWarning::RequiredWithoutValue => "Required element without value found",
        };
        f.write_str(text)
    }
}

/// Run every check against `element` and log what was found.
pub fn check_element(element: &ElementSnapshot) -> Vec<ElementWarning> {
    let mut warnings = Vec::new();

    if element.tag == "IMG" && !element.non_empty_attr("src") {
        warnings.push(ElementWarning::ImageWithoutSource);
    }

    if element.tag == "A" && !element.non_empty_attr("href") && !element.has_click_handler {
        warnings.push(ElementWarning::LinkWithoutTarget);
    }

    if element.attributes.contains_key("required")
        && element.value.as_deref().map_or(true, str::is_empty)
    {
        warnings.push(ElementWarning::RequiredWithoutValue);
    }

    for warning in &warnings {
        tracing::warn!(tag = %element.tag, "{}", warning);
    }
    warnings
}
