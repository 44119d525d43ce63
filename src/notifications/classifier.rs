//! Maps raw error text to a message fit for end users.
//!
//! Rules are evaluated in order and the first match wins. Matching is a
//! case-insensitive substring test, so this is a heuristic: an unrelated error
//! that happens to mention "fetch" gets the connectivity message.
//!
//! Case is ignored, so "401 Unauthorized" and "Network unreachable" match the
//! lowercase keywords. Browser-side guards that use a plain `includes` check
//! would send both to the fallback message instead.

pub const NETWORK_MESSAGE: &str = "Network connection issue. Please check your internet connection.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";
pub const PERMISSION_MESSAGE: &str = "Permission denied. Please check your access rights.";
pub const NOT_FOUND_MESSAGE: &str = "Requested resource not found.";
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// One classification rule.
#[derive(Debug, Clone)]
pub struct Rule {
    needles: Vec<String>,
    message: String,
}

impl Rule {
    /// A rule matching when any of `needles` occurs in the error text.
    pub fn new(needles: &[&str], message: &str) -> Self {
        Self {
            needles: needles.iter().map(|n| n.to_lowercase()).collect(),
            message: message.to_string(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.needles.iter().any(|n| lowered.contains(n.as_str()))
    }
}

/// Ordered rule list with a fallback.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
    fallback: String,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>, fallback: &str) -> Self {
        Self {
            rules,
            fallback: fallback.to_string(),
        }
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn classify(&self, error_text: &str) -> &str {
        let lowered = error_text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.message.as_str())
            .unwrap_or(&self.fallback)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(
            vec![
                Rule::new(&["network", "fetch"], NETWORK_MESSAGE),
                Rule::new(&["timeout"], TIMEOUT_MESSAGE),
                Rule::new(&["permission", "unauthorized"], PERMISSION_MESSAGE),
                Rule::new(&["not found", "404"], NOT_FOUND_MESSAGE),
            ],
            FALLBACK_MESSAGE,
        )
    }
}
