//! Validator configuration

use serde::{Deserialize, Serialize};

/// Default limit on nested model depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// How blank strings are treated when a field is resolved
    pub blank_strings: BlankStrings,

    /// Maximum nesting depth of nested models; the top-level model is depth 0
    pub max_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            blank_strings: BlankStrings::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidatorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn with_blank_strings(mut self, blank_strings: BlankStrings) -> Self {
        self.blank_strings = blank_strings;
        self
    }

    /// Reads a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Treatment of strings that are empty after trimming
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankStrings {
    /// A blank string counts as a missing value
    #[default]
    Absent,
    /// A blank string is passed to the constraint chain as-is
    Present,
}
