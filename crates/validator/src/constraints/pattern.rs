//! Regular expression constraint

use crate::foundation::FieldError;

crate::constraint! {
    /// Rejects strings that do not match `regex`.
    ///
    /// The pattern is not anchored implicitly; use `^...$` to match the
    /// whole input.
    pub Matches { regex: regex::Regex } for str;
    rule(self, input) { self.regex.is_match(input) }
    error(self, input) {
        FieldError::new("matches", "Must match the pattern `{pattern}`.")
            .with_param("pattern", self.regex.as_str().to_owned())
    }
    new(pattern: &str) -> regex::Error {
        Ok(Self {
            regex: regex::Regex::new(pattern)?,
        })
    }
    fn matches(pattern: &str) -> regex::Error;
}

impl From<regex::Regex> for Matches {
    fn from(regex: regex::Regex) -> Self {
        Self { regex }
    }
}
