//! Regex-based HTML sanitizer.

use regex::Regex;

use super::Sanitizer;

/// Sanitizer that applies a series of regex find-and-replace rules.
///
/// Rules are applied in order; each rule operates on the output of the
/// previous one.
///
/// # Example
///
/// ```
/// use wp_content::{RegexSanitizer, Sanitizer};
///
/// let sanitizer = RegexSanitizer::new(vec![(r"(?i)<br\s*/?>", " ")]);
/// assert_eq!(sanitizer.sanitize("a<br/>b<BR>c"), "a b c");
/// ```
pub struct RegexSanitizer {
    rules: Vec<(Regex, String)>,
}

impl RegexSanitizer {
    /// Create a new `RegexSanitizer` from a list of `(pattern, replacement)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if any regex pattern is invalid. Use [`try_new`](Self::try_new)
    /// for a fallible alternative.
    pub fn new(rules: Vec<(&str, &str)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| {
                (
                    Regex::new(pattern).expect("invalid regex pattern"),
                    replacement.to_string(),
                )
            })
            .collect();
        Self { rules }
    }

    /// Fallible constructor that returns a [`regex::Error`] for invalid patterns.
    pub fn try_new(rules: Vec<(&str, &str)>) -> Result<Self, regex::Error> {
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Ok((Regex::new(pattern)?, replacement.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Rules removing inline `style` and `color` attributes, so that the
    /// site stylesheet decides presentation.
    pub fn presentational() -> Self {
        Self::new(vec![
            (r#"(?i)\s+style=(?:"[^"]*"|'[^']*')"#, ""),
            (r#"(?i)\s+color=(?:"[^"]*"|'[^']*')"#, ""),
        ])
    }
}

impl Sanitizer for RegexSanitizer {
    fn sanitize(&self, html: &str) -> String {
        self.rules
            .iter()
            .fold(html.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }
}
