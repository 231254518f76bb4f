//! Removal of scripts and inline event handlers.

use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Element;

use super::Sanitizer;
use super::dom::{self, Edits};

/// A script start tag and everything up to its end tag, or to the end of the
/// text when it is never closed.
static EMBEDDED_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script.*?(?:</script\s*>|\z)").expect("embedded script regex is valid")
});

static EMBEDDED_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\son[\w-]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("embedded handler regex is valid")
});

/// Sanitizer that strips every `<script>` element and every `on*` attribute.
///
/// The input is parsed as an HTML fragment, so each script element is removed
/// on its own regardless of case or quoting, and event handlers are dropped
/// whether they were double-, single- or un-quoted. Markup the parser keeps
/// as plain text (comments, including conditional comments, and the content
/// of raw-text elements such as `noscript`, `xmp` or `style`) is scrubbed of
/// scripts and handlers textually. All other markup is written back as
/// parsed.
///
/// # Example
///
/// ```
/// use wp_content::{Sanitizer, ScriptSanitizer};
///
/// let html = r#"<p onclick="steal()">Hi</p><SCRIPT>alert(1)</SCRIPT>"#;
/// assert_eq!(ScriptSanitizer.sanitize(html), "<p>Hi</p>");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptSanitizer;

/// Script elements, plus malformed elements whose tag name swallowed a `<`.
fn is_script_like(el: &Element) -> bool {
    let name = el.name();
    name == "script" || name.contains('<')
}

fn is_unsafe_attr(_: &Element, name: &str) -> bool {
    let handler = name.len() > 2 && name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on"));
    handler || name.contains('<')
}

/// Remove scripts and handlers from text that is written out verbatim.
/// Repeats until stable, so removals cannot splice a new `<script` together.
fn scrub_verbatim(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let without_scripts = EMBEDDED_SCRIPT.replace_all(&current, "");
        let next = EMBEDDED_HANDLER.replace_all(&without_scripts, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

impl Sanitizer for ScriptSanitizer {
    fn sanitize(&self, html: &str) -> String {
        let document = dom::parse_fragment(html);

        let mut edits = Edits {
            drop_attr: Some(&is_unsafe_attr),
            verbatim: Some(&scrub_verbatim),
            ..Edits::default()
        };
        edits.skip.extend(
            document
                .tree
                .nodes()
                .filter(|node| node.value().as_element().is_some_and(is_script_like))
                .map(|node| node.id()),
        );

        if !edits.skip.is_empty() {
            tracing::debug!("Removed {} script elements", edits.skip.len());
        }

        dom::serialize_fragment(&document, &edits)
    }
}

/// Strip scripts and inline event handlers from `html`.
///
/// Shorthand for [`ScriptSanitizer`].
pub fn sanitize(html: &str) -> String {
    ScriptSanitizer.sanitize(html)
}
