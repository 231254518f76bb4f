//! Rewriting of Code Block Pro markup into the site's own code block shape.
//!
//! WordPress' Code Block Pro plugin renders a highlighted `<pre>` wrapped in a
//! container full of inline presentation: a title bar, a decorative traffic
//! light SVG, a copy button with a hidden `<textarea>` and Shiki colors on
//! every token span. The rewriter keeps only the `<pre>` (minus span colors)
//! and puts a normalized header in front of it:
//!
//! ```html
//! <div class="wp-block-code-block-pro">
//!   <div class="code-block-header">
//!     <span class="code-language">JavaScript</span>
//!     <span role="button" aria-label="Copy" data-code="...">...</span>
//!   </div>
//!   <pre>...</pre>
//! </div>
//! ```

use std::sync::LazyLock;

use scraper::node::Element;
use scraper::{ElementRef, Selector};

use super::Sanitizer;
use super::dom::{self, Edits};
use super::language::{detect_language, font_family_label};
use super::placeholder::Placeholders;

/// Class marking a Code Block Pro container in WordPress output.
pub const PLUGIN_CLASS: &str = "wp-block-kevinbatdorf-code-block-pro";

/// Class of the rewritten container.
pub const BLOCK_CLASS: &str = "wp-block-code-block-pro";

/// Label used when neither a title nor a language can be found.
pub const DEFAULT_LABEL: &str = "Code";

const FONT_FAMILY_ATTR: &str = "data-code-block-pro-font-family";

const COPY_ICON: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" style="width:24px;height:24px" fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2">"#,
    r#"<path class="with-check" stroke-linecap="round" stroke-linejoin="round" d="M9 5H7a2 2 0 00-2 2v12a2 2 0 002 2h10a2 2 0 002-2V7a2 2 0 00-2-2h-2M9 5a2 2 0 002 2h2a2 2 0 002-2M9 5a2 2 0 012-2h2a2 2 0 012 2m-6 9l2 2 4-4"></path>"#,
    r#"<path class="without-check" stroke-linecap="round" stroke-linejoin="round" d="M9 5H7a2 2 0 00-2 2v12a2 2 0 002 2h10a2 2 0 002-2V7a2 2 0 00-2-2h-2M9 5a2 2 0 002 2h2a2 2 0 002-2M9 5a2 2 0 012-2h2a2 2 0 012 2"></path>"#,
    "</svg>",
);

static CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.wp-block-kevinbatdorf-code-block-pro").expect("container selector is valid")
});

static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[style*="border-bottom"]"#).expect("title selector is valid")
});

static TEXTAREA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("textarea").expect("textarea selector is valid"));

static PRE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre").expect("pre selector is valid"));

static CODE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("code").expect("code selector is valid"));

/// Everything extracted from one container, ready to be re-emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CodeBlockFragment {
    /// Container attributes that survive, `class` first.
    pub attributes: Vec<(String, String)>,
    pub custom_title: Option<String>,
    /// Header label: the custom title, else the detected language.
    pub language: String,
    /// Plain text a reader expects on the clipboard.
    pub code_for_copy: String,
    /// The retained `<pre>` with span styles removed.
    pub code_block_markup: String,
}

impl CodeBlockFragment {
    fn extract(container: ElementRef<'_>) -> Self {
        let pre = container
            .select(&PRE)
            .find(|pre| !has_ancestor_within(*pre, container, is_copy_button));

        let custom_title = container
            .select(&TITLE)
            .find(|span| !has_ancestor_within(*span, container, |el| el.name() == "pre"))
            .map(|span| normalize_title(&span.text().collect::<String>()))
            .filter(|title| !title.is_empty());

        let code_for_copy = container
            .select(&TEXTAREA)
            .map(|textarea| textarea.text().collect::<String>())
            .find(|text| !text.is_empty())
            .or_else(|| {
                pre.and_then(|pre| pre.select(&CODE).next())
                    .map(|code| code.text().collect())
            })
            .unwrap_or_default();

        let language = match &custom_title {
            Some(title) => title.clone(),
            None => detect_language(&code_for_copy)
                .map(str::to_string)
                .or_else(|| container.value().attr(FONT_FAMILY_ATTR).and_then(font_family_label))
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        };

        let code_block_markup = pre
            .map(|pre| {
                let edits = Edits {
                    drop_attr: Some(&strip_span_style),
                    ..Edits::default()
                };
                let mut out = String::new();
                dom::serialize_node(*pre, &edits, &mut out);
                out
            })
            .unwrap_or_default();

        Self {
            attributes: retained_attributes(container.value()),
            custom_title,
            language,
            code_for_copy,
            code_block_markup,
        }
    }

    fn render(&self) -> String {
        let mut out = String::from("<div");
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            dom::escape_attr(value, &mut out);
            out.push('"');
        }
        out.push('>');

        out.push_str(r#"<div class="code-block-header"><span class="code-language">"#);
        dom::escape_text(&self.language, &mut out);
        out.push_str("</span>");
        if !self.code_for_copy.is_empty() {
            out.push_str(r#"<span role="button" aria-label="Copy" data-code=""#);
            out.push_str(&self.code_for_copy.replace('"', "&quot;"));
            out.push_str(r#"">"#);
            out.push_str(COPY_ICON);
            out.push_str("</span>");
        }
        out.push_str("</div>");

        out.push_str(&self.code_block_markup);
        out.push_str("</div>");
        out
    }
}

fn is_copy_button(el: &Element) -> bool {
    el.attr("role") == Some("button")
}

fn strip_span_style(el: &Element, name: &str) -> bool {
    el.name() == "span" && name == "style"
}

/// Whether any ancestor of `node` strictly below `container` satisfies `predicate`.
fn has_ancestor_within(
    node: ElementRef<'_>,
    container: ElementRef<'_>,
    predicate: impl Fn(&Element) -> bool,
) -> bool {
    node.ancestors()
        .take_while(|ancestor| ancestor.id() != container.id())
        .filter_map(|ancestor| ancestor.value().as_element())
        .any(predicate)
}

/// Trim a title and fold typographic quotes to ASCII. Dashes are kept.
fn normalize_title(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            _ => c,
        })
        .collect()
}

/// Container attributes minus inline style and the plugin font family, with
/// the plugin class swapped for [`BLOCK_CLASS`].
fn retained_attributes(container: &Element) -> Vec<(String, String)> {
    let classes: Vec<&str> = std::iter::once(BLOCK_CLASS)
        .chain(container.classes().filter(|class| *class != PLUGIN_CLASS))
        .collect();

    let mut attributes = vec![("class".to_string(), classes.join(" "))];
    attributes.extend(
        container
            .attrs()
            .filter(|(name, _)| !matches!(*name, "class" | "style" | FONT_FAMILY_ATTR))
            .map(|(name, value)| (name.to_string(), value.to_string())),
    );
    attributes
}

/// Sanitizer that rewrites every Code Block Pro container.
///
/// Other markup is written back as parsed. Extraction never fails: missing
/// pieces degrade to an empty `<pre>`, the `"Code"` label or no copy button.
///
/// # Example
///
/// ```
/// use wp_content::{CodeBlockRewriter, Sanitizer};
///
/// let html = r#"<div class="wp-block-kevinbatdorf-code-block-pro"><pre><code>git status</code></pre></div>"#;
/// let result = CodeBlockRewriter.sanitize(html);
/// assert!(result.starts_with(r#"<div class="wp-block-code-block-pro"><div class="code-block-header"><span class="code-language">Bash</span>"#));
/// assert!(result.ends_with("<pre><code>git status</code></pre></div>"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CodeBlockRewriter;

impl CodeBlockRewriter {
    /// Rewrite all containers and leave each rewritten block behind a
    /// tag-shaped placeholder token, so later textual passes cannot reach
    /// inside.
    pub(crate) fn protect(&self, html: &str) -> (String, Placeholders) {
        let document = dom::parse_fragment(html);
        let baseline = dom::serialize_fragment(&document, &Edits::default());
        let mut placeholders = Placeholders::tag_shaped(&baseline, "CODEBLOCK");

        if document.select(&CONTAINER).next().is_none() {
            return (baseline, placeholders);
        }

        let mut edits = Edits::default();
        for container in document.select(&CONTAINER) {
            // nested containers are handled by their outermost one
            if container
                .ancestors()
                .any(|ancestor| edits.replace.contains_key(&ancestor.id()))
            {
                continue;
            }
            let fragment = CodeBlockFragment::extract(container);
            edits
                .replace
                .insert(container.id(), placeholders.protect(fragment.render()));
        }

        tracing::debug!("Rewrote {} code blocks", placeholders.len());
        (dom::serialize_fragment(&document, &edits), placeholders)
    }
}

impl Sanitizer for CodeBlockRewriter {
    fn sanitize(&self, html: &str) -> String {
        let (shielded, placeholders) = self.protect(html);
        placeholders.restore(&shielded)
    }
}

/// Rewrite Code Block Pro containers in `html`. Shorthand for [`CodeBlockRewriter`].
pub fn rewrite_code_blocks(html: &str) -> String {
    CodeBlockRewriter.sanitize(html)
}
