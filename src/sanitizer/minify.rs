//! Whitespace and comment minification with protected regions.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::Sanitizer;
use super::placeholder::Placeholders;

static PROTECTED_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(pre|code|textarea|script)(?:\s[^>]*)?>").expect("open tag regex is valid")
});

static PROTECTED_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(pre|code|textarea|script)\s*>").expect("close tag regex is valid")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex is valid"));

static CONDITIONAL_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!--\[if\s").expect("conditional comment regex is valid"));

/// Whitespace rules, applied in order after comments are gone.
static WHITESPACE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r">\s+<", "><"),
        (r"(?m)^\s+", ""),
        (r"(?m)\s+$", ""),
        (r"\s{2,}", " "),
        (r"\s*=\s*", "="),
        (r"\n\s*\n", "\n"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("whitespace regex is valid"),
            replacement,
        )
    })
    .collect()
});

/// Sanitizer that minifies HTML while leaving whitespace-significant regions
/// (`<pre>`, `<code>`, `<textarea>`, `<script>`) byte-for-byte intact.
///
/// Comments are dropped except IE conditional comments, inter-tag whitespace
/// is removed and remaining whitespace runs collapse to a single space.
///
/// # Example
///
/// ```
/// use wp_content::{Minifier, Sanitizer};
///
/// let html = "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul><pre>  keep\n    this</pre>";
/// assert_eq!(
///     Minifier.sanitize(html),
///     "<ul><li>one</li><li>two</li></ul><pre>  keep\n    this</pre>"
/// );
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Minifier;

impl Sanitizer for Minifier {
    fn sanitize(&self, html: &str) -> String {
        let mut placeholders = Placeholders::for_document(html, "PROTECTED");
        let shielded = protect_regions(html, &mut placeholders);

        let without_comments = COMMENT.replace_all(&shielded, |caps: &Captures| {
            if CONDITIONAL_COMMENT.is_match(&caps[0]) {
                caps[0].to_string()
            } else {
                String::new()
            }
        });

        let minified = WHITESPACE_RULES
            .iter()
            .fold(without_comments.into_owned(), |acc, (re, replacement)| {
                re.replace_all(&acc, *replacement).into_owned()
            });

        let restored = placeholders.restore(minified.trim());
        tracing::debug!(
            "Minified {} bytes to {} ({} protected regions)",
            html.len(),
            restored.len(),
            placeholders.len()
        );
        restored
    }
}

/// Replace every protected region with a placeholder token.
///
/// A region runs from an opening tag to the first closing tag of the same
/// name. An opening tag without a matching close is left in place and the
/// scan resumes right after it.
fn protect_regions(html: &str, placeholders: &mut Placeholders) -> String {
    let mut out = String::with_capacity(html.len());
    let mut copied_up_to = 0;
    let mut search_from = 0;

    while let Some(open) = PROTECTED_OPEN.captures_at(html, search_from) {
        let Some(open_tag) = open.get(0) else {
            break;
        };
        let name = &open[1];

        let close = PROTECTED_CLOSE
            .captures_iter(&html[open_tag.end()..])
            .find(|close| close[1].eq_ignore_ascii_case(name))
            .and_then(|close| close.get(0))
            .map(|m| open_tag.end() + m.end());

        match close {
            Some(end) => {
                out.push_str(&html[copied_up_to..open_tag.start()]);
                out.push_str(&placeholders.protect(&html[open_tag.start()..end]));
                copied_up_to = end;
                search_from = end;
            }
            None => search_from = open_tag.end(),
        }
    }

    out.push_str(&html[copied_up_to..]);
    out
}

/// Minify `html`. Shorthand for [`Minifier`].
pub fn minify(html: &str) -> String {
    Minifier.sanitize(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_inter_tag_whitespace() {
        let html = "<div>\n    <p>Hello</p>\n    <p>World</p>\n</div>\n";
        assert_eq!(minify(html), "<div><p>Hello</p><p>World</p></div>");
    }

    #[test]
    fn collapses_runs_inside_text() {
        assert_eq!(minify("<p>a    lot   of\t\tspace</p>"), "<p>a lot of space</p>");
    }

    #[test]
    fn removes_comments_but_keeps_conditionals() {
        let html = "<p>a</p><!-- wp:paragraph --><p>b</p><!--[if IE]><p>ie</p><![endif]-->";
        assert_eq!(
            minify(html),
            "<p>a</p><p>b</p><!--[if IE]><p>ie</p><![endif]-->"
        );
    }

    #[test]
    fn removes_whitespace_around_equals() {
        assert_eq!(minify(r#"<a href = "/x"  class ="y">x</a>"#), r#"<a href="/x" class="y">x</a>"#);
    }

    #[test]
    fn protects_whitespace_significant_regions() {
        let pre = "<pre class=\"wp-block-code\"><code>fn main() {\n    println!(\"hi\");\n}\n</code></pre>";
        let textarea = "<textarea>  line one\n\n  line two</textarea>";
        let script = "<script>\n  var a  =  1;\n</script>";
        let html = format!("<div>\n  {pre}\n  <p>x   y</p>\n  {textarea}\n{script}\n</div>");

        let result = minify(&html);
        assert!(result.contains(pre));
        assert!(result.contains(textarea));
        assert!(result.contains(script));
        assert!(result.contains("<p>x y</p>"));
    }

    #[test]
    fn protects_inline_code() {
        let html = "<p>Run  <code>cargo   build  --release</code>  now</p>";
        assert_eq!(minify(html), "<p>Run <code>cargo   build  --release</code> now</p>");
    }

    #[test]
    fn protected_tag_names_are_case_insensitive() {
        let html = "<PRE>  a\n  b</PRE>\n\n<p>c</p>";
        assert_eq!(minify(html), "<PRE>  a\n  b</PRE>\n<p>c</p>");
    }

    #[test]
    fn unclosed_protected_tag_is_minified() {
        let html = "<pre>  never closed\n\n   <p>x</p>";
        assert_eq!(minify(html), "<pre> never closed\n<p>x</p>");
    }

    #[test]
    fn many_regions_restore_in_order() {
        let html: String = (0..15)
            .map(|i| format!("<code>  {i}  </code>\n"))
            .collect();
        let expected: String = (0..15)
            .map(|i| format!("<code>  {i}  </code>"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(minify(&html), expected);
    }

    #[test]
    fn minify_is_idempotent() {
        let samples = [
            "<div>\n  <p>Hello   <b>world</b></p>\n\n\n  <pre>  x\n\n  y</pre>\n</div>",
            "<!-- c --><p a = \"1\">t  =  u</p>\r\n\r\n<code> k </code>",
            "  plain text \n\n with   gaps  ",
            "<ul>\n<li>1</li>\n\n<li>2</li>\n</ul><textarea>\n a\n</textarea>",
            "",
        ];
        for sample in samples {
            let once = minify(sample);
            assert_eq!(minify(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(minify(""), "");
        assert_eq!(minify("  \n\t "), "");
    }
}
