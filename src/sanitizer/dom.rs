//! Tree parsing and serialization shared by the DOM-based stages.
//!
//! Fragments are parsed with `scraper` in a `<body>` context and written back
//! out child-by-child, so the implied `<html>` wrapper never leaks into the
//! output. Text and attribute values are re-escaped on the way out.

use std::collections::{HashMap, HashSet};

use ego_tree::{NodeId, NodeRef};
use scraper::Html;
use scraper::node::{Element, Node};

/// HTML5 void elements that must not have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// Elements where the parser swallows one leading newline.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Predicate deciding whether an attribute is dropped from an element.
pub(crate) type AttrFilter<'a> = &'a dyn Fn(&Element, &str) -> bool;

/// Rewrite applied to text written out verbatim (comments and raw text).
pub(crate) type VerbatimFilter<'a> = &'a dyn Fn(&str) -> String;

/// Edits applied while a tree is written back out.
#[derive(Default)]
pub(crate) struct Edits<'a> {
    /// Nodes omitted together with their subtree.
    pub skip: HashSet<NodeId>,
    /// Nodes whose whole subtree is replaced by a literal string.
    pub replace: HashMap<NodeId, String>,
    /// Attributes to drop, evaluated per element.
    pub drop_attr: Option<AttrFilter<'a>>,
    /// Filter for comment bodies and raw-text element content.
    pub verbatim: Option<VerbatimFilter<'a>>,
}

impl Edits<'_> {
    fn push_verbatim(&self, text: &str, out: &mut String) {
        match self.verbatim {
            Some(filter) => out.push_str(&filter(text)),
            None => out.push_str(text),
        }
    }
}

pub(crate) fn parse_fragment(html: &str) -> Html {
    Html::parse_fragment(html)
}

/// Serialize the content of a parsed fragment, applying `edits`.
pub(crate) fn serialize_fragment(document: &Html, edits: &Edits<'_>) -> String {
    let mut out = String::new();
    let root = document.root_element();
    for child in root.children() {
        serialize_node(child, edits, &mut out);
    }
    out
}

/// Serialize a single node (and its subtree), applying `edits`.
pub(crate) fn serialize_node(node: NodeRef<'_, Node>, edits: &Edits<'_>, out: &mut String) {
    let id = node.id();
    if edits.skip.contains(&id) {
        return;
    }
    if let Some(replacement) = edits.replace.get(&id) {
        out.push_str(replacement);
        return;
    }

    match node.value() {
        Node::Document | Node::Fragment => {
            for child in node.children() {
                serialize_node(child, edits, out);
            }
        }
        Node::Element(el) => {
            let tag = el.name();
            out.push('<');
            out.push_str(tag);
            for (name, value) in el.attrs() {
                if edits.drop_attr.is_some_and(|drop| drop(el, name)) {
                    continue;
                }
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            if LEADING_NEWLINE_ELEMENTS.contains(&tag) {
                let starts_with_newline = node
                    .first_child()
                    .and_then(|child| child.value().as_text().map(|t| t.starts_with('\n')))
                    .unwrap_or(false);
                if starts_with_newline {
                    out.push('\n');
                }
            }

            for child in node.children() {
                serialize_node(child, edits, out);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Node::Text(text) => {
            let raw = node
                .parent()
                .and_then(|p| p.value().as_element().map(|el| el.name()))
                .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name));
            if raw {
                edits.push_verbatim(text, out);
            } else {
                escape_text(text, out);
            }
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            edits.push_verbatim(comment, out);
            out.push_str("-->");
        }
        _ => {}
    }
}

/// Escape text content: `&`, `<`, `>` and non-breaking spaces.
pub(crate) fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// Escape a double-quoted attribute value: `&`, `"`, `<`, `>` and
/// non-breaking spaces.
pub(crate) fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
