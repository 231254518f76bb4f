//! Weighted multi-field search over already transformed posts.
//!
//! Every query term is scored against three fields:
//!
//! | Field | Points | Extra |
//! |-------|--------|-------|
//! | title | 10 | +5 when the title starts with the term |
//! | excerpt | 5 | |
//! | plain-text body | 1 | context window around the first hit |
//!
//! Posts scoring zero are dropped; the rest are ordered by score with ties
//! kept in input order.

use std::fmt;

use regex::RegexBuilder;
use serde::Serialize;

use crate::post::TransformedPost;

/// Default number of results returned by [`search`].
pub const MAX_RESULTS: usize = 8;

/// Characters of body text kept on each side of a content hit.
const CONTEXT_CHARS: usize = 60;

const MIN_QUERY_CHARS: usize = 2;

const HIGHLIGHT_OPEN: &str = r#"<mark class="bg-yellow-200 dark:bg-yellow-900/50">"#;
const HIGHLIGHT_CLOSE: &str = "</mark>";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Title,
    Excerpt,
    Content,
}

impl fmt::Display for MatchedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchedField::Title => "title",
            MatchedField::Excerpt => "excerpt",
            MatchedField::Content => "content",
        })
    }
}

/// A scored hit, borrowing the post it refers to.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a> {
    pub post: &'a TransformedPost,
    pub match_score: u32,
    pub matched_field: MatchedField,
    pub highlighted_text: String,
}

/// Search `posts` for `query`, returning at most [`MAX_RESULTS`] hits.
///
/// ```
/// use wp_content::search::search;
///
/// assert!(search(&[], "rust").is_empty());
/// assert!(search(&[], "r").is_empty());
/// ```
pub fn search<'a>(posts: &'a [TransformedPost], query: &str) -> Vec<SearchResult<'a>> {
    search_limited(posts, query, MAX_RESULTS)
}

/// Like [`search`] with an explicit result cap.
pub fn search_limited<'a>(
    posts: &'a [TransformedPost],
    query: &str,
    limit: usize,
) -> Vec<SearchResult<'a>> {
    let query = query.to_lowercase();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    let terms: Vec<&str> = query.split_whitespace().collect();

    let mut results: Vec<SearchResult<'a>> = posts
        .iter()
        .filter_map(|post| score_post(post, &terms))
        .collect();

    // `sort_by` is stable, so equal scores keep their input order.
    results.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    results.truncate(limit);

    tracing::debug!("Search {query:?} matched {} posts", results.len());
    results
}

fn score_post<'a>(post: &'a TransformedPost, terms: &[&str]) -> Option<SearchResult<'a>> {
    let title = post.title.to_lowercase();
    let excerpt = post.excerpt.to_lowercase();
    let body = FoldedText::new(&post.plain_text_content);

    let mut score = 0;
    let mut field = MatchedField::Content;
    let mut highlighted: Option<String> = None;

    for term in terms {
        if title.contains(term) {
            score += 10;
            field = MatchedField::Title;
            highlighted = Some(post.title.clone());
        }

        if excerpt.contains(term) {
            score += 5;
            if field == MatchedField::Content {
                field = MatchedField::Excerpt;
                highlighted = Some(post.excerpt.clone());
            }
        }

        if let Some(at) = body.find(term) {
            score += 1;
            if highlighted.as_deref().is_none_or(str::is_empty) {
                highlighted = Some(body.context(at, term.chars().count()));
                field = MatchedField::Content;
            }
        }

        if title.starts_with(term) {
            score += 5;
        }
    }

    if score == 0 {
        return None;
    }

    Some(SearchResult {
        post,
        match_score: score,
        matched_field: field,
        highlighted_text: highlighted
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| post.excerpt.clone()),
    })
}

/// Plain text alongside its lowercase form, with a char-level mapping back
/// to the original so windows can be cut from the original casing.
struct FoldedText<'a> {
    original: &'a str,
    lower: String,
    /// Original char index for every char of `lower`.
    origin: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    fn new(original: &'a str) -> Self {
        let mut lower = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        for (index, ch) in original.chars().enumerate() {
            for folded in ch.to_lowercase() {
                lower.push(folded);
                origin.push(index);
            }
        }
        Self {
            original,
            lower,
            origin,
        }
    }

    /// Original char index of the first occurrence of `term`.
    fn find(&self, term: &str) -> Option<usize> {
        let byte = self.lower.find(term)?;
        let folded_index = self.lower[..byte].chars().count();
        self.origin.get(folded_index).copied()
    }

    /// Up to [`CONTEXT_CHARS`] chars either side of a hit, with `...` marking
    /// each truncated side.
    fn context(&self, at: usize, term_chars: usize) -> String {
        let total = self.original.chars().count();
        let start = at.saturating_sub(CONTEXT_CHARS);
        let end = (at + term_chars + CONTEXT_CHARS).min(total);

        let mut out = String::new();
        if start > 0 {
            out.push_str("...");
        }
        out.extend(self.original.chars().skip(start).take(end - start));
        if end < total {
            out.push_str("...");
        }
        out
    }
}

/// Wrap case-insensitive occurrences of each query term in a `<mark>`.
///
/// Terms are applied one after another over the growing string, so a later
/// term may match inside markup produced for an earlier one.
///
/// ```
/// use wp_content::search::highlight;
///
/// assert_eq!(
///     highlight("Rust and rust", "RUST"),
///     r#"<mark class="bg-yellow-200 dark:bg-yellow-900/50">Rust</mark> and <mark class="bg-yellow-200 dark:bg-yellow-900/50">rust</mark>"#
/// );
/// ```
pub fn highlight(text: &str, query: &str) -> String {
    let mut highlighted = text.to_string();
    for term in query.split_whitespace() {
        let pattern = match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!("Skipping highlight for term {term:?}: {e}");
                continue;
            }
        };
        highlighted = pattern
            .replace_all(&highlighted, format!("{HIGHLIGHT_OPEN}${{0}}{HIGHLIGHT_CLOSE}"))
            .into_owned();
    }
    highlighted
}
