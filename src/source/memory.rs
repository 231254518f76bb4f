//! In-memory post source.

use crate::error::Result;
use crate::post::RawPost;
use crate::source::{PostSource, SLUG_LIMIT, paginate, sort_newest_first};

/// Post source backed by a vector of raw posts, kept newest first.
///
/// Useful for previews, fixtures and tests.
///
/// # Example
///
/// ```rust
/// use wp_content::{MemorySource, RawPost};
///
/// let source = MemorySource::new(vec![RawPost {
///     slug: "hola".into(),
///     date: "2024-03-15T10:30:00".into(),
///     ..Default::default()
/// }]);
/// assert_eq!(source.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    posts: Vec<RawPost>,
}

impl MemorySource {
    pub fn new(mut posts: Vec<RawPost>) -> Self {
        sort_newest_first(&mut posts);
        Self { posts }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl PostSource for MemorySource {
    async fn posts(&self, page: usize, per_page: usize) -> Result<Vec<RawPost>> {
        Ok(paginate(&self.posts, page, per_page))
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<RawPost>> {
        Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn total_posts(&self) -> Result<usize> {
        Ok(self.posts.len())
    }

    async fn slugs(&self) -> Result<Vec<String>> {
        Ok(self
            .posts
            .iter()
            .take(SLUG_LIMIT)
            .map(|p| p.slug.clone())
            .collect())
    }
}
