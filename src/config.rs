//! Builder for configuring a [`Blog`].

use crate::blog::Blog;
use crate::content::ContentPipeline;
use crate::error::{ContentError, Result};
use crate::post::{DEFAULT_AVATAR, PostTransformer};
use crate::sanitizer::Sanitizer;
use crate::search::MAX_RESULTS;
use crate::source::PostSource;

/// Builder for configuring a [`Blog`] over a [`PostSource`].
///
/// Provides a fluent API for the page size, the search result cap, the
/// fallback avatar, minification, and extra sanitizers.
///
/// # Example
///
/// ```rust
/// use wp_content::{BlogBuilder, MemorySource, RegexSanitizer};
///
/// let blog = BlogBuilder::new(MemorySource::default())
///     .per_page(12)
///     .search_limit(5)
///     .default_avatar("/img/avatar.png")
///     .add_sanitizer(RegexSanitizer::new(vec![(r"<p>\s*</p>", "")]))
///     .build()
///     .unwrap();
/// assert_eq!(blog.per_page(), 12);
/// ```
pub struct BlogBuilder<S: PostSource> {
    source: S,
    per_page: usize,
    search_limit: usize,
    default_avatar: String,
    pipeline: ContentPipeline,
}

impl<S: PostSource> BlogBuilder<S> {
    /// Create a new builder over `source` with sensible defaults.
    ///
    /// Defaults: 10 posts per page, 8 search results, minification on,
    /// `/placeholder-avatar.jpg` as the fallback avatar.
    pub fn new(source: S) -> Self {
        Self {
            source,
            per_page: 10,
            search_limit: MAX_RESULTS,
            default_avatar: DEFAULT_AVATAR.to_string(),
            pipeline: ContentPipeline::new(),
        }
    }

    /// Posts per page for listings.
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Maximum number of search results.
    pub fn search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Avatar URL used for authors without one.
    pub fn default_avatar(mut self, url: impl Into<String>) -> Self {
        self.default_avatar = url.into();
        self
    }

    /// Whether post bodies are minified.
    pub fn minify(mut self, minify: bool) -> Self {
        self.pipeline.set_minify(minify);
        self
    }

    /// Append a [`Sanitizer`] to the content pipeline.
    ///
    /// Extra sanitizers run in the order they are added, after script
    /// removal and before code blocks are rewritten.
    pub fn add_sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.pipeline.add_sanitizer(sanitizer);
        self
    }

    /// Consume the builder and return the configured [`Blog`].
    ///
    /// Fails with [`ContentError::Config`] when the page size is zero.
    pub fn build(self) -> Result<Blog<S>> {
        if self.per_page == 0 {
            return Err(ContentError::Config("per_page must be at least 1".into()));
        }

        let transformer =
            PostTransformer::new(self.pipeline).with_default_avatar(self.default_avatar);
        Ok(Blog::new(
            self.source,
            transformer,
            self.per_page,
            self.search_limit,
        ))
    }
}
