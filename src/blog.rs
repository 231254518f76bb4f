//! The blog facade: fetch raw posts, transform them, and search them.

use serde::Serialize;

use crate::post::{PostTransformer, RawPost, TransformedPost};
use crate::search::{SearchResult, search_limited};
use crate::source::PostSource;

/// One page of the article list.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<TransformedPost>,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    pub total_posts: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Render-ready access to a [`PostSource`].
///
/// Created by [`BlogBuilder::build`](crate::BlogBuilder::build). Source
/// failures never reach the caller: they are logged via `tracing` and an
/// empty value is returned instead, so a page can always be rendered.
pub struct Blog<S: PostSource> {
    source: S,
    transformer: PostTransformer,
    per_page: usize,
    search_limit: usize,
}

impl<S: PostSource> Blog<S> {
    pub(crate) fn new(
        source: S,
        transformer: PostTransformer,
        per_page: usize,
        search_limit: usize,
    ) -> Self {
        Self {
            source,
            transformer,
            per_page,
            search_limit,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Transformed posts for the 1-based `page`, using the configured page size.
    pub async fn posts(&self, page: usize) -> Vec<TransformedPost> {
        self.posts_page(page, self.per_page).await
    }

    /// Transformed posts for the 1-based `page` of `per_page` posts.
    pub async fn posts_page(&self, page: usize, per_page: usize) -> Vec<TransformedPost> {
        match self.source.posts(page, per_page).await {
            Ok(raw) => self.transform_all(&raw),
            Err(e) => {
                tracing::error!("Failed to fetch posts page {page}: {e}");
                Vec::new()
            }
        }
    }

    /// The transformed post with `slug`, or `None` when missing or unreachable.
    pub async fn post_by_slug(&self, slug: &str) -> Option<TransformedPost> {
        match self.source.post_by_slug(slug).await {
            Ok(raw) => raw.map(|raw| self.transform(&raw)),
            Err(e) => {
                tracing::error!("Failed to fetch post {slug:?}: {e}");
                None
            }
        }
    }

    pub async fn total_posts(&self) -> usize {
        self.source.total_posts().await.unwrap_or_else(|e| {
            tracing::error!("Failed to count posts: {e}");
            0
        })
    }

    pub async fn slugs(&self) -> Vec<String> {
        self.source.slugs().await.unwrap_or_else(|e| {
            tracing::error!("Failed to list post slugs: {e}");
            Vec::new()
        })
    }

    /// A page of posts together with pagination state. The listing and the
    /// total are fetched concurrently.
    pub async fn page(&self, page: usize) -> PostPage {
        let page = page.max(1);
        let (posts, total_posts) = futures::join!(self.posts(page), self.total_posts());
        let total_pages = total_posts.div_ceil(self.per_page.max(1));

        PostPage {
            posts,
            page,
            per_page: self.per_page,
            total_posts,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Search already fetched posts, capped at the configured limit.
    pub fn search<'a>(&self, posts: &'a [TransformedPost], query: &str) -> Vec<SearchResult<'a>> {
        search_limited(posts, query, self.search_limit)
    }

    /// Transform a raw post without fetching anything.
    pub fn transform(&self, raw: &RawPost) -> TransformedPost {
        self.transformer.transform(raw)
    }

    fn transform_all(&self, raw: &[RawPost]) -> Vec<TransformedPost> {
        let posts: Vec<_> = raw.iter().map(|post| self.transform(post)).collect();
        tracing::debug!("Transformed {} posts", posts.len());
        posts
    }
}
