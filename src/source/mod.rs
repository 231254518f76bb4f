//! Pluggable sources of raw WordPress posts.
//!
//! The crate ships with three backends:
//!
//! - [`WpRestSource`] -- the WordPress REST API (requires the `http` feature).
//! - [`FsSource`] -- a directory of `<slug>.json` post exports.
//! - [`MemorySource`] -- posts held in memory.
//!
//! Implement the [`PostSource`] trait to add your own backend.

mod fs;
#[cfg(feature = "http")]
mod http;
mod memory;

pub use fs::FsSource;
#[cfg(feature = "http")]
pub use http::WpRestSource;
pub use memory::MemorySource;

use std::future::Future;

use crate::error::Result;
use crate::post::RawPost;

/// Most slugs returned by [`PostSource::slugs`], matching the REST API's
/// largest page.
pub const SLUG_LIMIT: usize = 100;

/// Trait for backends that can list and look up published posts.
///
/// Pages are 1-based. Listings are newest first.
///
/// # Implementing a custom backend
///
/// ```rust,no_run
/// use wp_content::{PostSource, RawPost, Result};
///
/// struct Empty;
///
/// impl PostSource for Empty {
///     async fn posts(&self, _page: usize, _per_page: usize) -> Result<Vec<RawPost>> {
///         Ok(Vec::new())
///     }
///     async fn post_by_slug(&self, _slug: &str) -> Result<Option<RawPost>> {
///         Ok(None)
///     }
///     async fn total_posts(&self) -> Result<usize> {
///         Ok(0)
///     }
///     async fn slugs(&self) -> Result<Vec<String>> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait PostSource: Send + Sync + 'static {
    /// One page of published posts.
    fn posts(
        &self,
        page: usize,
        per_page: usize,
    ) -> impl Future<Output = Result<Vec<RawPost>>> + Send;

    /// The post with the given slug, if any.
    fn post_by_slug(&self, slug: &str) -> impl Future<Output = Result<Option<RawPost>>> + Send;

    /// Number of published posts.
    fn total_posts(&self) -> impl Future<Output = Result<usize>> + Send;

    /// Slugs of the newest posts, at most [`SLUG_LIMIT`].
    fn slugs(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Order posts newest first. Ties keep their relative order.
pub(crate) fn sort_newest_first(posts: &mut [RawPost]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Slice out 1-based `page` of `per_page` items. Page `0` is treated as `1`.
pub(crate) fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(per_page);
    items.iter().skip(start).take(per_page).cloned().collect()
}
