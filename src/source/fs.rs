//! Filesystem post source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures::future::join_all;

use crate::error::{ContentError, Result};
use crate::post::RawPost;
use crate::source::{PostSource, SLUG_LIMIT, paginate, sort_newest_first};

/// Post source reading WordPress post exports from a directory.
///
/// Each post lives in `<slug>.json` and holds the same JSON object the REST
/// API returns for `/posts?_embed`. Files that fail to parse are skipped with
/// a warning. A post without a `slug` field takes the file stem.
///
/// # Example
///
/// ```rust,no_run
/// use wp_content::FsSource;
///
/// let source = FsSource::new("/var/data/wp_export");
/// ```
pub struct FsSource {
    base_dir: PathBuf,
}

impl FsSource {
    /// Create a new `FsSource` rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    async fn load_all(&self) -> Result<Vec<RawPost>> {
        let mut entries = tokio::fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| ContentError::Source(Box::new(e)))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ContentError::Source(Box::new(e)))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }

        let loaded = join_all(paths.iter().map(|path| read_post(path))).await;
        let mut posts = Vec::with_capacity(loaded.len());
        for (path, result) in paths.iter().zip(loaded) {
            match result {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping {}: {e}", path.display()),
            }
        }

        sort_newest_first(&mut posts);
        tracing::debug!(
            "Loaded {} posts from {}",
            posts.len(),
            self.base_dir.display()
        );
        Ok(posts)
    }
}

async fn read_post(path: &Path) -> Result<RawPost> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ContentError::Source(Box::new(e)))?;
    let mut post: RawPost = serde_json::from_slice(&bytes)?;
    if post.slug.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            post.slug = stem.to_string();
        }
    }
    Ok(post)
}

/// Slugs are plain file stems; anything that could leave the directory is
/// rejected.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

impl PostSource for FsSource {
    async fn posts(&self, page: usize, per_page: usize) -> Result<Vec<RawPost>> {
        let posts = self.load_all().await?;
        Ok(paginate(&posts, page, per_page))
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<RawPost>> {
        if !is_safe_slug(slug) {
            tracing::warn!("Rejected post slug {slug:?}");
            return Ok(None);
        }

        let path = self.base_dir.join(format!("{slug}.json"));
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let mut post: RawPost = serde_json::from_slice(&bytes)?;
                if post.slug.is_empty() {
                    post.slug = slug.to_string();
                }
                Ok(Some(post))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ContentError::Source(Box::new(e))),
        }
    }

    async fn total_posts(&self) -> Result<usize> {
        Ok(self.load_all().await?.len())
    }

    async fn slugs(&self) -> Result<Vec<String>> {
        let posts = self.load_all().await?;
        Ok(posts
            .into_iter()
            .take(SLUG_LIMIT)
            .map(|p| p.slug)
            .collect())
    }
}
