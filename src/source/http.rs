//! WordPress REST API post source (requires the `http` feature).

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::{ContentError, Result};
use crate::post::RawPost;
use crate::source::{PostSource, SLUG_LIMIT};

/// Environment variable holding the WordPress site URL.
pub const WORDPRESS_URL_VAR: &str = "WORDPRESS_URL";

const TOTAL_HEADER: &str = "X-WP-Total";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Post source talking to `{site}/wp-json/wp/v2`.
///
/// Only published posts are requested. Listings and lookups ask for
/// `_embed`, so authors, featured media and terms arrive with each post.
///
/// # Example
///
/// ```rust,no_run
/// use wp_content::WpRestSource;
///
/// # fn example() -> wp_content::Result<()> {
/// let source = WpRestSource::new("https://blog.example.com")?;
/// let from_env = WpRestSource::from_env()?;
/// # Ok(())
/// # }
/// ```
pub struct WpRestSource {
    client: Client,
    api_base: String,
}

impl WpRestSource {
    /// Create a source for the site at `site_url` with a default client.
    pub fn new(site_url: impl AsRef<str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("wp_content/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ContentError::Source(Box::new(e)))?;
        Ok(Self::with_client(client, site_url))
    }

    /// Create a source using an existing [`Client`].
    pub fn with_client(client: Client, site_url: impl AsRef<str>) -> Self {
        let site = site_url.as_ref().trim_end_matches('/');
        Self {
            client,
            api_base: format!("{site}/wp-json/wp/v2"),
        }
    }

    /// Create a source for the site named by the `WORDPRESS_URL` environment
    /// variable.
    pub fn from_env() -> Result<Self> {
        let site = std::env::var(WORDPRESS_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ContentError::Config(format!("{WORDPRESS_URL_VAR} is not set")))?;
        Self::new(site.trim())
    }

    /// Base URL of the REST namespace, e.g. `https://site/wp-json/wp/v2`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        let url = format!("{}/{path}", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ContentError::Source(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status(status.as_u16()));
        }
        tracing::debug!("GET {} -> {}", response.url(), status.as_u16());
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let body = self
            .get(path, query)
            .await?
            .bytes()
            .await
            .map_err(|e| ContentError::Source(Box::new(e)))?;
        decode_body(&body)
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

impl PostSource for WpRestSource {
    async fn posts(&self, page: usize, per_page: usize) -> Result<Vec<RawPost>> {
        let page = page.max(1).to_string();
        let per_page = per_page.to_string();
        self.get_json(
            "posts",
            &[
                ("_embed", ""),
                ("page", page.as_str()),
                ("per_page", per_page.as_str()),
                ("status", "publish"),
            ],
        )
        .await
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<RawPost>> {
        let posts: Vec<RawPost> = self
            .get_json("posts", &[("slug", slug), ("_embed", "")])
            .await?;
        Ok(posts.into_iter().next())
    }

    async fn total_posts(&self) -> Result<usize> {
        let response = self
            .get("posts", &[("per_page", "1"), ("status", "publish")])
            .await?;
        let total = response
            .headers()
            .get(TOTAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());

        Ok(total.unwrap_or_else(|| {
            tracing::warn!("Missing or invalid {TOTAL_HEADER} header");
            0
        }))
    }

    async fn slugs(&self) -> Result<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct SlugOnly {
            slug: String,
        }

        let limit = SLUG_LIMIT.to_string();
        let slugs: Vec<SlugOnly> = self
            .get_json(
                "posts",
                &[("per_page", limit.as_str()), ("_fields", "slug"), ("status", "publish")],
            )
            .await?;
        Ok(slugs.into_iter().map(|s| s.slug).collect())
    }
}
