//! # wp_content
//!
//! Turns WordPress REST API posts into render-ready, searchable content.
//!
//! ## Overview
//!
//! `wp_content` fetches raw posts from a [`PostSource`] (the WordPress REST
//! API, a directory of JSON exports, or memory), runs each body through the
//! [`ContentPipeline`], and hands back [`TransformedPost`]s with a cached
//! plain-text projection that [`search`](search::search) scores against.
//!
//! The pipeline:
//!
//! 1. removes `<script>` elements and inline event handlers,
//! 2. rewrites Code Block Pro blocks into a site-controlled structure with a
//!    language label and a copy button, protected from the later stages,
//! 3. strips inline `style` and `color` attributes elsewhere,
//! 4. minifies whitespace and comments outside `pre`, `code`, `textarea` and
//!    `script`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wp_content::{BlogBuilder, WpRestSource};
//!
//! # async fn example() -> wp_content::Result<()> {
//! let blog = BlogBuilder::new(WpRestSource::from_env()?)
//!     .per_page(12)
//!     .build()?;
//!
//! let page = blog.page(1).await;
//! for hit in blog.search(&page.posts, "rust async") {
//!     println!("{} ({}): {}", hit.post.title, hit.match_score, hit.highlighted_text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline can also be used on its own:
//!
//! ```rust
//! let html = wp_content::process_content("<p style=\"color:red\">Hola</p>\n\n<p>mundo</p>");
//! assert_eq!(html, "<p>Hola</p><p>mundo</p>");
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `http` | **yes** | Enables [`WpRestSource`] via `reqwest`. |
//! | `rustls-tls` | no | Use `rustls` instead of the platform TLS for `reqwest`. |

pub mod blog;
pub mod config;
pub mod content;
pub mod error;
pub mod post;
pub mod sanitizer;
pub mod search;
pub mod source;
pub mod text;

pub use blog::{Blog, PostPage};
pub use config::BlogBuilder;
pub use content::{ContentPipeline, ProcessedContent, process_content};
pub use error::{ContentError, Result};
pub use post::{PostTransformer, RawPost, TransformedPost};
pub use sanitizer::{
    CodeBlockRewriter, Minifier, RegexSanitizer, Sanitizer, SanitizerPipeline, ScriptSanitizer,
    detect_language, minify, rewrite_code_blocks, sanitize,
};
pub use search::{MatchedField, SearchResult, highlight, search};
#[cfg(feature = "http")]
pub use source::WpRestSource;
pub use source::{FsSource, MemorySource, PostSource};
pub use text::{format_date, reading_time, strip_html};
