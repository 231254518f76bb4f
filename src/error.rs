//! Error types for the `wp_content` crate.

/// Errors raised while fetching or decoding posts.
///
/// The content pipeline and the search scorer never fail; only post sources
/// and configuration can.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// A post source could not complete a request (network, filesystem, ...).
    #[error("Post source request failed: {0}")]
    Source(Box<dyn std::error::Error + Send + Sync>),

    /// The WordPress REST API answered with a non-success status.
    #[error("WordPress API error: {0}")]
    Status(u16),

    /// A payload could not be decoded into a raw post.
    #[error("Invalid post payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The builder or environment configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

/// A type alias for `Result<T, ContentError>`.
pub type Result<T> = std::result::Result<T, ContentError>;
