//! HTML stages of the content pipeline.
//!
//! Every stage implements the [`Sanitizer`] trait and can be chained in a
//! [`SanitizerPipeline`].
//!
//! Built-in stages:
//!
//! - [`ScriptSanitizer`] -- removes scripts and inline event handlers.
//! - [`CodeBlockRewriter`] -- normalizes Code Block Pro markup.
//! - [`RegexSanitizer`] -- regex-based replacements (inline style stripping).
//! - [`Minifier`] -- whitespace/comment minification with protected regions.

mod code_block;
mod dom;
mod language;
mod minify;
mod placeholder;
mod regex;
mod script;

pub use self::regex::RegexSanitizer;
pub use code_block::{BLOCK_CLASS, CodeBlockRewriter, DEFAULT_LABEL, PLUGIN_CLASS, rewrite_code_blocks};
pub use language::detect_language;
pub use minify::{Minifier, minify};
pub use script::{ScriptSanitizer, sanitize};

/// Trait for HTML transformation stages.
///
/// Each stage receives an HTML string and returns a transformed version.
/// Implementations must be `Send + Sync` so a configured pipeline can be
/// shared between tasks.
pub trait Sanitizer: Send + Sync {
    /// Transform the given HTML content, returning the result.
    fn sanitize(&self, html: &str) -> String;
}

/// An ordered chain of [`Sanitizer`] implementations applied sequentially.
///
/// Each sanitizer receives the output of the previous one. An empty pipeline
/// is a no-op.
pub struct SanitizerPipeline {
    sanitizers: Vec<Box<dyn Sanitizer>>,
}

impl SanitizerPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            sanitizers: Vec::new(),
        }
    }

    /// Append a sanitizer to the end of the pipeline.
    pub fn add(&mut self, sanitizer: impl Sanitizer + 'static) {
        self.sanitizers.push(Box::new(sanitizer));
    }

    /// Run the full pipeline on the given HTML, returning the final result.
    pub fn sanitize(&self, html: &str) -> String {
        self.sanitizers
            .iter()
            .fold(html.to_string(), |acc, s| s.sanitize(&acc))
    }

    /// Returns `true` if no sanitizers have been added.
    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty()
    }

    /// Number of sanitizers in the pipeline.
    pub fn len(&self) -> usize {
        self.sanitizers.len()
    }
}

impl Default for SanitizerPipeline {
    fn default() -> Self {
        Self::new()
    }
}
