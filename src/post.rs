//! WordPress post payloads and their render-ready projection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{ContentPipeline, ProcessedContent};
use crate::text::{format_date, reading_time, strip_html};

/// Avatar used when the embedded author carries no usable avatar URL.
pub const DEFAULT_AVATAR: &str = "/placeholder-avatar.jpg";

const DEFAULT_IMAGE_WIDTH: u32 = 1200;
const DEFAULT_IMAGE_HEIGHT: u32 = 630;

/// A post as returned by `/wp-json/wp/v2/posts?_embed`.
///
/// Only the fields the transformation reads are modelled; everything else in
/// the payload is ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawPost {
    pub id: u64,
    pub date: String,
    pub slug: String,
    pub title: Rendered,
    pub excerpt: Rendered,
    pub content: Rendered,
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
    /// All in One SEO head data, when the plugin exposes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aioseo: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Rendered {
    pub rendered: String,
}

impl From<&str> for Rendered {
    fn from(rendered: &str) -> Self {
        Self {
            rendered: rendered.to_string(),
        }
    }
}

/// Resources embedded by `_embed`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Embedded {
    pub author: Vec<RawAuthor>,
    #[serde(rename = "wp:featuredmedia")]
    pub featured_media: Vec<RawMedia>,
    /// Term groups in taxonomy order: categories first, then tags.
    #[serde(rename = "wp:term")]
    pub terms: Vec<Vec<RawTerm>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawAuthor {
    pub name: Option<String>,
    /// Avatar URLs keyed by pixel size (`"24"`, `"48"`, `"96"`).
    pub avatar_urls: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawMedia {
    pub source_url: Option<String>,
    pub alt_text: Option<String>,
    pub media_details: MediaDetails,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaDetails {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawTerm {
    pub name: String,
}

/// A post ready to be rendered and searched.
///
/// `plain_text_content` is derived from `content` once, at transform time.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedPost {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub plain_text_content: String,
    /// Long `es-MX` date, e.g. `15 de marzo de 2024`.
    pub date: String,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    pub author: Author,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub seo: Seo,
}

impl TransformedPost {
    /// Estimated reading time of the body in minutes.
    pub fn reading_time(&self, words_per_minute: usize) -> usize {
        reading_time(&self.content, words_per_minute)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub avatar_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeaturedImage {
    pub url: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

/// Metadata for `<head>`: document title, Open Graph and Twitter cards.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    pub title: String,
    pub description: String,
    pub og_title: String,
    pub og_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    pub twitter_title: String,
    pub twitter_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_image: Option<String>,
}

/// Turns [`RawPost`]s into [`TransformedPost`]s.
pub struct PostTransformer {
    pipeline: ContentPipeline,
    default_avatar: String,
}

impl PostTransformer {
    pub fn new(pipeline: ContentPipeline) -> Self {
        Self {
            pipeline,
            default_avatar: DEFAULT_AVATAR.to_string(),
        }
    }

    /// Avatar URL used when the author has none.
    pub fn with_default_avatar(mut self, url: impl Into<String>) -> Self {
        self.default_avatar = url.into();
        self
    }

    pub fn pipeline(&self) -> &ContentPipeline {
        &self.pipeline
    }

    pub fn transform(&self, raw: &RawPost) -> TransformedPost {
        let ProcessedContent { html, plain_text } = self.pipeline.render(&raw.content.rendered);
        let title = strip_html(&raw.title.rendered);
        let excerpt = strip_html(&raw.excerpt.rendered);

        let embedded = raw.embedded.as_ref();
        let author = embedded.and_then(|e| e.author.first());
        let media = embedded.and_then(|e| e.featured_media.first());
        let term_names = |group: usize| -> Vec<String> {
            embedded
                .and_then(|e| e.terms.get(group))
                .map(|terms| terms.iter().map(|t| t.name.clone()).collect())
                .unwrap_or_default()
        };

        let featured_image = media.and_then(|m| {
            let url = non_empty(m.source_url.as_deref())?;
            Some(FeaturedImage {
                url: url.to_string(),
                alt: non_empty(m.alt_text.as_deref()).unwrap_or(&title).to_string(),
                width: m
                    .media_details
                    .width
                    .filter(|w| *w > 0)
                    .unwrap_or(DEFAULT_IMAGE_WIDTH),
                height: m
                    .media_details
                    .height
                    .filter(|h| *h > 0)
                    .unwrap_or(DEFAULT_IMAGE_HEIGHT),
            })
        });

        let author = Author {
            name: author
                .and_then(|a| non_empty(a.name.as_deref()))
                .unwrap_or("Anonymous")
                .to_string(),
            avatar_url: author
                .and_then(|a| {
                    non_empty(a.avatar_urls.get("96").map(String::as_str))
                        .or_else(|| non_empty(a.avatar_urls.get("48").map(String::as_str)))
                })
                .unwrap_or(&self.default_avatar)
                .to_string(),
        };

        let media_url = featured_image.as_ref().map(|image| image.url.as_str());
        let seo = build_seo(raw.aioseo.as_ref(), &title, &excerpt, media_url);

        TransformedPost {
            id: raw.id,
            slug: raw.slug.clone(),
            content: html,
            plain_text_content: plain_text,
            date: format_date(&raw.date),
            date_iso: raw.date.clone(),
            author,
            featured_image,
            categories: term_names(0),
            tags: term_names(1),
            seo,
            title,
            excerpt,
        }
    }
}

impl Default for PostTransformer {
    fn default() -> Self {
        Self::new(ContentPipeline::new())
    }
}

fn build_seo(aioseo: Option<&Value>, title: &str, excerpt: &str, media_url: Option<&str>) -> Seo {
    let field = |key: &str| aioseo_field(aioseo, key);

    let seo_title = field("title");
    let seo_description = field("description");
    let og_image = field("og_image_url").or(media_url);

    Seo {
        title: seo_title.unwrap_or(title).to_string(),
        description: seo_description.unwrap_or(excerpt).to_string(),
        og_title: field("og_title").or(seo_title).unwrap_or(title).to_string(),
        og_description: field("og_description")
            .or(seo_description)
            .unwrap_or(excerpt)
            .to_string(),
        og_image: og_image.map(str::to_string),
        twitter_title: field("twitter_title")
            .or(seo_title)
            .unwrap_or(title)
            .to_string(),
        twitter_description: field("twitter_description")
            .or(seo_description)
            .unwrap_or(excerpt)
            .to_string(),
        twitter_image: field("twitter_image_url").or(og_image).map(str::to_string),
    }
}

fn aioseo_field<'a>(aioseo: Option<&'a Value>, key: &str) -> Option<&'a str> {
    non_empty(aioseo?.get(key)?.as_str())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDPRESS_POST: &str = r#"{
        "id": 42,
        "date": "2024-03-15T10:30:00",
        "slug": "hola-rust",
        "status": "publish",
        "title": {"rendered": "Hola &amp; adi&oacute;s"},
        "excerpt": {"rendered": "<p>Un resumen</p>\n", "protected": false},
        "content": {"rendered": "<p style=\"color:red\">Cuerpo</p>\n<script>x()</script>", "protected": false},
        "_embedded": {
            "author": [{"id": 1, "name": "Ana", "avatar_urls": {"24": "a24.png", "48": "a48.png", "96": "a96.png"}}],
            "wp:featuredmedia": [{"source_url": "https://cdn.test/img.jpg", "alt_text": "", "media_details": {"width": 800}}],
            "wp:term": [[{"name": "Rust"}, {"name": "Web"}], [{"name": "wasm"}]]
        },
        "aioseo": {"title": "SEO title", "og_description": "OG desc"}
    }"#;

    fn transformed() -> TransformedPost {
        let raw: RawPost = serde_json::from_str(WORDPRESS_POST).unwrap();
        PostTransformer::default().transform(&raw)
    }

    #[test]
    fn transforms_text_fields() {
        let post = transformed();
        assert_eq!(post.id, 42);
        assert_eq!(post.title, "Hola & adiós");
        assert_eq!(post.excerpt, "Un resumen");
        assert_eq!(post.content, "<p>Cuerpo</p>");
        assert_eq!(post.plain_text_content, "Cuerpo");
        assert_eq!(post.date, "15 de marzo de 2024");
        assert_eq!(post.date_iso, "2024-03-15T10:30:00");
    }

    #[test]
    fn embedded_author_media_and_terms() {
        let post = transformed();
        assert_eq!(post.author.name, "Ana");
        assert_eq!(post.author.avatar_url, "a96.png");
        assert_eq!(
            post.featured_image,
            Some(FeaturedImage {
                url: "https://cdn.test/img.jpg".into(),
                alt: "Hola & adiós".into(),
                width: 800,
                height: 630,
            })
        );
        assert_eq!(post.categories, vec!["Rust", "Web"]);
        assert_eq!(post.tags, vec!["wasm"]);
    }

    #[test]
    fn seo_fallback_chain() {
        let seo = transformed().seo;
        assert_eq!(seo.title, "SEO title");
        assert_eq!(seo.description, "Un resumen");
        assert_eq!(seo.og_title, "SEO title");
        assert_eq!(seo.og_description, "OG desc");
        assert_eq!(seo.og_image.as_deref(), Some("https://cdn.test/img.jpg"));
        assert_eq!(seo.twitter_title, "SEO title");
        assert_eq!(seo.twitter_description, "Un resumen");
        assert_eq!(seo.twitter_image.as_deref(), Some("https://cdn.test/img.jpg"));
    }

    #[test]
    fn missing_embeds_use_defaults() {
        let raw = RawPost {
            id: 7,
            date: "2024-01-02T00:00:00".into(),
            slug: "bare".into(),
            title: "Bare".into(),
            ..Default::default()
        };
        let post = PostTransformer::default()
            .with_default_avatar("/me.png")
            .transform(&raw);

        assert_eq!(post.author.name, "Anonymous");
        assert_eq!(post.author.avatar_url, "/me.png");
        assert_eq!(post.featured_image, None);
        assert!(post.categories.is_empty());
        assert!(post.tags.is_empty());
        assert_eq!(post.seo.title, "Bare");
        assert_eq!(post.seo.og_image, None);
        assert_eq!(post.seo.twitter_image, None);
    }

    #[test]
    fn avatar_falls_back_to_48_then_placeholder() {
        let mut author = RawAuthor {
            name: Some(String::new()),
            avatar_urls: BTreeMap::from([("48".to_string(), "a48.png".to_string())]),
        };
        let mut raw = RawPost {
            embedded: Some(Embedded {
                author: vec![author.clone()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let transformer = PostTransformer::default();
        let post = transformer.transform(&raw);
        assert_eq!(post.author.name, "Anonymous");
        assert_eq!(post.author.avatar_url, "a48.png");

        author.avatar_urls.clear();
        raw.embedded = Some(Embedded {
            author: vec![author],
            ..Default::default()
        });
        assert_eq!(transformer.transform(&raw).author.avatar_url, DEFAULT_AVATAR);
    }

    #[test]
    fn media_without_source_url_is_not_featured() {
        let raw: RawPost = serde_json::from_str(
            r#"{"_embedded": {"wp:featuredmedia": [{"code": "rest_forbidden"}]}}"#,
        )
        .unwrap();
        assert_eq!(PostTransformer::default().transform(&raw).featured_image, None);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(transformed()).unwrap();
        assert_eq!(json["dateISO"], "2024-03-15T10:30:00");
        assert_eq!(json["plainTextContent"], "Cuerpo");
        assert_eq!(json["author"]["avatarUrl"], "a96.png");
        assert_eq!(json["featuredImage"]["width"], 800);
        assert_eq!(json["seo"]["ogDescription"], "OG desc");
    }

    #[test]
    fn reading_time_of_short_post_is_one_minute() {
        assert_eq!(transformed().reading_time(200), 1);
    }
}
