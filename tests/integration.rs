use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};
use tempfile::TempDir;
use wp_content::{
    BlogBuilder, ContentError, FsSource, MatchedField, MemorySource, PostSource, RawPost,
    RegexSanitizer, highlight,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CODE_BLOCK: &str = concat!(
    r#"<div class="wp-block-kevinbatdorf-code-block-pro" style="font-size:.875rem">"#,
    r#"<span role="button" tabindex="0" style="color:#adbac7" class="code-block-pro-copy-button">"#,
    r#"<pre class="code-block-pro-copy-button-pre"><textarea class="code-block-pro-copy-button-textarea">fn main() {"#,
    "\n",
    r#"    println!("hola");"#,
    "\n",
    r#"}</textarea></pre></span>"#,
    r#"<pre class="shiki" style="background-color: #22272e"><code>"#,
    r#"<span class="line"><span style="color: #F47067">fn</span><span style="color: #ADBAC7"> main() {</span></span>"#,
    "\n",
    r#"<span class="line"><span style="color: #ADBAC7">    println!(&quot;hola&quot;);</span></span>"#,
    "\n",
    r#"<span class="line"><span style="color: #ADBAC7">}</span></span></code></pre></div>"#,
);

/// A WordPress REST payload as returned by `/posts?_embed`.
fn wp_post(id: u64, slug: &str, date: &str, title: &str, excerpt: &str, body: &str) -> Value {
    json!({
        "id": id,
        "date": date,
        "date_gmt": date,
        "slug": slug,
        "status": "publish",
        "type": "post",
        "title": { "rendered": title },
        "excerpt": { "rendered": format!("<p>{excerpt}</p>\n"), "protected": false },
        "content": { "rendered": body, "protected": false },
        "categories": [3],
        "_embedded": {
            "author": [{ "id": 1, "name": "Lucía", "avatar_urls": { "96": "https://gravatar.test/96" } }],
            "wp:term": [[{ "name": "Rust" }], [{ "name": "async" }, { "name": "tokio" }]]
        }
    })
}

fn fixture_posts() -> Vec<Value> {
    vec![
        wp_post(
            1,
            "rust-ownership",
            "2024-03-15T10:30:00",
            "Rust Ownership",
            "memory safety",
            "<p>Borrowing   rules.</p>\n<script>track()</script>",
        ),
        wp_post(
            2,
            "go-channels",
            "2024-02-01T09:00:00",
            "Go Channels",
            "concurrency in rust",
            "<p>Channels and goroutines.</p>",
        ),
        wp_post(
            3,
            "hola-mundo",
            "2024-04-20T18:45:00",
            "Hola &#8220;mundo&#8221;",
            "primer programa",
            &format!("<p>Un ejemplo:</p>\n{CODE_BLOCK}"),
        ),
    ]
}

fn write_fixture(dir: &TempDir) {
    for post in fixture_posts() {
        let slug = post["slug"].as_str().unwrap().to_string();
        let path = dir.path().join(format!("{slug}.json"));
        std::fs::write(path, serde_json::to_vec_pretty(&post).unwrap()).unwrap();
    }
}

fn memory_source() -> MemorySource {
    let posts = fixture_posts()
        .into_iter()
        .map(|post| serde_json::from_value::<RawPost>(post).unwrap())
        .collect();
    MemorySource::new(posts)
}

/// Source that always fails -- for testing error paths.
#[derive(Clone, Default)]
struct FailingSource {
    calls: Arc<AtomicUsize>,
}

impl FailingSource {
    fn fail(&self) -> ContentError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ContentError::Status(503)
    }
}

impl PostSource for FailingSource {
    async fn posts(&self, _page: usize, _per_page: usize) -> wp_content::Result<Vec<RawPost>> {
        Err(self.fail())
    }

    async fn post_by_slug(&self, _slug: &str) -> wp_content::Result<Option<RawPost>> {
        Err(self.fail())
    }

    async fn total_posts(&self) -> wp_content::Result<usize> {
        Err(self.fail())
    }

    async fn slugs(&self) -> wp_content::Result<Vec<String>> {
        Err(self.fail())
    }
}

// ---------------------------------------------------------------------------
// FsSource tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fs_source_lists_newest_first() {
    let tmp = TempDir::new().unwrap();
    write_fixture(&tmp);
    let source = FsSource::new(tmp.path());

    let slugs: Vec<_> = source
        .posts(1, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.slug)
        .collect();
    assert_eq!(slugs, vec!["hola-mundo", "rust-ownership", "go-channels"]);
    assert_eq!(source.total_posts().await.unwrap(), 3);
    assert_eq!(source.slugs().await.unwrap(), slugs);
}

#[tokio::test]
async fn fs_source_paginates() {
    let tmp = TempDir::new().unwrap();
    write_fixture(&tmp);
    let source = FsSource::new(tmp.path());

    let second = source.posts(2, 2).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].slug, "go-channels");
    assert!(source.posts(3, 2).await.unwrap().is_empty());
}

#[tokio::test]
async fn fs_source_lookup_by_slug() {
    let tmp = TempDir::new().unwrap();
    write_fixture(&tmp);
    let source = FsSource::new(tmp.path());

    let post = source.post_by_slug("go-channels").await.unwrap().unwrap();
    assert_eq!(post.id, 2);
    assert!(source.post_by_slug("nope").await.unwrap().is_none());
    assert!(source.post_by_slug("../go-channels").await.unwrap().is_none());
}

#[tokio::test]
async fn fs_source_skips_malformed_files() {
    let tmp = TempDir::new().unwrap();
    write_fixture(&tmp);
    std::fs::write(tmp.path().join("broken.json"), b"{ not json").unwrap();
    std::fs::write(tmp.path().join("notes.txt"), b"ignored").unwrap();
    let source = FsSource::new(tmp.path());

    assert_eq!(source.total_posts().await.unwrap(), 3);
    assert!(matches!(
        source.post_by_slug("broken").await,
        Err(ContentError::Decode(_))
    ));
}

#[tokio::test]
async fn fs_source_fills_missing_slug_from_file_name() {
    let tmp = TempDir::new().unwrap();
    let post = json!({ "id": 9, "date": "2024-01-01T00:00:00", "title": { "rendered": "Sin slug" } });
    std::fs::write(tmp.path().join("sin-slug.json"), post.to_string()).unwrap();
    let source = FsSource::new(tmp.path());

    assert_eq!(source.slugs().await.unwrap(), vec!["sin-slug"]);
    assert_eq!(
        source.post_by_slug("sin-slug").await.unwrap().unwrap().slug,
        "sin-slug"
    );
}

// ---------------------------------------------------------------------------
// End-to-end: Blog over a source
// ---------------------------------------------------------------------------

#[tokio::test]
async fn e2e_page_transforms_and_paginates() {
    let tmp = TempDir::new().unwrap();
    write_fixture(&tmp);
    let blog = BlogBuilder::new(FsSource::new(tmp.path()))
        .per_page(2)
        .build()
        .unwrap();

    let first = blog.page(1).await;
    assert_eq!(first.total_posts, 3);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next);
    assert!(!first.has_prev);
    assert_eq!(first.posts.len(), 2);
    assert_eq!(first.posts[0].title, "Hola \u{201c}mundo\u{201d}");
    assert_eq!(first.posts[0].date, "20 de abril de 2024");

    let second = blog.page(2).await;
    assert!(!second.has_next);
    assert!(second.has_prev);
    assert_eq!(second.posts[0].slug, "go-channels");
}

#[tokio::test]
async fn e2e_post_content_is_processed() {
    let blog = BlogBuilder::new(memory_source()).build().unwrap();
    let post = blog.post_by_slug("rust-ownership").await.unwrap();

    assert_eq!(post.content, "<p>Borrowing rules.</p>");
    assert_eq!(post.plain_text_content, "Borrowing rules.");
    assert_eq!(post.excerpt, "memory safety");
    assert_eq!(post.author.name, "Lucía");
    assert_eq!(post.author.avatar_url, "https://gravatar.test/96");
    assert_eq!(post.categories, vec!["Rust"]);
    assert_eq!(post.tags, vec!["async", "tokio"]);
    assert_eq!(post.seo.og_title, "Rust Ownership");
}

#[tokio::test]
async fn e2e_code_block_rewritten() {
    let blog = BlogBuilder::new(memory_source()).build().unwrap();
    let post = blog.post_by_slug("hola-mundo").await.unwrap();

    assert!(post.content.starts_with(
        r#"<p>Un ejemplo:</p><div class="wp-block-code-block-pro"><div class="code-block-header"><span class="code-language">Code</span>"#
    ));
    assert!(post.content.contains(concat!(
        r#"data-code="fn main() {"#,
        "\n",
        r#"    println!(&quot;hola&quot;);"#,
        "\n",
        r#"}""#
    )));
    assert!(!post.content.contains("code-block-pro-copy-button-textarea"));
    assert!(!post.content.contains("color: #F47067"));
    assert!(post.plain_text_content.contains("println!(\"hola\");"));
    assert_eq!(post.plain_text_content, wp_content::strip_html(&post.content));
}

#[tokio::test]
async fn e2e_search_over_fetched_posts() {
    let blog = BlogBuilder::new(memory_source()).build().unwrap();
    let posts = blog.posts(1).await;
    let results = blog.search(&posts, "rust");

    let ranked: Vec<_> = results
        .iter()
        .map(|r| (r.post.slug.as_str(), r.match_score, r.matched_field))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("rust-ownership", 15, MatchedField::Title),
            ("go-channels", 5, MatchedField::Excerpt),
        ]
    );
    assert_eq!(
        highlight(&results[1].highlighted_text, "rust"),
        r#"concurrency in <mark class="bg-yellow-200 dark:bg-yellow-900/50">rust</mark>"#
    );
}

#[tokio::test]
async fn e2e_search_limit_is_configurable() {
    let blog = BlogBuilder::new(memory_source())
        .search_limit(1)
        .build()
        .unwrap();
    let posts = blog.posts(1).await;
    assert_eq!(blog.search(&posts, "rust").len(), 1);
}

#[tokio::test]
async fn e2e_extra_sanitizers_and_minify_toggle() {
    let blog = BlogBuilder::new(memory_source())
        .minify(false)
        .add_sanitizer(RegexSanitizer::new(vec![("Borrowing", "Lending")]))
        .build()
        .unwrap();
    let post = blog.post_by_slug("rust-ownership").await.unwrap();
    assert_eq!(post.content, "<p>Lending   rules.</p>\n");
}

#[tokio::test]
async fn e2e_failing_source_degrades_to_empty() {
    let source = FailingSource::default();
    let calls = source.calls.clone();
    let blog = BlogBuilder::new(source).build().unwrap();

    assert!(blog.posts(1).await.is_empty());
    assert!(blog.post_by_slug("anything").await.is_none());
    assert_eq!(blog.total_posts().await, 0);
    assert!(blog.slugs().await.is_empty());

    let page = blog.page(1).await;
    assert!(page.posts.is_empty());
    assert_eq!(page.total_pages, 0);
    assert!(!page.has_next);

    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn e2e_transform_without_fetching() {
    let blog = BlogBuilder::new(MemorySource::default())
        .default_avatar("/avatar.png")
        .build()
        .unwrap();
    let raw: RawPost = serde_json::from_value(json!({
        "id": 5,
        "date": "2024-12-24T20:00:00",
        "slug": "nochebuena",
        "title": { "rendered": "Nochebuena" },
        "content": { "rendered": "<p>Feliz   Navidad</p>" }
    }))
    .unwrap();

    let post = blog.transform(&raw);
    assert_eq!(post.content, "<p>Feliz Navidad</p>");
    assert_eq!(post.date, "24 de diciembre de 2024");
    assert_eq!(post.author.name, "Anonymous");
    assert_eq!(post.author.avatar_url, "/avatar.png");
    assert_eq!(post.reading_time(200), 1);
}
