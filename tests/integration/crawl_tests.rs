//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end with the plain-HTTP page renderer.

use image_harvest::config::{Config, RendererKind, ScopeConfig};
use image_harvest::crawler::{Coordinator, HttpRenderer};
use image_harvest::events::{MemoryEventLog, LINK, VISITED_LINKS};
use image_harvest::{crawl, CrawlReport, HarvestError, Locator};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given base URL and depth
fn create_test_config(base_url: &str, max_depth: u32) -> Config {
    let mut scope = ScopeConfig::new(base_url);
    scope.max_depth = max_depth;

    let mut config = Config::with_scope(scope);
    config.renderer.kind = RendererKind::Http;
    config.renderer.page_timeout_secs = 10;
    config
}

/// Minimal PNG header: signature + IHDR declaring the given size
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0, 0, 0, 13]);
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .mount(server)
        .await;
}

async fn mount_png(server: &MockServer, route: &str, width: u32, height: u32) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(width, height), "image/png"))
        .mount(server)
        .await;
}

async fn run_crawl(config: Config, events: Arc<MemoryEventLog>) -> CrawlReport {
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_event_log(events);
    let renderer = HttpRenderer::new(coordinator.client().clone());
    coordinator.run(&renderer).await
}

fn locator(raw: &str) -> Locator {
    Locator::parse(raw).expect("Failed to parse locator")
}

#[tokio::test]
async fn test_page_and_stylesheet_images_at_depth_zero() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><link rel="stylesheet" href="/css/site.css"></head>
        <body><img src="/a.png"></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/css/site.css"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("body { background: url(../b.png); }", "text/css"),
        )
        .mount(&server)
        .await;
    mount_png(&server, "/a.png", 3, 2).await;
    mount_png(&server, "/b.png", 8, 8).await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&format!("{}/", base_url), 0), events.clone()).await;

    assert!(report.success);
    assert_eq!(report.links_explored, 1);
    assert_eq!(report.images.len(), 2);

    let a = report
        .images
        .get(&locator(&format!("{}/a.png", base_url)))
        .expect("a.png should be catalogued");
    assert_eq!(a.name, "a.png");
    assert_eq!(a.format, "png");
    assert_eq!(a.width, Some(3));
    assert_eq!(a.height, Some(2));
    assert_eq!(a.extension, "png");
    assert_eq!(a.size, png_bytes(3, 2).len() as u64);

    let b = report
        .images
        .get(&locator(&format!("{}/b.png", base_url)))
        .expect("b.png should be catalogued");
    assert_eq!(b.width, Some(8));

    assert_eq!(events.messages(LINK).len(), 2);
    assert!(events
        .messages(VISITED_LINKS)
        .iter()
        .any(|m| m.starts_with("Exploring CSS file:")));
}

#[tokio::test]
async fn test_404_metadata_fetch_fails_closed() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<img src="/gone.png"><img src="/ok.png">"#).await;
    Mock::given(method("HEAD"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    // A non-image is never downloaded
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;
    mount_png(&server, "/ok.png", 1, 1).await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&server.uri(), 0), events.clone()).await;

    assert!(report.success);
    assert_eq!(report.images.len(), 1);
    assert!(!report
        .images
        .contains(&locator(&format!("{}/gone.png", server.uri()))));
    assert!(events
        .messages(VISITED_LINKS)
        .iter()
        .any(|m| m.starts_with("Skipped non-image URL:") && m.ends_with("/gone.png")));
}

#[tokio::test]
async fn test_off_scope_links_never_rendered() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="/inside">in</a><a href="{}/outside">out</a>"#,
            other.uri()
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/inside"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>inside</p>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>outside</p>", "text/html"))
        .expect(0)
        .mount(&other)
        .await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&server.uri(), 1), events.clone()).await;

    assert_eq!(report.links_explored, 2);
    // base + /inside; the off-scope page never enters the frontier
    assert_eq!(report.total_links_visited, 2);
}

#[tokio::test]
async fn test_directory_base_resolves_relative_references() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/docs/",
        r#"<a href="intro">intro</a><img src="logo.png">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/intro"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>intro</p>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;
    mount_png(&server, "/docs/logo.png", 2, 2).await;

    let events = Arc::new(MemoryEventLog::new());
    let config = create_test_config(&format!("{}/docs/", server.uri()), 1);
    let report = run_crawl(config, events).await;

    assert_eq!(report.links_explored, 2);
    assert_eq!(report.total_links_visited, 2);
    assert!(report
        .images
        .contains(&locator(&format!("{}/docs/logo.png", server.uri()))));
}

#[tokio::test]
async fn test_depth_bound_stops_traversal() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/next">next</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>next</p>", "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&server.uri(), 0), events).await;

    assert_eq!(report.links_explored, 1);
}

#[tokio::test]
async fn test_breadth_first_visit_order() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/a/deep">deep</a>"#).await;
    mount_page(&server, "/b", "<p>b</p>").await;
    mount_page(&server, "/a/deep", "<p>deep</p>").await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&server.uri(), 2), events.clone()).await;

    assert_eq!(report.links_explored, 4);

    let base = server.uri();
    let order: Vec<String> = events
        .messages(VISITED_LINKS)
        .into_iter()
        .filter(|m| m.starts_with("Visited: "))
        .collect();
    let expected = [
        format!("Visited: {} ", base),
        format!("Visited: {}/a ", base),
        format!("Visited: {}/b ", base),
        format!("Visited: {}/a/deep ", base),
    ];
    assert_eq!(order.len(), expected.len());
    for (visit, prefix) in order.iter().zip(expected.iter()) {
        assert!(visit.starts_with(prefix.as_str()), "{} vs {}", visit, prefix);
    }
}

#[tokio::test]
async fn test_duplicate_image_classified_once() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<link rel="stylesheet" href="/site.css">
        <img src="/shared.png"><img src="/shared.png#again"><a href="/two">two</a>"#,
    )
    .await;
    mount_page(&server, "/two", r#"<img src="/shared.png/">"#).await;
    Mock::given(method("GET"))
        .and(path("/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("x { background: url('/shared.png') }", "text/css"))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/shared.png"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shared.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(4, 4), "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&server.uri(), 1), events.clone()).await;

    assert_eq!(report.links_explored, 2);
    assert_eq!(report.images.len(), 1);
    assert_eq!(events.messages(LINK).len(), 1);
}

#[tokio::test]
async fn test_inline_svg_image() {
    let server = MockServer::start().await;

    // "<svg></svg>" is 11 bytes once decoded
    mount_page(
        &server,
        "/",
        r#"<img src="data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=">"#,
    )
    .await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&server.uri(), 0), events).await;

    assert_eq!(report.images.len(), 1);
    let record = report.images.records().next().expect("one record");
    assert_eq!(record.width, None);
    assert_eq!(record.height, None);
    assert_eq!(record.format, "svg");
    assert_eq!(record.size, 11);
    assert!(record.name.starts_with("image-"));
    assert!(record.name.ends_with(".svg"));
}

#[tokio::test]
async fn test_remote_svg_recorded_without_dimensions() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<img src="/logo.svg">"#).await;
    Mock::given(method("HEAD"))
        .and(path("/logo.svg"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/svg+xml"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"></svg>"#,
            "image/svg+xml",
        ))
        .mount(&server)
        .await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&server.uri(), 0), events).await;

    let record = report
        .images
        .get(&locator(&format!("{}/logo.svg", server.uri())))
        .expect("logo.svg should be catalogued");
    assert_eq!(record.format, "svg");
    assert_eq!(record.width, None);
    assert_eq!(record.extension, "svg");
}

#[tokio::test]
async fn test_extension_and_size_filters() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<img src="/small.png"><img src="/big.png"><img src="/anim.gif">"#,
    )
    .await;
    mount_png(&server, "/small.png", 1, 1).await;
    Mock::given(method("HEAD"))
        .and(path("/big.png"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
        .mount(&server)
        .await;
    let mut big = png_bytes(100, 100);
    big.resize(4096, 0);
    Mock::given(method("GET"))
        .and(path("/big.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(big, "image/png"))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/anim.gif"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/gif"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/anim.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"GIF89a\x01\x00\x01\x00\x00\x00\x00".to_vec(), "image/gif"))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), 0);
    config.scope.max_image_size = 1024;
    config.scope.allowed_extensions = vec![".PNG".to_string()];

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(config, events).await;

    assert_eq!(report.images.len(), 1);
    assert!(report
        .images
        .contains(&locator(&format!("{}/small.png", server.uri()))));
}

#[tokio::test]
async fn test_failed_stylesheet_is_not_fatal() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<link rel="stylesheet" href="/missing.css"><img src="/a.png">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing.css"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_png(&server, "/a.png", 2, 2).await;

    let events = Arc::new(MemoryEventLog::new());
    let report = run_crawl(create_test_config(&server.uri(), 0), events).await;

    assert!(report.success);
    assert_eq!(report.images.len(), 1);
}

#[tokio::test]
async fn test_crawl_entry_point_with_http_renderer() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<img src="/a.png">"#).await;
    mount_png(&server, "/a.png", 5, 6).await;

    let report = crawl(create_test_config(&server.uri(), 2))
        .await
        .expect("Crawl failed");

    assert!(report.success);
    assert_eq!(report.links_explored, 1);

    let json = serde_json::to_value(&report).expect("Failed to serialize report");
    let key = format!("{}/a.png", server.uri());
    assert_eq!(json["linksExplored"], 1);
    assert_eq!(json["images"][key.as_str()]["width"], 5);
    assert_eq!(json["images"][key.as_str()]["height"], 6);
}

#[tokio::test]
async fn test_missing_base_url_is_config_error() {
    let result = crawl(Config::default()).await;
    assert!(matches!(result, Err(HarvestError::Config(_))));
}
