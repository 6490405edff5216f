//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop, including:
//! - Seeding and draining the frontier
//! - Rendering pages under a per-page time bound
//! - Fanning out image classification and stylesheet scanning per page
//! - Enqueuing in-scope page links one level deeper
//! - Stopping early on a crawl deadline or shutdown signal

use crate::config::{validate, Config};
use crate::crawler::css::scan_stylesheet;
use crate::crawler::fetcher::{build_http_client, fetch_bytes, fetch_text};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::extract_links;
use crate::crawler::renderer::PageRenderer;
use crate::events::{EventLog, TracingEventLog, LINK, VISITED_LINKS};
use crate::image::{inspect_bytes, inspect_inline, ImageMetadata, ResourceClassifier};
use crate::output::{CrawlReport, ImageRecord};
use crate::state::{CrawlContext, VisitMark};
use crate::url::{Link, Locator, Scope};
use crate::HarvestError;
use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Main crawler coordinator structure
///
/// A coordinator holds everything that is fixed for a crawl: validated
/// configuration, the scope, the HTTP client and the event sink. Mutable
/// crawl state lives in a [`CrawlContext`] created per run.
pub struct Coordinator {
    config: Config,
    scope: Scope,
    seed: Link,
    client: Client,
    classifier: ResourceClassifier,
    events: Arc<dyn EventLog>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the client is built
    /// * `Err(HarvestError)` - Invalid configuration or client setup failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        validate(&config)?;

        let scope = Scope::new(&config.scope.base_url)?;
        let seed = Link::parse(&config.scope.base_url)?;
        let client = build_http_client(&config.http)
            .map_err(|e| HarvestError::Session(format!("failed to build HTTP client: {}", e)))?;
        let classifier = ResourceClassifier::new(client.clone());

        Ok(Self {
            config,
            scope,
            seed,
            client,
            classifier,
            events: Arc::new(TracingEventLog),
        })
    }

    /// Replaces the event sink
    pub fn with_event_log(mut self, events: Arc<dyn EventLog>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The shared HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Runs a crawl to completion
    pub async fn run<R: PageRenderer>(&self, renderer: &R) -> CrawlReport {
        self.run_until(renderer, std::future::pending()).await
    }

    /// Runs a crawl until the frontier drains, the configured crawl deadline
    /// passes, or `shutdown` resolves
    ///
    /// An early stop abandons the page in flight and returns the catalog
    /// built so far, with `interrupted` set.
    ///
    /// This method:
    /// 1. Seeds the frontier with the base URL at depth 0
    /// 2. Dequeues pages, skipping those past the depth bound or already rendered
    /// 3. Renders each page and processes its images and stylesheets
    /// 4. Enqueues unvisited in-scope page links at depth + 1
    pub async fn run_until<R, F>(&self, renderer: &R, shutdown: F) -> CrawlReport
    where
        R: PageRenderer,
        F: Future<Output = ()>,
    {
        let started_at = Utc::now();
        let start_time = Instant::now();
        let max_depth = self.config.scope.max_depth;
        let ctx = CrawlContext::new();

        ctx.visited().claim(&self.seed.locator, VisitMark::PageQueued);
        ctx.counters().page_seen();
        let mut frontier = Frontier::seeded(self.seed.clone());

        tracing::info!(
            "Starting crawl of {} (max depth {})",
            self.scope.base(),
            max_depth
        );

        let crawl_timeout = self.config.crawl.timeout_secs.map(Duration::from_secs);
        let deadline = async move {
            match crawl_timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);
        tokio::pin!(shutdown);

        let mut interrupted = false;

        while let Some(entry) = frontier.dequeue() {
            if entry.depth > max_depth {
                tracing::debug!(
                    "Skipping {} at depth {} (max {})",
                    entry.locator,
                    entry.depth,
                    max_depth
                );
                continue;
            }

            if !ctx.visited().begin_render(&entry.locator) {
                continue;
            }

            let discovered = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::warn!("Shutdown requested, stopping crawl");
                    interrupted = true;
                    break;
                }
                _ = &mut deadline => {
                    tracing::warn!("Crawl deadline reached, stopping crawl");
                    interrupted = true;
                    break;
                }
                pages = self.process_page(renderer, &ctx, &entry) => pages,
            };

            for page in discovered {
                if !self.scope.contains(&page.locator) {
                    continue;
                }

                if ctx.visited().claim(&page.locator, VisitMark::PageQueued) {
                    ctx.counters().page_seen();
                    frontier.enqueue(page, entry.depth + 1);
                }
            }

            tracing::debug!(
                "Progress: {} pages explored, {} in frontier, {} images",
                ctx.counters().pages_rendered(),
                frontier.len(),
                ctx.catalog_len()
            );
        }

        tracing::debug!(
            "Visited set: {} pages, {} images, {} locators total",
            ctx.visited().count_where(VisitMark::is_page),
            ctx.visited().count_where(|mark| mark.verdict() == Some(true)),
            ctx.visited().len()
        );

        let counters = ctx.counters();
        let total_links_visited = counters.pages_seen();
        let links_explored = counters.pages_rendered();
        let pages_failed = counters.pages_failed();
        let images_rejected = counters.images_rejected();
        let resources_seen = ctx.visited().len() as u64;
        let images = ctx.into_catalog();

        tracing::info!(
            "Crawl completed: {} pages explored, {} images catalogued ({} filtered) in {:?}",
            links_explored,
            images.len(),
            images_rejected,
            start_time.elapsed()
        );

        CrawlReport {
            success: !interrupted,
            total_links_visited,
            links_explored,
            pages_failed,
            resources_seen,
            interrupted,
            started_at,
            finished_at: Utc::now(),
            images,
        }
    }

    /// Renders one page and processes everything it references
    ///
    /// Returns the page's anchor targets; scope and visited filtering happen
    /// in the caller. The visit is logged whether or not rendering succeeded.
    async fn process_page<R: PageRenderer>(
        &self,
        renderer: &R,
        ctx: &CrawlContext,
        entry: &FrontierEntry,
    ) -> Vec<Link> {
        let started = Instant::now();
        let url = entry.url.as_str();
        let page_timeout = Duration::from_secs(self.config.renderer.page_timeout_secs);

        let rendered = match tokio::time::timeout(page_timeout, renderer.render(url)).await {
            Ok(result) => result,
            Err(_) => Err(HarvestError::RenderTimeout {
                url: url.to_string(),
            }),
        };

        let pages = match rendered {
            Ok(html) => {
                ctx.counters().page_rendered();
                self.harvest_page(ctx, &entry.url, &html).await
            }
            Err(e) => {
                ctx.counters().page_failed();
                tracing::warn!("Failed to render {}: {}", url, e);
                Vec::new()
            }
        };

        self.events.record(
            VISITED_LINKS,
            &format!(
                "Visited: {} - Time taken: {:.2} seconds - Depth: {}",
                entry.locator,
                started.elapsed().as_secs_f64(),
                entry.depth
            ),
        );

        pages
    }

    /// Handles the images and stylesheets of a rendered page concurrently
    async fn harvest_page(&self, ctx: &CrawlContext, page_url: &Url, html: &str) -> Vec<Link> {
        let links = extract_links(html, page_url);
        tracing::debug!(
            "Found {} images, {} stylesheets, {} links on {}",
            links.images.len(),
            links.stylesheets.len(),
            links.pages.len(),
            page_url
        );

        let images = join_all(links.images.iter().map(|image| self.handle_image(ctx, image)));
        let stylesheets = join_all(
            links
                .stylesheets
                .iter()
                .map(|sheet| self.handle_stylesheet(ctx, sheet)),
        );
        tokio::join!(images, stylesheets);

        links.pages
    }

    /// Fetches a stylesheet and handles every image it references
    async fn handle_stylesheet(&self, ctx: &CrawlContext, sheet: &Link) {
        let key = &sheet.locator;
        if !ctx.visited().claim(key, VisitMark::Stylesheet) {
            self.events.record(
                VISITED_LINKS,
                &format!("Skipped duplicate stylesheet URL: {}", key),
            );
            return;
        }

        self.events
            .record(VISITED_LINKS, &format!("Exploring CSS file: {}", key));

        let css = match fetch_text(&self.client, sheet.url.as_str()).await {
            Ok((css, _)) => css,
            Err(e) => {
                tracing::warn!("Failed to fetch stylesheet {}: {}", key, e);
                return;
            }
        };

        let images = scan_stylesheet(&css, &sheet.url);
        tracing::debug!("Found {} image references in {}", images.len(), key);

        join_all(images.iter().map(|image| self.handle_image(ctx, image))).await;
    }

    /// Classifies, inspects and catalogues one image candidate
    async fn handle_image(&self, ctx: &CrawlContext, image: &Locator) {
        if !ctx.visited().claim(image, VisitMark::Pending) {
            if let Some(mark) = ctx.visited().mark(image) {
                tracing::trace!("{} already marked {}", image.abbreviated(), mark);
            }
            self.events.record(
                VISITED_LINKS,
                &format!("Skipped duplicate image URL: {}", image.abbreviated()),
            );
            return;
        }

        if !self.classifier.is_image(ctx.visited(), image).await {
            self.events.record(
                VISITED_LINKS,
                &format!("Skipped non-image URL: {}", image.abbreviated()),
            );
            return;
        }

        let metadata = match self.inspect(image).await {
            Ok(metadata) => metadata,
            Err(HarvestError::TooLarge { size, limit, .. }) => {
                ctx.counters().image_rejected();
                tracing::debug!(
                    "Skipping {}: {} bytes exceeds {} byte limit",
                    image.abbreviated(),
                    size,
                    limit
                );
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to inspect {}: {}", image.abbreviated(), e);
                return;
            }
        };

        let record = ImageRecord::new(image.clone(), metadata, ctx.next_stamp());
        let scope = &self.config.scope;
        if !scope.size_allowed(record.size) || !scope.extension_allowed(&record.extension) {
            ctx.counters().image_rejected();
            tracing::debug!(
                "Filtered {} ({} bytes, .{})",
                image.abbreviated(),
                record.size,
                record.extension
            );
            return;
        }

        if ctx.insert_record(record) {
            self.events.record(LINK, image.as_str());
            self.events.record(
                VISITED_LINKS,
                &format!("Image data extracted and saved: {}", image.abbreviated()),
            );
        }
    }

    /// Reads metadata from inline data or from the downloaded bytes
    async fn inspect(&self, image: &Locator) -> Result<ImageMetadata, HarvestError> {
        if let Some(data) = image.inline_data() {
            let data = data?;
            return inspect_inline(&data).map_err(|e| decode_error(image, e));
        }

        let limit = Some(self.config.scope.max_image_size);
        let body = fetch_bytes(&self.client, image.as_str(), limit).await?;

        inspect_bytes(&body.bytes, body.content_type.as_deref()).map_err(|e| decode_error(image, e))
    }
}

fn decode_error(image: &Locator, error: impl std::fmt::Display) -> HarvestError {
    HarvestError::Decode {
        locator: image.abbreviated().into_owned(),
        message: error.to_string(),
    }
}
