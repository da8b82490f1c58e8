//! Listing pagination and product link collection
//!
//! A listing root is walked page by page (`/page/2/`, `/page/3/`, ...) until the
//! page ceiling is reached or enough consecutive pages turn up nothing new.

use crate::config::{CrawlerConfig, DEFAULT_MAX_PAGES, DEFAULT_STOP_AFTER_EMPTY_PAGES};
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::parser::extract_product_links;
use crate::url::ProductUrlPattern;
use crate::ScrapeError;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Termination limits for one listing root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Hard ceiling on listing pages fetched
    pub max_pages: u32,

    /// Consecutive pages without an unseen product URL before stopping
    pub stop_after_empty_pages: u32,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            stop_after_empty_pages: DEFAULT_STOP_AFTER_EMPTY_PAGES,
        }
    }
}

impl From<&CrawlerConfig> for CrawlLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            stop_after_empty_pages: config.stop_after_empty_pages,
        }
    }
}

/// Why collection over a listing root ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every page up to the ceiling was fetched
    CeilingReached,

    /// Too many consecutive pages produced no unseen URL
    NoNewLinks,

    /// The abort signal fired
    Cancelled,
}

/// Progress of a single listing walk
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Every product URL seen so far
    pub visited_urls: HashSet<String>,

    /// The same URLs in first-seen order
    pub discovered: Vec<String>,

    /// Page numbers still to fetch, produced lazily up to the ceiling
    pub pending_pages: RangeInclusive<u32>,

    /// Consecutive pages that yielded nothing new
    pub pages_without_new_links: u32,

    /// Fetch calls issued
    pub pages_fetched: u32,

    pub stop_reason: Option<StopReason>,
}

impl CrawlState {
    pub fn new(limits: &CrawlLimits) -> Self {
        Self {
            visited_urls: HashSet::new(),
            discovered: Vec::new(),
            pending_pages: 1..=limits.max_pages,
            pages_without_new_links: 0,
            pages_fetched: 0,
            stop_reason: None,
        }
    }

    /// Adds unseen URLs and returns how many were new
    pub fn record_links(&mut self, links: Vec<String>) -> usize {
        let mut added = 0;
        for link in links {
            if self.visited_urls.insert(link.clone()) {
                self.discovered.push(link);
                added += 1;
            }
        }

        if added == 0 {
            self.pages_without_new_links += 1;
        } else {
            self.pages_without_new_links = 0;
        }
        added
    }

    /// Next page to fetch, or None once a stop condition holds
    ///
    /// Sets `stop_reason` when it returns None.
    pub fn next_page(&mut self, limits: &CrawlLimits) -> Option<u32> {
        if self.stop_reason.is_some() {
            return None;
        }
        if self.pages_without_new_links >= limits.stop_after_empty_pages {
            self.stop_reason = Some(StopReason::NoNewLinks);
            return None;
        }
        let page = self.pending_pages.next();
        if page.is_none() {
            self.stop_reason = Some(StopReason::CeilingReached);
        }
        page
    }
}

/// URL of listing page `page` under `root`
///
/// # Examples
///
/// ```
/// use catalog_harvest::crawler::listing_page_url;
/// use url::Url;
///
/// let root = Url::parse("https://shop.example.com/cat/face-care/").unwrap();
/// assert_eq!(listing_page_url(&root, 1).as_str(), "https://shop.example.com/cat/face-care/");
/// assert_eq!(
///     listing_page_url(&root, 3).as_str(),
///     "https://shop.example.com/cat/face-care/page/3/"
/// );
/// ```
pub fn listing_page_url(root: &Url, page: u32) -> Url {
    if page <= 1 {
        return root.clone();
    }

    let mut url = root.clone();
    url.set_query(None);
    url.set_fragment(None);
    let path = format!("{}/page/{}/", root.path().trim_end_matches('/'), page);
    url.set_path(&path);
    url
}

/// Walks one listing root and returns the full crawl state
///
/// Failure to fetch the first page is an error; any later failure counts as a
/// page without new links.
pub async fn crawl_listing<F>(
    fetcher: &F,
    listing_root: &Url,
    pattern: &ProductUrlPattern,
    limits: &CrawlLimits,
    cancel: &CancellationToken,
) -> Result<CrawlState, ScrapeError>
where
    F: PageFetcher + ?Sized,
{
    let mut state = CrawlState::new(limits);

    while let Some(page) = state.next_page(limits) {
        if cancel.is_cancelled() {
            tracing::info!("Collection from {} cancelled", listing_root);
            state.stop_reason = Some(StopReason::Cancelled);
            break;
        }

        let page_url = listing_page_url(listing_root, page);
        tracing::debug!("Fetching listing page {}: {}", page, page_url);

        let result = fetcher.fetch(page_url.as_str()).await;
        state.pages_fetched += 1;

        match result {
            FetchResult::Success {
                final_url, body, ..
            } => {
                let base = Url::parse(&final_url).unwrap_or_else(|_| page_url.clone());
                let links = extract_product_links(&body, &base, pattern);
                let found = links.len();
                let added = state.record_links(links);
                tracing::info!(
                    "Listing page {}: {} product links, {} new ({} total)",
                    page,
                    found,
                    added,
                    state.discovered.len()
                );
            }
            failure if page == 1 => {
                return Err(ScrapeError::StartPageUnreachable {
                    url: page_url.to_string(),
                    reason: failure.describe(),
                });
            }
            failure => {
                tracing::warn!(
                    "Listing page {} unavailable ({}), counting as empty",
                    page_url,
                    failure.describe()
                );
                state.record_links(Vec::new());
            }
        }
    }

    tracing::info!(
        "Finished {} after {} pages ({:?}), {} product URLs",
        listing_root,
        state.pages_fetched,
        state.stop_reason,
        state.discovered.len()
    );
    Ok(state)
}

/// Collects every product URL reachable from a listing root's pages
///
/// Returns absolute, normalized, deduplicated URLs in discovery order. If the
/// abort signal fires, the URLs gathered so far are returned.
pub async fn collect_product_links<F>(
    fetcher: &F,
    listing_root: &Url,
    pattern: &ProductUrlPattern,
    limits: &CrawlLimits,
    cancel: &CancellationToken,
) -> Result<Vec<String>, ScrapeError>
where
    F: PageFetcher + ?Sized,
{
    let state = crawl_listing(fetcher, listing_root, pattern, limits, cancel).await?;
    Ok(state.discovered)
}
