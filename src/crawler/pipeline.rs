//! Harvest pipeline - main orchestration logic
//!
//! The pipeline coordinates a whole run:
//! - Validating configuration before any request
//! - Collecting product links from every listing root
//! - Fetching each product page and extracting its record
//! - Tracking statistics and honoring the abort signal

use crate::config::{validate, Config};
use crate::crawler::collector::{crawl_listing, CrawlLimits};
use crate::crawler::fetcher::{FetchResult, HttpFetcher, PageFetcher};
use crate::extract::{extract_record, BrandTable, ProductDocument, ProductRecord};
use crate::output::ExtractionStats;
use crate::url::ProductUrlPattern;
use crate::ScrapeError;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Drives collection and extraction for one catalog
pub struct Pipeline<F: PageFetcher> {
    config: Config,
    fetcher: F,
    pattern: ProductUrlPattern,
    brands: BrandTable,
    cancel: CancellationToken,
    stats: ExtractionStats,
}

impl Pipeline<HttpFetcher> {
    /// Creates a pipeline that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Configuration is valid and the client was built
    /// * `Err(ScrapeError)` - Invalid configuration or HTTP client failure
    pub fn from_config(config: Config) -> Result<Self, ScrapeError> {
        validate(&config)?;
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
        Self::new(config, fetcher)
    }
}

impl<F: PageFetcher> Pipeline<F> {
    /// Creates a pipeline around any fetcher
    ///
    /// The configuration is validated here, so a bad configuration never
    /// results in a request.
    pub fn new(config: Config, fetcher: F) -> Result<Self, ScrapeError> {
        validate(&config)?;
        let pattern =
            ProductUrlPattern::new(&config.site.base_url, &config.site.product_path_marker)?;
        let brands = BrandTable::from_config(&config.brands);
        if !brands.is_empty() {
            tracing::debug!("Loaded {} category -> brand mappings", brands.len());
        }

        Ok(Self {
            config,
            fetcher,
            pattern,
            brands,
            cancel: CancellationToken::new(),
            stats: ExtractionStats::new(),
        })
    }

    /// Token that aborts the run between fetches when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Absolute listing root URLs, in configuration order
    pub fn listing_roots(&self) -> Result<Vec<Url>, ScrapeError> {
        let base = Url::parse(&self.config.site.base_url)?;
        self.config
            .site
            .listing_paths
            .iter()
            .map(|path| base.join(path).map_err(ScrapeError::from))
            .collect()
    }

    /// Collects product links from every listing root
    ///
    /// URLs are merged in discovery order without duplicates. A root whose
    /// start page cannot be fetched is skipped; if no root could be fetched the
    /// last such error is returned.
    pub async fn collect_links(&mut self) -> Result<Vec<String>, ScrapeError> {
        let limits = CrawlLimits::from(&self.config.crawler);
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        let mut last_error = None;

        for root in self.listing_roots()? {
            if self.cancel.is_cancelled() {
                break;
            }

            tracing::info!("Collecting product links from {}", root);
            match crawl_listing(&self.fetcher, &root, &self.pattern, &limits, &self.cancel).await {
                Ok(state) => {
                    self.stats.listing_roots += 1;
                    self.stats.listing_pages_fetched += u64::from(state.pages_fetched);
                    for link in state.discovered {
                        if seen.insert(link.clone()) {
                            links.push(link);
                        }
                    }
                }
                Err(ScrapeError::StartPageUnreachable { url, reason }) => {
                    tracing::warn!("Skipping listing root {}: {}", url, reason);
                    self.stats.listing_roots_failed += 1;
                    self.stats.listing_pages_fetched += 1;
                    last_error = Some(ScrapeError::StartPageUnreachable { url, reason });
                }
                Err(e) => return Err(e),
            }
        }

        if self.stats.listing_roots == 0 {
            if let Some(error) = last_error {
                return Err(error);
            }
        }

        self.stats.product_links = links.len() as u64;
        tracing::info!("Collected {} unique product URLs", links.len());
        Ok(links)
    }

    /// Fetches each product page and extracts its record
    ///
    /// At most `max-products` pages are visited. A page that cannot be fetched
    /// is logged and skipped; records keep the order of `urls`.
    pub async fn extract_products(&mut self, urls: &[String]) -> Vec<ProductRecord> {
        let limit = self.config.crawler.max_products.unwrap_or(urls.len());
        let urls = &urls[..limit.min(urls.len())];
        let mut records = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!(
                    "Extraction cancelled after {} of {} products",
                    index,
                    urls.len()
                );
                break;
            }

            tracing::debug!("Fetching product page {}", url);
            match self.fetcher.fetch(url).await {
                FetchResult::Success { body, .. } => {
                    self.stats.product_pages_fetched += 1;
                    let record = extract_page(&body, url, &self.brands);
                    self.stats.record(&record);
                    records.push(record);
                }
                failure => {
                    tracing::warn!("Skipping product {}: {}", url, failure.describe());
                    self.stats.product_pages_failed += 1;
                }
            }

            let processed = index + 1;
            if processed % 10 == 0 {
                tracing::info!(
                    "Progress: {} / {} product pages processed",
                    processed,
                    urls.len()
                );
            }
        }

        records
    }

    /// Runs collection then extraction
    pub async fn run(&mut self) -> Result<Vec<ProductRecord>, ScrapeError> {
        let started = std::time::Instant::now();
        let links = self.collect_links().await?;
        let records = self.extract_products(&links).await;

        tracing::info!(
            "Harvest finished: {} records from {} product URLs in {:.1}s",
            records.len(),
            links.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(records)
    }
}

/// Parses a product page and extracts its record
///
/// The document is dropped before returning, so nothing parsed is held across
/// an await point.
fn extract_page(body: &str, page_url: &str, brands: &BrandTable) -> ProductRecord {
    let document = ProductDocument::parse(body);
    extract_record(&document, page_url, brands)
}
