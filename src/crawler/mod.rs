//! Crawler module for listing pagination and product page fetching
//!
//! This module contains the network-facing side of a harvest, including:
//! - HTTP fetching with throttling and retry logic
//! - Listing page parsing and product link extraction
//! - Pagination with termination limits
//! - Overall harvest coordination

mod collector;
mod fetcher;
mod parser;
mod pipeline;
mod throttle;

pub use collector::{
    collect_product_links, crawl_listing, listing_page_url, CrawlLimits, CrawlState, StopReason,
};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use parser::extract_product_links;
pub use pipeline::Pipeline;
pub use throttle::Throttle;
