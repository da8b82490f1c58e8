use serde::Deserialize;
use std::collections::BTreeMap;

/// Absolute ceiling on listing pages fetched per listing root
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Consecutive pages without new product links before a listing is considered exhausted
pub const DEFAULT_STOP_AFTER_EMPTY_PAGES: u32 = 3;

/// Main configuration structure for Catalog-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Category -> brand lookup used when a page names no brand itself
    #[serde(default)]
    pub brands: BTreeMap<String, String>,
}

/// The catalog being harvested
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root of the catalog site (e.g. "https://shop.example.com")
    #[serde(rename = "base-url", default)]
    pub base_url: String,

    /// Listing roots to paginate, relative to the base URL
    #[serde(rename = "listing-paths", default = "default_listing_paths")]
    pub listing_paths: Vec<String>,

    /// Path fragment that identifies a product page
    #[serde(rename = "product-path-marker", default = "default_product_marker")]
    pub product_path_marker: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            listing_paths: default_listing_paths(),
            product_path_marker: default_product_marker(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum listing pages fetched per listing root
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Consecutive listing pages yielding no new links before stopping
    #[serde(
        rename = "stop-after-empty-pages",
        default = "default_stop_after_empty_pages"
    )]
    pub stop_after_empty_pages: u32,

    /// Minimum time between successive requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Optional cap on the number of product pages extracted
    #[serde(rename = "max-products", default)]
    pub max_products: Option<usize>,

    /// Transport retries for server errors and timeouts
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            stop_after_empty_pages: default_stop_after_empty_pages(),
            request_delay_ms: default_request_delay_ms(),
            max_products: None,
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "CatalogHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/catalog-harvest".to_string(),
            contact_email: "harvest@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV export
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,

    /// Optional path of a JSON export
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            json_path: None,
        }
    }
}

fn default_listing_paths() -> Vec<String> {
    vec!["/shop/".to_string()]
}

fn default_product_marker() -> String {
    "/product/".to_string()
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_stop_after_empty_pages() -> u32 {
    DEFAULT_STOP_AFTER_EMPTY_PAGES
}

fn default_request_delay_ms() -> u64 {
    800
}

fn default_max_retries() -> u32 {
    2
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_csv_path() -> String {
    "products.csv".to_string()
}
