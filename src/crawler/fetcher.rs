//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - The `PageFetcher` seam the link collector and pipeline fetch through
//! - Building HTTP clients with proper user agent strings
//! - GET requests with throttling between successive fetches
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::throttle::Throttle;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use tokio::sync::Mutex;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Body is not a document (image, archive, ...)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether a retry may succeed
        transient: bool,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Server errors and transient network failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError { status_code } => *status_code >= 500,
            Self::NetworkError { transient, .. } => *transient,
            _ => false,
        }
    }

    /// Short human-readable reason for a failed fetch
    pub fn describe(&self) -> String {
        match self {
            Self::Success { status_code, .. } => format!("HTTP {}", status_code),
            Self::HttpError { status_code } => format!("HTTP {}", status_code),
            Self::ContentMismatch { content_type } => {
                format!("expected a document, got {}", content_type)
            }
            Self::NetworkError { error, .. } => error.clone(),
        }
    }
}

/// Fetches pages for the harvester
///
/// Implementations own their retry and delay policy. Failures are reported through
/// [`FetchResult`], never as a panic or error, so callers decide how much a
/// failed page matters.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::{CrawlerConfig, UserAgentConfig};
/// use catalog_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));

    Client::builder()
        .user_agent(user_agent.header_value())
        .default_headers(headers)
        .timeout(Duration::from_secs(crawler.timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.timeout_secs.min(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`] with throttling and retries
///
/// Successive fetches are spaced by at least the configured request delay.
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 5xx | Retry up to `max_retries` times |
/// | Timeout / connection failure | Retry up to `max_retries` times |
/// | HTTP 4xx | Immediate failure |
/// | Non-document Content-Type | Immediate failure |
pub struct HttpFetcher {
    client: Client,
    throttle: Mutex<Throttle>,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, request_delay: Duration, max_retries: u32) -> Self {
        Self {
            client,
            throttle: Mutex::new(Throttle::new(request_delay)),
            max_retries,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Builds the client and fetcher from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, crawler)?;
        Ok(Self::new(
            client,
            Duration::from_millis(crawler.request_delay_ms),
            crawler.max_retries,
        ))
    }

    /// Base backoff before a retry; grows linearly with the attempt number
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let mut attempt = 0;
        loop {
            self.throttle.lock().await.wait_turn().await;

            let result = fetch_url(&self.client, url).await;
            if !result.is_retryable() || attempt >= self.max_retries {
                return result;
            }

            attempt += 1;
            tracing::warn!(
                "Fetch of {} failed ({}), retrying ({}/{})",
                url,
                result.describe(),
                attempt,
                self.max_retries
            );
            tokio::time::sleep(self.retry_delay * attempt).await;
        }
    }
}

/// Performs a single GET and classifies the outcome
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_document_type(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(&e),
    }
}

/// Maps a transport error onto a `NetworkError`
fn classify_error(e: &reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            transient: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            transient: true,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            transient: false,
        }
    }
}

/// Accepts HTML, XML and plain text; a missing header is given the benefit of the doubt
fn is_document_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("html")
        || content_type.contains("xml")
        || content_type.starts_with("text/")
}
