//! URL handling module for Catalog-Harvest
//!
//! This module provides href normalization, host canonicalization, and the
//! product-page pattern used to decide which listing links are products.

mod matcher;
mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use matcher::{canonical_host, path_has_marker};
pub use normalize::normalize_product_url;

/// Identifies product pages of one catalog
///
/// A URL is a product URL when it uses HTTP(S), lives on the catalog host
/// (a leading `www.` is ignored on either side), and its path carries the
/// product marker followed by a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUrlPattern {
    host: String,
    /// Host exactly as the catalog's base URL spells it
    site_host: String,
    marker: String,
}

impl ProductUrlPattern {
    /// Builds a pattern for the catalog rooted at `base_url`
    ///
    /// The marker must be a path fragment starting with `/`, such as `/product/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_harvest::url::ProductUrlPattern;
    /// use url::Url;
    ///
    /// let pattern = ProductUrlPattern::new("https://www.shop.example.com", "/product/").unwrap();
    /// assert!(pattern.matches(&Url::parse("https://shop.example.com/product/rose-serum/").unwrap()));
    /// assert!(!pattern.matches(&Url::parse("https://other.example.com/product/rose-serum/").unwrap()));
    /// ```
    pub fn new(base_url: &str, marker: &str) -> UrlResult<Self> {
        if !marker.starts_with('/') || marker.len() < 2 {
            return Err(UrlError::InvalidMarker(marker.to_string()));
        }

        let base = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(UrlError::InvalidScheme(base.scheme().to_string()));
        }
        let host = canonical_host(&base).ok_or(UrlError::MissingDomain)?;
        let site_host = base
            .host_str()
            .ok_or(UrlError::MissingDomain)?
            .to_lowercase();

        Ok(Self {
            host,
            site_host,
            marker: marker.to_string(),
        })
    }

    /// The canonical catalog host this pattern accepts
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if `url` is a product page of this catalog
    pub fn matches(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match canonical_host(url) {
            Some(host) if host == self.host => path_has_marker(url.path(), &self.marker),
            _ => false,
        }
    }

    /// Rewrites a product URL onto the catalog's own host spelling
    ///
    /// `www.shop.example.com` and `shop.example.com` name the same catalog, so
    /// both spellings of a product page collapse to one URL.
    pub fn canonicalize(&self, url: Url) -> Url {
        if url.host_str() == Some(self.site_host.as_str()) {
            return url;
        }

        let mut rewritten = url.clone();
        match rewritten.set_host(Some(&self.site_host)) {
            Ok(()) => rewritten,
            Err(_) => url,
        }
    }
}
