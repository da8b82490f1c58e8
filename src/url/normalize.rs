use crate::UrlError;
use url::Url;

/// Normalizes an href found on a catalog page into an absolute product URL
///
/// # Normalization Steps
///
/// 1. Trim whitespace; reject empty, fragment-only, and non-navigational hrefs
///    (`javascript:`, `mailto:`, `tel:`, `data:`)
/// 2. Resolve relative to the page it was found on
/// 3. Require an HTTP(S) scheme and a host
/// 4. Remove the query string
/// 5. Remove the fragment
///
/// The path is kept verbatim, including any trailing slash, since catalog
/// platforms treat `/product/x/` and `/product/x` as distinct routes.
///
/// # Arguments
///
/// * `href` - The raw attribute value
/// * `base` - The URL of the page the href appeared on
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::normalize_product_url;
/// use url::Url;
///
/// let base = Url::parse("https://shop.example.com/shop/page/2/").unwrap();
/// let url = normalize_product_url("/product/rose-serum/?attribute_size=50ml#reviews", &base).unwrap();
/// assert_eq!(url.as_str(), "https://shop.example.com/product/rose-serum/");
/// ```
pub fn normalize_product_url(href: &str, base: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Err(UrlError::Parse(format!("not a navigable href: '{}'", href)));
    }

    let lowered = href.to_ascii_lowercase();
    for scheme in ["javascript:", "mailto:", "tel:", "data:"] {
        if lowered.starts_with(scheme) {
            return Err(UrlError::InvalidScheme(scheme.trim_end_matches(':').to_string()));
        }
    }

    let mut url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
