use url::Url;

/// Returns the host of a URL, lowercased and without a leading `www.`
///
/// Returns None if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use catalog_harvest::url::canonical_host;
///
/// let url = Url::parse("https://WWW.Shop.Example.com/product/a").unwrap();
/// assert_eq!(canonical_host(&url), Some("shop.example.com".to_string()));
/// ```
pub fn canonical_host(url: &Url) -> Option<String> {
    url.host_str().map(|host| {
        let host = host.to_lowercase();
        match host.strip_prefix("www.") {
            Some(bare) => bare.to_string(),
            None => host,
        }
    })
}

/// Checks whether a URL path contains the product marker followed by a slug
///
/// `marker` is a path fragment such as `/product/`. The path must continue past the
/// marker with at least one non-slash character, so the bare `/product/` index
/// itself is not treated as a product page.
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::path_has_marker;
///
/// assert!(path_has_marker("/product/rose-serum/", "/product/"));
/// assert!(path_has_marker("/en/product/rose-serum", "/product/"));
/// assert!(!path_has_marker("/product/", "/product/"));
/// assert!(!path_has_marker("/products-on-sale/", "/product/"));
/// ```
pub fn path_has_marker(path: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }

    let mut rest = path;
    while let Some(pos) = rest.find(marker) {
        let after = &rest[pos + marker.len()..];
        if after.chars().any(|c| c != '/') {
            return true;
        }
        rest = after;
    }
    false
}
