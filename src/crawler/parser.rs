//! Listing page parser
//!
//! Pulls product page links out of a catalog listing page.

use crate::url::{normalize_product_url, ProductUrlPattern};
use scraper::{Html, Selector};
use url::Url;

/// Extracts the product links of a listing page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere on the page whose normalized URL matches `pattern`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:`, `data:` and fragment-only hrefs
/// - Links to other hosts or to non-product paths
///
/// Query strings and fragments are dropped, so add-to-cart and variation links
/// collapse onto their product page. Hosts are rewritten to the catalog's own
/// spelling, so `www.` variants collapse too. Links come back in document order
/// without duplicates.
///
/// # Example
///
/// ```
/// use catalog_harvest::crawler::extract_product_links;
/// use catalog_harvest::url::ProductUrlPattern;
/// use url::Url;
///
/// let html = r#"<a href="/product/rose/">Rose</a><a href="/product/rose/?add-to-cart=9">Add</a><a href="/cart/">Cart</a>"#;
/// let page_url = Url::parse("https://shop.example.com/shop/").unwrap();
/// let pattern = ProductUrlPattern::new("https://shop.example.com", "/product/").unwrap();
///
/// let links = extract_product_links(html, &page_url, &pattern);
/// assert_eq!(links, vec!["https://shop.example.com/product/rose/"]);
/// ```
pub fn extract_product_links(html: &str, page_url: &Url, pattern: &ProductUrlPattern) -> Vec<String> {
    let document = Html::parse_document(html);
    extract_links(&document, page_url, pattern)
}

/// Extracts every product link, in document order, without duplicates
fn extract_links(document: &Html, page_url: &Url, pattern: &ProductUrlPattern) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match normalize_product_url(href, page_url) {
            Ok(url) if pattern.matches(&url) => {
                let url = pattern.canonicalize(url).to_string();
                if !links.contains(&url) {
                    links.push(url);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::trace!("Skipping href {:?}: {}", href, e),
        }
    }

    links
}
