//! Parsed product page and text helpers
//!
//! `ProductDocument` wraps the `scraper` parse tree and exposes the handful of
//! queries the extraction strategies need: CSS selection, meta tags, the
//! attributes table, and JSON-LD script blocks. Every query returns `Option` or
//! an empty collection when the page lacks the element; none of them panic.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

/// Rows of the structured attributes table that catalog platforms render
const ATTRIBUTE_ROWS: &str = "table.shop_attributes tr, table.woocommerce-product-attributes tr";

/// A product page parsed into a navigable tree
pub struct ProductDocument {
    html: Html,
}

impl ProductDocument {
    /// Parses raw markup. Malformed HTML is repaired by the parser, never rejected.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Returns the first element matching a selector group, if any
    pub fn select_first(&self, selectors: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selectors).ok()?;
        let first = self.html.select(&selector).next();
        first
    }

    /// Returns all elements matching a selector group, in document order
    pub fn select_all(&self, selectors: &str) -> Vec<ElementRef<'_>> {
        let Ok(selector) = Selector::parse(selectors) else {
            return Vec::new();
        };
        let elements = self.html.select(&selector).collect();
        elements
    }

    /// Returns the normalized text of the first matching element that has any
    pub fn first_text(&self, selectors: &str) -> Option<String> {
        self.select_all(selectors)
            .into_iter()
            .find_map(|element| element_text(&element))
    }

    /// Reads the `content` of a `<meta property=...>` or `<meta name=...>` tag
    pub fn meta_content(&self, key: &str) -> Option<String> {
        let selectors = format!(r#"meta[property="{key}"], meta[name="{key}"]"#);
        self.select_all(&selectors)
            .into_iter()
            .filter_map(|element| element.value().attr("content"))
            .find_map(normalize_text)
    }

    /// The `<title>` text
    pub fn title(&self) -> Option<String> {
        self.first_text("title")
    }

    /// Label/value pairs from the structured attributes table
    ///
    /// Labels are lowercased; rows lacking a header or data cell are skipped.
    pub fn attribute_rows(&self) -> Vec<(String, String)> {
        let (Ok(th), Ok(td)) = (Selector::parse("th"), Selector::parse("td")) else {
            return Vec::new();
        };

        self.select_all(ATTRIBUTE_ROWS)
            .into_iter()
            .filter_map(|row| {
                let label = row.select(&th).next().and_then(|cell| element_text(&cell))?;
                let value = row.select(&td).next().and_then(|cell| element_text(&cell))?;
                Some((label.to_lowercase(), value))
            })
            .collect()
    }

    /// Value of the first attributes-table row whose label contains any of `labels`
    ///
    /// `labels` must be lowercase.
    pub fn attribute_value(&self, labels: &[&str]) -> Option<String> {
        self.attribute_rows()
            .into_iter()
            .find(|(label, _)| labels.iter().any(|wanted| label.contains(wanted)))
            .map(|(_, value)| value)
    }

    /// JSON-LD script blocks that parse as JSON
    ///
    /// Blocks that fail to parse are dropped.
    pub fn json_ld_blocks(&self) -> Vec<Value> {
        self.select_all(r#"script[type="application/ld+json"]"#)
            .into_iter()
            .filter_map(|script| {
                let raw: String = script.text().collect();
                match serde_json::from_str::<Value>(raw.trim()) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::debug!("Skipping unparseable JSON-LD block: {}", e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// Collects an element's descendant text, normalized; None if it has none
pub fn element_text(element: &ElementRef<'_>) -> Option<String> {
    let joined = element.text().collect::<Vec<_>>().join(" ");
    normalize_text(&joined)
}

/// Trims and collapses internal whitespace runs; None if nothing is left
///
/// # Examples
///
/// ```
/// use catalog_harvest::extract::normalize_text;
///
/// assert_eq!(normalize_text("  Rose \n\t Serum  "), Some("Rose Serum".to_string()));
/// assert_eq!(normalize_text(" \n "), None);
/// ```
pub fn normalize_text(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Decodes HTML character references in text that bypassed the HTML parser
///
/// Text nodes and attribute values are already decoded by `scraper`; JSON-LD
/// strings are not, so they are run through a fragment parse.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let fragment = Html::parse_fragment(text);
    let decoded: String = fragment.root_element().text().collect();
    decoded
}
