//! Strategies for category and brand

use crate::extract::document::{decode_entities, element_text, normalize_text};
use crate::extract::PageContext;
use scraper::ElementRef;
use serde_json::Value;

/// Taxonomy terms the catalog attaches to the product
const CATEGORY_TERMS: &str = ".product_meta .posted_in a, span.posted_in a";

/// Breadcrumb containers, most common first
const BREADCRUMBS: &str = "nav.woocommerce-breadcrumb, \
     nav[aria-label=\"breadcrumb\"], \
     nav[aria-label=\"Breadcrumb\"], \
     .breadcrumb, \
     .breadcrumbs";

/// Characters separating breadcrumb entries in flat trails
const CRUMB_SEPARATORS: [char; 6] = ['/', '\u{bb}', '>', '\u{203a}', '|', '\u{2192}'];

/// Category terms linked from the product meta block, joined with ", "
pub(crate) fn category_from_terms(ctx: &PageContext<'_>) -> Option<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in ctx
        .document
        .select_all(CATEGORY_TERMS)
        .iter()
        .filter_map(element_text)
    {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(", "))
    }
}

/// Second-to-last entry of the breadcrumb trail
///
/// The last entry of a product page's trail is the product itself.
pub(crate) fn category_from_breadcrumb(ctx: &PageContext<'_>) -> Option<String> {
    let trail = ctx.document.select_first(BREADCRUMBS)?;
    let entries = breadcrumb_entries(&trail);
    if entries.len() < 2 {
        return None;
    }
    entries.into_iter().rev().nth(1)
}

/// Splits a breadcrumb container into its entries
///
/// List-based trails yield one entry per `<li>`; flat trails yield one entry per
/// child element plus any separator-delimited bare text.
fn breadcrumb_entries(trail: &ElementRef<'_>) -> Vec<String> {
    if let Ok(li) = scraper::Selector::parse("li") {
        let items: Vec<String> = trail.select(&li).filter_map(|item| element_text(&item)).collect();
        if !items.is_empty() {
            return items;
        }
    }

    let mut entries = Vec::new();
    for child in trail.children() {
        if let Some(element) = ElementRef::wrap(child) {
            if let Some(text) = element_text(&element) {
                entries.push(text);
            }
        } else if let Some(text) = child.value().as_text() {
            entries.extend(
                text.split(&CRUMB_SEPARATORS[..])
                    .filter_map(normalize_text),
            );
        }
    }
    entries
}

/// A "Brand" row of the attributes table
pub(crate) fn brand_from_attributes(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document.attribute_value(&["brand"])
}

/// Brand declared in embedded metadata
///
/// `brand` / `product:brand` meta tags first, then `brand` or `manufacturer` of
/// the page's JSON-LD entities.
pub(crate) fn brand_from_embedded_metadata(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .meta_content("brand")
        .or_else(|| ctx.document.meta_content("product:brand"))
        .or_else(|| {
            ctx.document
                .json_ld_blocks()
                .iter()
                .find_map(brand_in_value)
        })
}

/// Lookup of the resolved category in the brand table
pub(crate) fn brand_from_category(ctx: &PageContext<'_>) -> Option<String> {
    let category = ctx.category?;
    ctx.brands.infer(category).map(str::to_string)
}

/// Searches a JSON-LD value for a brand, descending into arrays and `@graph`
fn brand_in_value(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.iter().find_map(brand_in_value),
        Value::Object(map) => ["brand", "manufacturer"]
            .iter()
            .find_map(|key| map.get(*key).and_then(entity_name))
            .or_else(|| map.get("@graph").and_then(brand_in_value)),
        _ => None,
    }
}

/// Reads a schema.org entity reference: a bare string or an object with `name`
fn entity_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => normalize_text(&decode_entities(name)),
        Value::Object(map) => map.get("name").and_then(entity_name),
        Value::Array(items) => items.iter().find_map(entity_name),
        _ => None,
    }
}
