//! Field extraction for product pages
//!
//! Each of the six optional fields of a [`ProductRecord`] is resolved by a static,
//! ordered chain of strategies. A strategy is a plain function from the page to an
//! optional value; the first one returning a non-empty value wins and later
//! strategies for that field never run. A strategy that finds nothing (missing
//! element, unexpected JSON shape, no regex match) simply yields `None`.
//!
//! Fields are resolved in a fixed order and category precedes brand, since brand
//! inference reads the resolved category.

mod brands;
mod composition;
mod document;
mod identity;
mod record;
mod taxonomy;

pub use brands::BrandTable;
pub use composition::{find_ingredient_list, find_quantity};
pub use document::{decode_entities, element_text, normalize_text, ProductDocument};
pub use record::{ProductRecord, COLUMNS};

/// Everything a strategy may read while resolving one field
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub document: &'a ProductDocument,
    pub page_url: &'a str,
    /// Category resolved earlier in the same extraction, if any
    pub category: Option<&'a str>,
    pub brands: &'a BrandTable,
}

impl<'a> PageContext<'a> {
    pub fn new(document: &'a ProductDocument, page_url: &'a str, brands: &'a BrandTable) -> Self {
        Self {
            document,
            page_url,
            category: None,
            brands,
        }
    }

    pub fn with_category(self, category: Option<&'a str>) -> Self {
        Self { category, ..self }
    }
}

/// One way of locating a field's value
pub type Strategy = fn(&PageContext<'_>) -> Option<String>;

/// A field's strategies in priority order, each with a name for tracing
pub type Chain = &'static [(&'static str, Strategy)];

pub const NAME_CHAIN: Chain = &[
    ("heading", identity::name_from_heading),
    ("meta-title", identity::name_from_meta_title),
];

pub const IMAGE_CHAIN: Chain = &[
    ("gallery", identity::image_from_gallery),
    ("og-image", identity::image_from_open_graph),
    ("link-image-src", identity::image_from_link_rel),
];

pub const CATEGORY_CHAIN: Chain = &[
    ("taxonomy-terms", taxonomy::category_from_terms),
    ("breadcrumb", taxonomy::category_from_breadcrumb),
];

pub const INGREDIENTS_CHAIN: Chain = &[
    ("attributes-table", composition::ingredients_from_attributes),
    ("heading-sibling", composition::ingredients_from_heading),
    ("description-label", composition::ingredients_from_description),
];

pub const BRAND_CHAIN: Chain = &[
    ("attributes-table", taxonomy::brand_from_attributes),
    ("embedded-metadata", taxonomy::brand_from_embedded_metadata),
    ("category-lookup", taxonomy::brand_from_category),
];

pub const SIZE_CHAIN: Chain = &[
    ("attributes-table", composition::size_from_attributes),
    ("quantity-pattern", composition::size_from_text),
];

/// Runs `chain` left to right and returns the first non-empty value
///
/// Values are whitespace-normalized before the emptiness check.
pub fn resolve(field: &str, chain: Chain, ctx: &PageContext<'_>) -> Option<String> {
    let resolved = chain.iter().find_map(|(name, strategy)| {
        let value = strategy(ctx).and_then(|raw| normalize_text(&raw))?;
        tracing::trace!("{} resolved by {} strategy: {}", field, name, value);
        Some(value)
    });

    if resolved.is_none() {
        tracing::trace!("{} not found on {}", field, ctx.page_url);
    }
    resolved
}

/// Extracts one product record from a parsed product page
///
/// Never fails: fields with no value are `None`, and `product_page_url` is always
/// `page_url` unchanged.
///
/// # Example
///
/// ```
/// use catalog_harvest::extract::{extract_record, BrandTable, ProductDocument};
///
/// let html = r#"<h1 class="product_title">Rose Serum 30ml</h1>"#;
/// let document = ProductDocument::parse(html);
/// let record = extract_record(&document, "https://shop.example.com/product/rose/", &BrandTable::default());
///
/// assert_eq!(record.product_name.as_deref(), Some("Rose Serum 30ml"));
/// assert_eq!(record.size_packaging.as_deref(), Some("30ml"));
/// assert_eq!(record.brand, None);
/// ```
pub fn extract_record(document: &ProductDocument, page_url: &str, brands: &BrandTable) -> ProductRecord {
    let ctx = PageContext::new(document, page_url, brands);

    let product_name = resolve("product_name", NAME_CHAIN, &ctx);
    let product_image_url = resolve("product_image_url", IMAGE_CHAIN, &ctx);
    let category = resolve("category", CATEGORY_CHAIN, &ctx);
    let ingredients = resolve("ingredients", INGREDIENTS_CHAIN, &ctx);

    let ctx = ctx.with_category(category.as_deref());
    let brand = resolve("brand", BRAND_CHAIN, &ctx);
    let size_packaging = resolve("size_packaging", SIZE_CHAIN, &ctx);

    ProductRecord {
        product_name,
        brand,
        category,
        ingredients,
        size_packaging,
        product_image_url,
        product_page_url: page_url.to_string(),
    }
}
