//! The product record produced by one extraction

use serde::Serialize;

/// Column order of every tabular export
pub const COLUMNS: [&str; 7] = [
    "product_name",
    "brand",
    "category",
    "ingredients",
    "size_packaging",
    "product_image_url",
    "product_page_url",
];

/// One extracted product
///
/// Field order matches [`COLUMNS`]; serializers rely on it. Every field except
/// `product_page_url` may be missing when no strategy found a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub ingredients: Option<String>,
    pub size_packaging: Option<String>,
    pub product_image_url: Option<String>,
    /// De-duplication key of the dataset
    pub product_page_url: String,
}

impl ProductRecord {
    /// A record with only the page URL known
    pub fn empty(page_url: impl Into<String>) -> Self {
        Self {
            product_name: None,
            brand: None,
            category: None,
            ingredients: None,
            size_packaging: None,
            product_image_url: None,
            product_page_url: page_url.into(),
        }
    }

    /// Values of the optional fields, in column order
    pub fn optional_fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            (COLUMNS[0], self.product_name.as_deref()),
            (COLUMNS[1], self.brand.as_deref()),
            (COLUMNS[2], self.category.as_deref()),
            (COLUMNS[3], self.ingredients.as_deref()),
            (COLUMNS[4], self.size_packaging.as_deref()),
            (COLUMNS[5], self.product_image_url.as_deref()),
        ]
    }

    /// True when every field was resolved
    pub fn is_complete(&self) -> bool {
        self.optional_fields().iter().all(|(_, value)| value.is_some())
    }
}
