//! Strategies for ingredients and size/packaging

use crate::extract::document::{element_text, normalize_text};
use crate::extract::PageContext;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

/// Description and tab panels that carry free-form product copy
const DESCRIPTION_SECTIONS: &str = "#tab-ingredients, \
     #tab-description, \
     .woocommerce-Tabs-panel, \
     .woocommerce-product-details__short-description, \
     .product-description, \
     [itemprop=\"description\"]";

/// Elements that may label an ingredients block
const INGREDIENT_HEADINGS: &str = "h2, h3, h4, h5, strong, b";

/// Title and description text scanned for a quantity
const SIZE_TEXT_SOURCES: [&str; 2] = ["h1.product_title, h1", DESCRIPTION_SECTIONS];

/// "Ingredients:" followed by a delimited list; a period ends the list unless it
/// is a decimal point
static INGREDIENT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bingredients?\s*:\s*((?:[\p{L}\p{N},;()\-%/*&'+ ]|\.\d)+)")
        .expect("hardcoded regex pattern is valid")
});

/// Digits, optional decimal part, optional space, then a unit
static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s?(?:ml|kg|oz|g|l)\b")
        .expect("hardcoded regex pattern is valid")
});

/// An "Ingredients" row of the attributes table
pub(crate) fn ingredients_from_attributes(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document.attribute_value(&["ingredient"])
}

/// The block following a heading that mentions ingredients
pub(crate) fn ingredients_from_heading(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .select_all(INGREDIENT_HEADINGS)
        .into_iter()
        .filter(|heading| {
            element_text(heading)
                .map(|text| text.to_lowercase().contains("ingredient"))
                .unwrap_or(false)
        })
        .find_map(|heading| following_text(&heading))
}

/// An "Ingredients:" list inside the description or tab panels
pub(crate) fn ingredients_from_description(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .select_all(DESCRIPTION_SECTIONS)
        .iter()
        .filter_map(element_text)
        .find_map(|text| find_ingredient_list(&text))
}

/// A "Size", "Packaging" or "Volume" row of the attributes table
pub(crate) fn size_from_attributes(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document.attribute_value(&["size", "packaging", "volume"])
}

/// A quantity with a unit in the product title or description
pub(crate) fn size_from_text(ctx: &PageContext<'_>) -> Option<String> {
    SIZE_TEXT_SOURCES.iter().find_map(|selectors| {
        ctx.document
            .select_all(selectors)
            .iter()
            .filter_map(element_text)
            .find_map(|text| find_quantity(&text))
    })
}

/// Finds the first quantity-with-unit in `text`
///
/// Units are ml, g, oz, kg and l, matched case-insensitively as whole words.
/// The match is returned verbatim.
///
/// # Examples
///
/// ```
/// use catalog_harvest::extract::find_quantity;
///
/// assert_eq!(find_quantity("Net Wt. 50ml"), Some("50ml".to_string()));
/// assert_eq!(find_quantity("100 G"), Some("100 G".to_string()));
/// assert_eq!(find_quantity("Gentle daily cleanser"), None);
/// ```
pub fn find_quantity(text: &str) -> Option<String> {
    QUANTITY.find(text).map(|m| m.as_str().to_string())
}

/// Finds the list following an "Ingredients:" label in `text`
///
/// # Examples
///
/// ```
/// use catalog_harvest::extract::find_ingredient_list;
///
/// let text = "Apply daily. Ingredients: Aqua, Glycerin, Niacinamide 5.0%. Store cool.";
/// assert_eq!(
///     find_ingredient_list(text),
///     Some("Aqua, Glycerin, Niacinamide 5.0%".to_string())
/// );
/// ```
pub fn find_ingredient_list(text: &str) -> Option<String> {
    let captures = INGREDIENT_LIST.captures(text)?;
    let list = captures.get(1)?.as_str().trim_end_matches([',', ';', ' ']);
    normalize_text(list).filter(|list| list.chars().any(char::is_alphabetic))
}

/// Text of the first non-empty sibling after `heading`
///
/// Inline labels (`<strong>Ingredients:</strong> Aqua, ...`) are followed by a
/// bare text node; block headings by an element.
fn following_text(heading: &ElementRef<'_>) -> Option<String> {
    heading.next_siblings().find_map(|sibling| {
        if let Some(element) = ElementRef::wrap(sibling) {
            element_text(&element)
        } else {
            sibling
                .value()
                .as_text()
                .and_then(|text| normalize_text(text.trim_start_matches([':', ' '])))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{BrandTable, ProductDocument};

    const URL: &str = "https://shop.example.com/product/rose-serum/";

    fn run(html: &str, strategy: fn(&PageContext<'_>) -> Option<String>) -> Option<String> {
        let document = ProductDocument::parse(html);
        let brands = BrandTable::default();
        let ctx = PageContext::new(&document, URL, &brands);
        strategy(&ctx)
    }

    #[test]
    fn test_quantity_examples() {
        assert_eq!(find_quantity("Net Wt. 50ml"), Some("50ml".to_string()));
        assert_eq!(find_quantity("100 G"), Some("100 G".to_string()));
        assert_eq!(find_quantity("No unit here, 12 pieces"), None);
    }

    #[test]
    fn test_quantity_units_and_decimals() {
        assert_eq!(find_quantity("Pack of 1.7 oz"), Some("1.7 oz".to_string()));
        assert_eq!(find_quantity("2kg tub"), Some("2kg".to_string()));
        assert_eq!(find_quantity("Bottle 1 L"), Some("1 L".to_string()));
        assert_eq!(find_quantity("250g/8.8oz"), Some("250g".to_string()));
    }

    #[test]
    fn test_quantity_requires_whole_unit() {
        assert_eq!(find_quantity("12 lbs"), None);
        assert_eq!(find_quantity("5 gallons"), None);
        assert_eq!(find_quantity("SPF50mlx"), None);
    }

    #[test]
    fn test_ingredient_list_stops_at_sentence_end() {
        assert_eq!(
            find_ingredient_list("INGREDIENTS: Water, Rose Extract (1%). How to use: apply."),
            Some("Water, Rose Extract (1%)".to_string())
        );
    }

    #[test]
    fn test_ingredient_list_requires_label_and_words() {
        assert_eq!(find_ingredient_list("Made with natural ingredients."), None);
        assert_eq!(find_ingredient_list("Ingredients: 100%"), None);
    }

    #[test]
    fn test_ingredients_from_attributes() {
        let html = r#"<table class="shop_attributes">
            <tr><th>Key Ingredients</th><td>Aqua, Glycerin</td></tr>
        </table>"#;
        assert_eq!(
            run(html, ingredients_from_attributes),
            Some("Aqua, Glycerin".to_string())
        );
    }

    #[test]
    fn test_ingredients_from_block_heading() {
        let html = r#"
            <div id="tab-description">
                <h3>Ingredients</h3>
                <p>Aqua,   Glycerin,
                   Squalane</p>
            </div>"#;
        assert_eq!(
            run(html, ingredients_from_heading),
            Some("Aqua, Glycerin, Squalane".to_string())
        );
    }

    #[test]
    fn test_ingredients_from_inline_label() {
        let html = r#"<p><strong>Ingredients:</strong> Aqua, Rose Water</p>"#;
        assert_eq!(
            run(html, ingredients_from_heading),
            Some("Aqua, Rose Water".to_string())
        );
    }

    #[test]
    fn test_ingredients_heading_without_sibling() {
        let html = r#"<div><h3>Ingredients</h3></div><p>Unrelated</p>"#;
        assert_eq!(run(html, ingredients_from_heading), None);
    }

    #[test]
    fn test_ingredients_from_description() {
        let html = r#"
            <div class="woocommerce-product-details__short-description">
                <p>A calming serum. Ingredients: Aqua, Centella Asiatica Extract, Panthenol.</p>
            </div>"#;
        assert_eq!(
            run(html, ingredients_from_description),
            Some("Aqua, Centella Asiatica Extract, Panthenol".to_string())
        );
    }

    #[test]
    fn test_size_from_attributes_either_label() {
        let html = r#"<table class="shop_attributes"><tr><th>Packaging</th><td>Glass jar, 50 g</td></tr></table>"#;
        assert_eq!(
            run(html, size_from_attributes),
            Some("Glass jar, 50 g".to_string())
        );
    }

    #[test]
    fn test_size_from_title() {
        let html = r#"<h1 class="product_title">Rose Serum 30ml</h1>"#;
        assert_eq!(run(html, size_from_text), Some("30ml".to_string()));
    }

    #[test]
    fn test_size_ignores_text_outside_product_copy() {
        let html = r#"<h1>Rose Serum</h1><footer>Free shipping over 500 g</footer>"#;
        assert_eq!(run(html, size_from_text), None);
    }
}
