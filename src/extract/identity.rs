//! Strategies for the product name and image

use crate::extract::document::normalize_text;
use crate::extract::PageContext;
use url::Url;

/// Containers holding the product's own images, most specific first
const GALLERY_IMAGES: &str = "div.woocommerce-product-gallery__image img, \
     figure.woocommerce-product-gallery__wrapper img, \
     .woocommerce-product-gallery img, \
     img.wp-post-image, \
     .product-gallery img";

/// Image attributes checked in order; lazy loaders leave a placeholder in `src`
const IMAGE_ATTRIBUTES: [&str; 4] = ["src", "data-src", "data-large_image", "data-lazy-src"];

/// The page's primary heading
pub(crate) fn name_from_heading(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .first_text("h1.product_title")
        .or_else(|| ctx.document.first_text("h1"))
}

/// Open Graph title, then the document title
pub(crate) fn name_from_meta_title(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .meta_content("og:title")
        .or_else(|| ctx.document.title())
}

/// First usable image inside the product gallery
pub(crate) fn image_from_gallery(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .select_all(GALLERY_IMAGES)
        .into_iter()
        .find_map(|img| {
            IMAGE_ATTRIBUTES
                .iter()
                .filter_map(|attr| img.value().attr(attr))
                .filter_map(normalize_text)
                .find(|src| !src.starts_with("data:"))
        })
        .map(|src| absolutize(&src, ctx.page_url))
}

/// Open Graph image
pub(crate) fn image_from_open_graph(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .meta_content("og:image")
        .map(|src| absolutize(&src, ctx.page_url))
}

/// Legacy `<link rel="image_src">`
pub(crate) fn image_from_link_rel(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .select_all(r#"link[rel="image_src"]"#)
        .into_iter()
        .filter_map(|link| link.value().attr("href"))
        .find_map(normalize_text)
        .map(|src| absolutize(&src, ctx.page_url))
}

/// Resolves `src` against the page URL; leaves it untouched if either fails to parse
fn absolutize(src: &str, page_url: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(src))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| src.to_string())
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
    fn test_name_prefers_product_title_heading() {
        let html = r#"<h1>Shop</h1><h1 class="product_title entry-title">Rose Serum</h1>"#;
        assert_eq!(run(html, name_from_heading), Some("Rose Serum".to_string()));
    }

    #[test]
    fn test_name_falls_back_to_any_heading() {
        let html = r#"<h1>  Rose <em>Serum</em> </h1>"#;
        assert_eq!(run(html, name_from_heading), Some("Rose Serum".to_string()));
    }

    #[test]
    fn test_name_from_meta_title() {
        let html = r#"<head><title>Title Tag</title><meta property="og:title" content="OG Title"></head>"#;
        assert_eq!(run(html, name_from_meta_title), Some("OG Title".to_string()));

        let html = r#"<head><title> Title Tag </title></head>"#;
        assert_eq!(run(html, name_from_meta_title), Some("Title Tag".to_string()));
    }

    #[test]
    fn test_gallery_image_resolved_against_page() {
        let html = r#"
            <div class="woocommerce-product-gallery__image">
                <img src="/wp-content/uploads/rose.jpg">
            </div>"#;
        assert_eq!(
            run(html, image_from_gallery),
            Some("https://shop.example.com/wp-content/uploads/rose.jpg".to_string())
        );
    }

    #[test]
    fn test_gallery_image_skips_placeholder() {
        let html = r#"
            <div class="woocommerce-product-gallery__image">
                <img src="data:image/gif;base64,R0lGOD" data-src="https://cdn.example.com/rose.jpg">
            </div>"#;
        assert_eq!(
            run(html, image_from_gallery),
            Some("https://cdn.example.com/rose.jpg".to_string())
        );
    }

    #[test]
    fn test_gallery_ignores_images_outside_container() {
        let html = r#"<header><img src="/logo.png"></header>"#;
        assert_eq!(run(html, image_from_gallery), None);
    }

    #[test]
    fn test_open_graph_and_link_rel_images() {
        let html = r#"<head><meta property="og:image" content="https://cdn.example.com/og.jpg"></head>"#;
        assert_eq!(
            run(html, image_from_open_graph),
            Some("https://cdn.example.com/og.jpg".to_string())
        );

        let html = r#"<head><link rel="image_src" href="/img/rose.png"></head>"#;
        assert_eq!(
            run(html, image_from_link_rel),
            Some("https://shop.example.com/img/rose.png".to_string())
        );
    }
}
