//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full collect, extract and export cycle end-to-end.

use catalog_harvest::config::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use catalog_harvest::crawler::{FetchResult, HttpFetcher, PageFetcher, Pipeline};
use catalog_harvest::output::export_records;
use catalog_harvest::ScrapeError;
use std::collections::BTreeMap;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for a catalog served at `base_url`
fn create_test_config(base_url: &str, output_dir: &std::path::Path) -> Config {
    let mut brands = BTreeMap::new();
    brands.insert("Men's Grooming".to_string(), "Groom Co".to_string());

    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            listing_paths: vec!["/shop/".to_string()],
            product_path_marker: "/product/".to_string(),
        },
        crawler: CrawlerConfig {
            max_pages: 5,
            stop_after_empty_pages: 1,
            request_delay_ms: 0,
            max_products: None,
            max_retries: 0,
            timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvest".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            csv_path: output_dir.join("products.csv").to_string_lossy().into_owned(),
            json_path: Some(output_dir.join("products.json").to_string_lossy().into_owned()),
        },
        brands,
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=UTF-8")
}

const LISTING_PAGE: &str = r#"<html><head><title>Shop</title></head><body>
    <ul class="products">
        <li><a href="/product/rose-serum/">Rose Serum</a>
            <a href="/product/rose-serum/?add-to-cart=11">Add to cart</a></li>
        <li><a href="/product/beard-oil/">Beard Oil</a></li>
        <li><a href="/product/discontinued/">Discontinued</a></li>
    </ul>
    <a href="/cart/">Cart</a>
    <a href="/shop/page/2/">Next</a>
</body></html>"#;

const ROSE_SERUM: &str = r#"<html><head>
    <title>Rose Serum - Shop</title>
    <script type="application/ld+json">
        {"@context": "https://schema.org", "@graph": [
            {"@type": "WebPage"},
            {"@type": "Product", "brand": {"@type": "Brand", "name": "Rose &amp; Co"}}
        ]}
    </script>
</head><body>
    <div class="woocommerce-product-gallery__image">
        <img src="/uploads/rose.jpg" alt="">
    </div>
    <h1 class="product_title">Rose Serum</h1>
    <div class="woocommerce-product-details__short-description">
        <p>Brightening serum in a 30 ml dropper bottle.</p>
    </div>
    <div id="tab-description">
        <h3>Ingredients</h3>
        <p>Aqua, Rosa Damascena Flower Water, Glycerin</p>
    </div>
    <div class="product_meta">
        <span class="posted_in">Category: <a href="/c/serums/">Serums</a></span>
    </div>
</body></html>"#;

const BEARD_OIL: &str = r#"<html><head>
    <meta property="og:title" content="Beard Oil">
    <meta property="og:image" content="https://cdn.example.com/beard.jpg">
</head><body>
    <nav class="woocommerce-breadcrumb">
        <a href="/">Home</a> / <a href="/c/grooming/">Men's Grooming</a> / Beard Oil
    </nav>
    <table class="woocommerce-product-attributes shop_attributes">
        <tr><th>Size</th><td>100 ml</td></tr>
    </table>
</body></html>"#;

#[tokio::test]
async fn test_full_harvest_to_csv() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/shop/"))
        .respond_with(html(LISTING_PAGE))
        .mount(&mock_server)
        .await;

    // Page 2 repeats page 1, so collection stops there
    Mock::given(method("GET"))
        .and(path("/shop/page/2/"))
        .respond_with(html(LISTING_PAGE))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/product/rose-serum/"))
        .respond_with(html(ROSE_SERUM))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/product/beard-oil/"))
        .respond_with(html(BEARD_OIL))
        .mount(&mock_server)
        .await;

    // /product/discontinued/ is not mounted and answers 404

    let config = create_test_config(&base_url, output_dir.path());
    let output_config = config.output.clone();
    let mut pipeline = Pipeline::from_config(config).expect("Failed to build pipeline");

    let records = pipeline.run().await.expect("Harvest failed");

    assert_eq!(records.len(), 2, "Discontinued product should be skipped");

    let rose = &records[0];
    assert_eq!(rose.product_name.as_deref(), Some("Rose Serum"));
    assert_eq!(rose.brand.as_deref(), Some("Rose & Co"));
    assert_eq!(rose.category.as_deref(), Some("Serums"));
    assert_eq!(
        rose.ingredients.as_deref(),
        Some("Aqua, Rosa Damascena Flower Water, Glycerin")
    );
    assert_eq!(rose.size_packaging.as_deref(), Some("30 ml"));
    assert_eq!(
        rose.product_image_url,
        Some(format!("{}/uploads/rose.jpg", base_url))
    );
    assert_eq!(rose.product_page_url, format!("{}/product/rose-serum/", base_url));

    let beard = &records[1];
    assert_eq!(beard.product_name.as_deref(), Some("Beard Oil"));
    assert_eq!(beard.category.as_deref(), Some("Men's Grooming"));
    assert_eq!(beard.brand.as_deref(), Some("Groom Co"));
    assert_eq!(beard.size_packaging.as_deref(), Some("100 ml"));
    assert_eq!(beard.ingredients, None);
    assert_eq!(
        beard.product_image_url.as_deref(),
        Some("https://cdn.example.com/beard.jpg")
    );

    let stats = pipeline.stats();
    assert_eq!(stats.listing_pages_fetched, 2);
    assert_eq!(stats.product_links, 3);
    assert_eq!(stats.product_pages_failed, 1);

    let written = export_records(&records, &output_config).expect("Export failed");
    assert_eq!(written.len(), 2);

    let csv = std::fs::read_to_string(output_dir.path().join("products.csv")).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][0], "Beard Oil");
    assert_eq!(&rows[1][3], "");
    assert_eq!(&rows[1][6], format!("{}/product/beard-oil/", base_url));
}

#[tokio::test]
async fn test_unreachable_start_page() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/shop/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output_dir.path());
    let mut pipeline = Pipeline::from_config(config).unwrap();

    let result = pipeline.run().await;
    match result {
        Err(ScrapeError::StartPageUnreachable { url, reason }) => {
            assert!(url.ends_with("/shop/"));
            assert_eq!(reason, "HTTP 500");
        }
        other => panic!("Expected StartPageUnreachable, got {:?}", other.map(|r| r.len())),
    }
}

#[tokio::test]
async fn test_fetcher_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shop/"))
        .and(header(
            "user-agent",
            "TestHarvest/1.0 (+https://example.com/about; test@example.com)",
        ))
        .respond_with(html("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), output_dir.path());
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler).unwrap();

    let result = fetcher.fetch(&format!("{}/shop/", mock_server.uri())).await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_fetcher_retries_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product/flaky/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/product/flaky/"))
        .respond_with(html("<h1>Flaky</h1>"))
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server.uri(), output_dir.path());
    config.crawler.max_retries = 2;
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)
        .unwrap()
        .with_retry_delay(Duration::from_millis(10));

    let result = fetcher
        .fetch(&format!("{}/product/flaky/", mock_server.uri()))
        .await;
    match result {
        FetchResult::Success { body, status_code, .. } => {
            assert_eq!(status_code, 200);
            assert!(body.contains("Flaky"));
        }
        other => panic!("Expected success after retry, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetcher_does_not_retry_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product/gone/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server.uri(), output_dir.path());
    config.crawler.max_retries = 3;
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler).unwrap();

    let result = fetcher
        .fetch(&format!("{}/product/gone/", mock_server.uri()))
        .await;
    assert!(matches!(result, FetchResult::HttpError { status_code: 404 }));
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product/photo/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"))
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), output_dir.path());
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler).unwrap();

    let result = fetcher
        .fetch(&format!("{}/product/photo/", mock_server.uri()))
        .await;
    match result {
        FetchResult::ContentMismatch { content_type } => assert_eq!(content_type, "image/png"),
        other => panic!("Expected ContentMismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_delay_spaces_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<html></html>"))
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server.uri(), output_dir.path());
    config.crawler.request_delay_ms = 100;
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler).unwrap();

    let started = std::time::Instant::now();
    for page in ["a", "b", "c"] {
        let result = fetcher
            .fetch(&format!("{}/product/{}/", mock_server.uri(), page))
            .await;
        assert!(result.is_success());
    }
    assert!(started.elapsed() >= Duration::from_millis(200));
}
