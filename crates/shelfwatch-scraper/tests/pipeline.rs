//! End-to-end pipeline tests: sitemap resolution through publication,
//! against a single wiremock server playing merchant site and ingestion
//! endpoint at once.

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use shelfwatch_core::AppConfig;
use shelfwatch_scraper::pipeline::{
    run_discover, run_refresh, DISCOVER_EXPLANATION, REFRESH_EXPLANATION,
};

fn test_config(server_uri: &str) -> AppConfig {
    AppConfig {
        ingest_endpoint: format!("{server_uri}/ingest"),
        ingest_secret: "test-secret".to_string(),
        log_level: "info".to_string(),
        merchants_path: "./config/merchants.yaml".into(),
        user_agent: "shelfwatch-test/0.1".to_string(),
        // High budget so throttling never slows the test down.
        max_rps_per_host: 1000.0,
        request_timeout_secs: 5,
        max_sitemap_urls: 300,
        max_product_pages: 200,
        max_base_products: 50,
        scored_pool_size: 8,
        max_alternatives: 6,
        publish_chunk_size: 25,
    }
}

fn product_page(name: &str, availability: &str, price: &str) -> String {
    format!(
        "<html><head><title>{name}</title>\
         <script type=\"application/ld+json\">{{\
           \"@type\": \"Product\",\
           \"name\": \"{name}\",\
           \"offers\": {{\
             \"price\": \"{price}\",\
             \"priceCurrency\": \"USD\",\
             \"availability\": \"https://schema.org/{availability}\"\
           }}\
         }}</script></head><body>{name}</body></html>"
    )
}

fn sitemap_xml(server_uri: &str, paths: &[&str]) -> String {
    let entries: String = paths
        .iter()
        .map(|p| format!("<url><loc>{server_uri}{p}</loc></url>"))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">{entries}</urlset>"
    )
}

async fn mount_two_widget_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(
            &server.uri(),
            &["/products/widget-classic", "/products/widget-new"],
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/widget-classic"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page("Widget Classic", "OutOfStock", "100.00")),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/widget-new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page("Widget New", "InStock", "80.00")),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(server)
        .await;
}

async fn ingest_posts(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .collect()
}

#[tokio::test]
async fn discover_publishes_one_item_with_one_in_stock_alternative() {
    let server = MockServer::start().await;
    mount_two_widget_site(&server).await;

    let config = test_config(&server.uri());
    let sitemaps = vec![format!("{}/sitemap.xml", server.uri())];
    let summary = run_discover(&config, &sitemaps).await.unwrap();

    assert_eq!(summary.urls_discovered, 2);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.items_built, 1);
    assert_eq!(summary.receipts.len(), 1);
    assert_eq!(summary.receipts[0].status, 200);

    let posts = ingest_posts(&server).await;
    assert_eq!(posts.len(), 1);
    let json: Value = serde_json::from_slice(&posts[0].body).unwrap();
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);

    let item = &items[0];
    assert_eq!(item["original_name"], "Widget Classic");
    assert_eq!(item["status"], "oos");
    assert_eq!(item["slug"], "widget-classic");
    assert_eq!(item["explanation"], DISCOVER_EXPLANATION);

    let alternatives = item["alternatives"].as_array().unwrap();
    assert_eq!(alternatives.len(), 1);
    assert_eq!(alternatives[0]["name"], "Widget New");
    assert_eq!(alternatives[0]["price"], "$80.00");
    let reason = alternatives[0]["reason"].as_str().unwrap();
    assert!(reason.contains("In stock"), "got reason: {reason}");
    // 100.00 -> 80.00 is a 20% drop, above the 15% threshold.
    assert!(reason.contains("~20% cheaper"), "got reason: {reason}");
}

#[tokio::test]
async fn discover_with_nothing_out_of_stock_publishes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sitemap_xml(&server.uri(), &["/products/widget-new"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/widget-new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page("Widget New", "InStock", "80.00")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let sitemaps = vec![format!("{}/sitemap.xml", server.uri())];
    let summary = run_discover(&config, &sitemaps).await.unwrap();

    assert_eq!(summary.items_built, 0);
    assert!(summary.receipts.is_empty());
}

#[tokio::test]
async fn discover_skips_failing_product_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(
            &server.uri(),
            &["/products/broken", "/products/widget-new"],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/widget-new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page("Widget New", "InStock", "80.00")),
        )
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let sitemaps = vec![format!("{}/sitemap.xml", server.uri())];
    let summary = run_discover(&config, &sitemaps).await.unwrap();

    // The broken page is skipped, not fatal; the healthy page still lands.
    assert_eq!(summary.urls_discovered, 2);
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.items_built, 0);
}

#[tokio::test]
async fn discover_survives_a_malformed_sitemap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset><url><loc>truncated"))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let sitemaps = vec![format!("{}/sitemap.xml", server.uri())];
    let summary = run_discover(&config, &sitemaps).await.unwrap();

    assert_eq!(summary.urls_discovered, 0);
    assert_eq!(summary.items_built, 0);
}

#[tokio::test]
async fn refresh_labels_bases_oos_and_uses_refresh_explanation() {
    let server = MockServer::start().await;
    mount_two_widget_site(&server).await;

    let config = test_config(&server.uri());
    let sitemaps = vec![format!("{}/sitemap.xml", server.uri())];
    let summary = run_refresh(&config, &sitemaps).await.unwrap();

    assert_eq!(summary.items_built, 1);

    let posts = ingest_posts(&server).await;
    let json: Value = serde_json::from_slice(&posts[0].body).unwrap();
    let item = &json["items"][0];
    assert_eq!(item["original_name"], "Widget Classic");
    assert_eq!(item["status"], "oos");
    assert_eq!(item["explanation"], REFRESH_EXPLANATION);
    assert_eq!(item["alternatives"][0]["name"], "Widget New");
}
