use std::path::PathBuf;

/// Runtime configuration for a worker run, loaded once at process start and
/// passed by reference into each component.
#[derive(Clone)]
pub struct AppConfig {
    /// Ingestion endpoint URL. Required; the run aborts before any network
    /// activity when missing or empty.
    pub ingest_endpoint: String,
    /// Shared secret sent in the `X-Ingest-Secret` header. Required.
    pub ingest_secret: String,
    pub log_level: String,
    /// Path to the YAML merchants file listing sitemap URLs.
    pub merchants_path: PathBuf,
    pub user_agent: String,
    /// Per-host request budget; the fetcher enforces a minimum gap of
    /// `1 / max_rps_per_host` seconds between requests to the same host.
    pub max_rps_per_host: f64,
    pub request_timeout_secs: u64,
    /// Cap on product URLs taken from the head of the deduplicated sitemap
    /// list.
    pub max_sitemap_urls: usize,
    /// Cap on product pages fetched per run.
    pub max_product_pages: usize,
    /// Cap on discontinued/out-of-stock base products matched per run.
    pub max_base_products: usize,
    /// Candidates retained during scoring, before the final output cap.
    pub scored_pool_size: usize,
    /// Maximum alternatives attached to one recommendation item.
    pub max_alternatives: usize,
    /// Recommendation items per POST to the ingestion endpoint.
    pub publish_chunk_size: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("ingest_endpoint", &self.ingest_endpoint)
            .field("ingest_secret", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("merchants_path", &self.merchants_path)
            .field("user_agent", &self.user_agent)
            .field("max_rps_per_host", &self.max_rps_per_host)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_sitemap_urls", &self.max_sitemap_urls)
            .field("max_product_pages", &self.max_product_pages)
            .field("max_base_products", &self.max_base_products)
            .field("scored_pool_size", &self.scored_pool_size)
            .field("max_alternatives", &self.max_alternatives)
            .field("publish_chunk_size", &self.publish_chunk_size)
            .finish()
    }
}
