//! End-to-end discovery and refresh runs.
//!
//! Both runs share the same front half — resolve sitemaps, fetch product
//! pages politely, extract records — and differ in how base products are
//! selected and labeled. Per-URL fetch failures are logged and skipped so a
//! single bad page never aborts a run.

use shelfwatch_core::AppConfig;

use crate::classify::classify_status;
use crate::error::ScraperError;
use crate::extract::extract_product;
use crate::fetch::Fetcher;
use crate::matcher::rank_alternatives;
use crate::publish::{ChunkReceipt, Publisher};
use crate::sitemap::{dedupe_preserving_order, parse_sitemap};
use crate::types::{slug_from_name, ProductRecord, RecommendationItem, Status};

pub const DISCOVER_EXPLANATION: &str =
    "Selected by similarity, price/availability, and ratings where available.";
pub const REFRESH_EXPLANATION: &str =
    "Refreshed alternatives based on current availability and price.";

/// A refresh run touches fewer bases and scores a smaller pool than
/// discovery: it only bumps existing recommendations.
const REFRESH_MAX_BASES: usize = 30;
const REFRESH_SCORED_POOL: usize = 6;

/// One fetched product page: the extracted record plus the HTML it came
/// from, kept for text-cue classification without a second fetch.
pub struct FetchedPage {
    pub record: ProductRecord,
    pub html: String,
}

/// What a run did, for operator logging.
#[derive(Debug)]
pub struct RunSummary {
    pub urls_discovered: usize,
    pub pages_fetched: usize,
    pub items_built: usize,
    pub receipts: Vec<ChunkReceipt>,
}

/// Resolve sitemaps into a deduplicated, capped list of product URLs.
///
/// Sitemap fetch failures and unparseable documents contribute no URLs;
/// they never abort the run.
pub async fn collect_product_urls(
    fetcher: &Fetcher,
    sitemaps: &[String],
    cap: usize,
) -> Vec<String> {
    let mut urls = Vec::new();
    for sitemap_url in sitemaps {
        match fetcher.get(sitemap_url, None, None).await {
            Ok(outcome) => {
                if let Some(xml) = outcome.body {
                    urls.extend(parse_sitemap(&xml));
                }
            }
            Err(e) => {
                tracing::warn!(url = %sitemap_url, error = %e, "sitemap fetch failed — skipping");
            }
        }
    }
    let mut urls = dedupe_preserving_order(urls);
    urls.truncate(cap);
    urls
}

/// Fetch up to `max_pages` product pages and extract a record from each.
///
/// Pages denied by robots policy or failing to fetch are skipped with a log
/// line (the skip-and-continue policy for product-page failures).
pub async fn gather_products(
    fetcher: &Fetcher,
    urls: &[String],
    max_pages: usize,
) -> Vec<FetchedPage> {
    let mut pages = Vec::new();
    for url in urls.iter().take(max_pages) {
        match fetcher.get(url, None, None).await {
            Ok(outcome) => {
                if let Some(html) = outcome.body {
                    pages.push(FetchedPage {
                        record: extract_product(url, &html),
                        html,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "product page fetch failed — skipping");
            }
        }
    }
    pages
}

/// Build recommendation items for `bases` against an in-stock candidate
/// pool. A base with no ranked alternatives produces no item.
fn build_items(
    bases: &[(&ProductRecord, Status)],
    pool: &[ProductRecord],
    scored_cap: usize,
    final_cap: usize,
    explanation: &str,
) -> Vec<RecommendationItem> {
    let mut items = Vec::new();
    for (base, status) in bases {
        let alternatives = rank_alternatives(base, pool, scored_cap, final_cap);
        if alternatives.is_empty() {
            continue;
        }
        let original_name = base
            .name
            .clone()
            .unwrap_or_else(|| "Original Product".to_string());
        items.push(RecommendationItem {
            slug: slug_from_name(&original_name),
            original_name,
            original_url: base.url.clone(),
            status: *status,
            explanation: explanation.to_string(),
            alternatives,
        });
    }
    items
}

/// Full discovery run: find discontinued/out-of-stock products and publish
/// ranked in-stock alternatives for each.
///
/// # Errors
///
/// Returns [`ScraperError`] only for setup failures (client construction);
/// per-URL and per-chunk failures are logged and skipped.
pub async fn run_discover(
    config: &AppConfig,
    sitemaps: &[String],
) -> Result<RunSummary, ScraperError> {
    let fetcher = Fetcher::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_rps_per_host,
    )?;
    let publisher = Publisher::new(
        &config.ingest_endpoint,
        &config.ingest_secret,
        config.publish_chunk_size,
        config.request_timeout_secs,
    )?;

    let urls = collect_product_urls(&fetcher, sitemaps, config.max_sitemap_urls).await;
    tracing::info!(count = urls.len(), "resolved product URLs from sitemaps");

    let pages = gather_products(&fetcher, &urls, config.max_product_pages).await;
    tracing::info!(count = pages.len(), "fetched product pages");

    let bases: Vec<(&ProductRecord, Status)> = pages
        .iter()
        .filter_map(|page| {
            let status = classify_status(page.record.name.as_deref(), &page.html, &page.record);
            match status {
                Status::Live => None,
                _ => Some((&page.record, status)),
            }
        })
        .take(config.max_base_products)
        .collect();
    tracing::info!(count = bases.len(), "classified discontinued/OOS base products");

    let pool: Vec<ProductRecord> = pages
        .iter()
        .filter(|page| page.record.is_in_stock())
        .map(|page| page.record.clone())
        .collect();

    let items = build_items(
        &bases,
        &pool,
        config.scored_pool_size,
        config.max_alternatives,
        DISCOVER_EXPLANATION,
    );
    tracing::info!(count = items.len(), "built recommendation items");

    let receipts = publisher.publish(&items).await;

    Ok(RunSummary {
        urls_discovered: urls.len(),
        pages_fetched: pages.len(),
        items_built: items.len(),
        receipts,
    })
}

/// Refresh run: re-rank alternatives for anything currently not in stock so
/// downstream pages pick up availability and price drift.
///
/// Unlike discovery, the classifier is not consulted: any non-instock
/// record is refreshed with status "oos".
///
/// # Errors
///
/// Returns [`ScraperError`] only for setup failures; per-URL and per-chunk
/// failures are logged and skipped.
pub async fn run_refresh(
    config: &AppConfig,
    sitemaps: &[String],
) -> Result<RunSummary, ScraperError> {
    let fetcher = Fetcher::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_rps_per_host,
    )?;
    let publisher = Publisher::new(
        &config.ingest_endpoint,
        &config.ingest_secret,
        config.publish_chunk_size,
        config.request_timeout_secs,
    )?;

    let urls = collect_product_urls(&fetcher, sitemaps, config.max_sitemap_urls).await;
    let pages = gather_products(&fetcher, &urls, config.max_product_pages).await;

    let bases: Vec<(&ProductRecord, Status)> = pages
        .iter()
        .filter(|page| !page.record.is_in_stock())
        .map(|page| (&page.record, Status::Oos))
        .take(REFRESH_MAX_BASES)
        .collect();

    let pool: Vec<ProductRecord> = pages
        .iter()
        .filter(|page| page.record.is_in_stock())
        .map(|page| page.record.clone())
        .collect();

    let items = build_items(
        &bases,
        &pool,
        REFRESH_SCORED_POOL,
        config.max_alternatives,
        REFRESH_EXPLANATION,
    );
    tracing::info!(count = items.len(), "built refresh items");

    let receipts = publisher.publish(&items).await;

    Ok(RunSummary {
        urls_discovered: urls.len(),
        pages_fetched: pages.len(),
        items_built: items.len(),
        receipts,
    })
}
