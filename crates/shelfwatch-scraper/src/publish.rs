//! Chunked publication of recommendation items to the ingestion endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::error::ScraperError;
use crate::types::RecommendationItem;

/// Header carrying the shared ingestion secret.
pub const SECRET_HEADER: &str = "X-Ingest-Secret";

/// Outcome of one chunk POST, surfaced to the caller for logging.
#[derive(Debug)]
pub struct ChunkReceipt {
    /// Index of the chunk's first item in the original list.
    pub offset: usize,
    pub status: u16,
    pub body: String,
}

/// Posts recommendation items to the ingestion endpoint in bounded chunks.
///
/// The endpoint and secret are validated non-empty at configuration load,
/// before this type is ever constructed. No automatic retry: a failed chunk
/// is logged and the remaining chunks still go out.
pub struct Publisher {
    client: Client,
    endpoint: String,
    secret: String,
    chunk_size: usize,
}

impl Publisher {
    /// Creates a `Publisher` with its own connection pool and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        endpoint: &str,
        secret: &str,
        chunk_size: usize,
        timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            secret: secret.to_string(),
            // A zero chunk size would loop forever; treat it as "one POST".
            chunk_size: chunk_size.max(1),
        })
    }

    /// POST `items` in consecutive chunks, preserving order.
    ///
    /// Each chunk goes out as `{"items": [...]}` with the shared-secret
    /// header. Non-2xx responses are logged per chunk and do not abort the
    /// remaining chunks; network failures on one chunk are likewise logged
    /// and skipped. Receipts are returned for every chunk that completed an
    /// HTTP exchange.
    pub async fn publish(&self, items: &[RecommendationItem]) -> Vec<ChunkReceipt> {
        let mut receipts = Vec::new();

        for (index, chunk) in items.chunks(self.chunk_size).enumerate() {
            let offset = index * self.chunk_size;
            let response = self
                .client
                .post(&self.endpoint)
                .header(SECRET_HEADER, &self.secret)
                .json(&json!({ "items": chunk }))
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    let preview: String = body.chars().take(200).collect();
                    if (200..300).contains(&status) {
                        tracing::info!(offset, status, body = %preview, "published chunk");
                    } else {
                        tracing::warn!(
                            offset,
                            status,
                            body = %preview,
                            "ingestion endpoint rejected chunk"
                        );
                    }
                    receipts.push(ChunkReceipt {
                        offset,
                        status,
                        body,
                    });
                }
                Err(e) => {
                    tracing::error!(offset, error = %e, "chunk POST failed — continuing");
                }
            }
        }

        receipts
    }
}
