pub mod classify;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod matcher;
pub mod pipeline;
pub mod publish;
pub mod reason;
pub mod robots;
pub mod sitemap;
pub mod types;

pub use classify::classify_status;
pub use error::ScraperError;
pub use extract::extract_product;
pub use fetch::{FetchOutcome, Fetcher};
pub use matcher::rank_alternatives;
pub use publish::{ChunkReceipt, Publisher};
pub use robots::RobotsPolicy;
pub use sitemap::{dedupe_preserving_order, parse_sitemap};
pub use types::{AlternativeCandidate, ProductRecord, RecommendationItem, Status};
