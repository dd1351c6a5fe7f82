//! Records threaded through the discovery pipeline.
//!
//! The original data flow passed loosely-shaped key/value maps between
//! stages; here every stage works on an explicit [`ProductRecord`] with
//! all-optional typed fields so a missing key is visible in the type rather
//! than silently absent.

use serde::{Serialize, Serializer};

/// Normalized product data recovered from one fetched page.
///
/// Built by [`crate::extract::extract_product`]; immutable once built.
/// Every field except `url` is optional: structured markup on merchant pages
/// is best-effort and frequently partial.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    /// Page URL; the record's unique key.
    pub url: String,
    pub name: Option<String>,
    /// Raw price value as it appeared in the markup, currency-agnostic.
    /// May be a bare number (`"99.99"`) or already carry a symbol (`"$99.99"`).
    pub price: Option<String>,
    pub currency: Option<String>,
    /// Normalized availability token: the last path segment of a
    /// schema.org availability URI, e.g. `"InStock"` or `"OutOfStock"`.
    pub availability: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
}

impl ProductRecord {
    /// Returns an empty record for `url` with all data fields absent.
    #[must_use]
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            name: None,
            price: None,
            currency: None,
            availability: None,
            rating: None,
            review_count: None,
        }
    }

    /// True when the extracted availability token is exactly "instock",
    /// case-insensitively.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.availability
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case("instock"))
    }
}

/// Stock status assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Discontinued,
    Oos,
    Live,
}

impl Status {
    /// Wire label for this status. `Live` products never reach the
    /// ingestion endpoint, so their label is the empty string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Discontinued => "discontinued",
            Status::Oos => "oos",
            Status::Live => "",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One ranked alternative attached to a recommendation item.
#[derive(Debug, Clone, Serialize)]
pub struct AlternativeCandidate {
    pub name: String,
    pub url: String,
    /// Display price: prefixed with `$` when the raw value is numeric and
    /// carries no currency symbol of its own.
    pub price: Option<String>,
    /// Merchant display name; may be empty.
    pub merchant: String,
    /// Human-readable justification; never empty (falls back to a default).
    pub reason: String,
}

/// Unit of publication: one discontinued/out-of-stock product with its
/// ranked in-stock alternatives.
///
/// Only constructed when `alternatives` is non-empty after ranking and
/// truncation.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationItem {
    pub original_name: String,
    pub original_url: String,
    pub status: Status,
    /// URL-safe identifier derived from the name. Best-effort unique only:
    /// distinct names truncated to the same prefix collide.
    pub slug: String,
    pub explanation: String,
    pub alternatives: Vec<AlternativeCandidate>,
}

/// Derive a URL-safe slug from a display name.
///
/// The name is capped at 80 characters before slugification, then lowercased
/// with runs of non-alphanumeric characters collapsed to single hyphens.
#[must_use]
pub fn slug_from_name(name: &str) -> String {
    let capped: String = name.chars().take(80).collect();
    capped
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
