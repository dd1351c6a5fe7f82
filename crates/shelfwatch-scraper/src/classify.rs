//! Stock-status classification for extracted products.

use crate::types::{ProductRecord, Status};

/// Name keywords that mark a product discontinued regardless of what its
/// structured availability claims.
const DISCONTINUED_KEYWORDS: [&str; 5] =
    ["discontinued", "legacy", "out of stock", "oos", "clearance"];

/// Classify a product from its display name, raw page HTML, and extracted
/// record.
///
/// Precedence is significant and fixed:
/// 1. a discontinued keyword in the lowercased name wins outright;
/// 2. else a structured availability present and not exactly "instock" is
///    out of stock;
/// 3. else "out of stock" / "no longer available" anywhere in the page text
///    is out of stock;
/// 4. else the product is live.
#[must_use]
pub fn classify_status(name: Option<&str>, html: &str, record: &ProductRecord) -> Status {
    let name_lower = name.unwrap_or_default().to_lowercase();
    if DISCONTINUED_KEYWORDS.iter().any(|k| name_lower.contains(k)) {
        return Status::Discontinued;
    }

    if let Some(availability) = record.availability.as_deref() {
        if !availability.eq_ignore_ascii_case("instock") {
            return Status::Oos;
        }
    }

    let html_lower = html.to_lowercase();
    if html_lower.contains("out of stock") || html_lower.contains("no longer available") {
        return Status::Oos;
    }

    Status::Live
}
