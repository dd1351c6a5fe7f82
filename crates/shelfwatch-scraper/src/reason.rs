//! Human-readable justification strings for ranked alternatives.

use crate::types::ProductRecord;

/// Returned when no concrete justification applies; the reason string is
/// never empty.
pub const FALLBACK_REASON: &str = "Comparable spec and value";

/// Price difference below which a "cheaper" note is not worth surfacing.
const CHEAPER_THRESHOLD: f64 = 0.15;

/// Compose the semicolon-joined justification for recommending `alt` in
/// place of `base`.
///
/// Notes are evaluated in a fixed order, each independently optional:
/// a >15% price drop, in-stock availability, then the alternative's rating.
#[must_use]
pub fn compose_reason(base: &ProductRecord, alt: &ProductRecord) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if let (Some(base_price), Some(alt_price)) = (
        parse_price(base.price.as_deref()),
        parse_price(alt.price.as_deref()),
    ) {
        let delta = (base_price - alt_price) / base_price;
        if delta > CHEAPER_THRESHOLD {
            // Truncate, don't round: "~19% cheaper" must not overstate.
            let percent = (delta * 100.0) as u32;
            reasons.push(format!("~{percent}% cheaper"));
        }
    }

    if alt.is_in_stock() {
        reasons.push("In stock".to_string());
    }

    if let Some(rating) = alt.rating {
        reasons.push(format!("Rated {rating}"));
    }

    if reasons.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        reasons.join("; ")
    }
}

/// Parse a raw price display value to a number by stripping everything but
/// digits and dots. Zero and unparseable values count as absent — a $0 base
/// price cannot anchor a percentage.
fn parse_price(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    cleaned.parse::<f64>().ok().filter(|v| *v > 0.0)
}
