//! Structured product extraction from merchant page HTML.
//!
//! Scans `<script type="application/ld+json">` blocks for the first
//! schema.org `Product` node and pulls name, offer price/currency/
//! availability, and aggregate rating from it. Malformed JSON inside one
//! block skips that block only — extraction never fails, it just yields a
//! sparser record.

use regex::Regex;

use crate::types::ProductRecord;

/// Build a [`ProductRecord`] for `url` from a page's HTML.
///
/// The first JSON-LD node typed `"Product"` (string or singleton list) wins;
/// later nodes are ignored. When no structured node is found the price falls
/// back to a best-effort `$`-prefixed pattern scan of the raw HTML. In either
/// path a missing name falls back to the `<title>` element text.
#[must_use]
pub fn extract_product(url: &str, html: &str) -> ProductRecord {
    let mut record = ProductRecord::empty(url);

    if let Some(node) = first_product_node(html) {
        record.name = string_field(&node, "name");

        let offers = match node.get("offers") {
            // Offer lists: take the first element, matching what merchants
            // put first in practice (the default variant).
            Some(serde_json::Value::Array(list)) => list.first().cloned(),
            Some(other) => Some(other.clone()),
            None => None,
        };
        if let Some(offers) = offers {
            record.price = string_field(&offers, "price");
            record.currency = string_field(&offers, "priceCurrency");
            record.availability = string_field(&offers, "availability")
                .map(|a| a.rsplit('/').next().unwrap_or(&a).to_string());
        }

        if let Some(agg) = node.get("aggregateRating") {
            record.rating = numeric_field(agg, "ratingValue");
            record.review_count = integer_field(agg, "reviewCount")
                .or_else(|| integer_field(agg, "reviewcount"))
                .or_else(|| integer_field(agg, "ratingCount"));
        }
    } else {
        record.price = fallback_price(html);
    }

    if record.name.is_none() {
        record.name = title_text(html);
    }

    record
}

/// Find the first JSON-LD node whose `@type` is `"Product"`, either as a
/// plain string or as a singleton list.
fn first_product_node(html: &str) -> Option<serde_json::Value> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");

    for cap in script_re.captures_iter(html) {
        let json_text = match cap.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };

        let value: serde_json::Value = match serde_json::from_str(json_text) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let candidates: Vec<serde_json::Value> = match value {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };

        for node in candidates {
            if is_product(&node) {
                return Some(node);
            }
        }
    }

    None
}

fn is_product(node: &serde_json::Value) -> bool {
    match node.get("@type") {
        Some(serde_json::Value::String(s)) => s == "Product",
        Some(serde_json::Value::Array(list)) => {
            list.len() == 1 && list[0].as_str() == Some("Product")
        }
        _ => false,
    }
}

/// Read a field that may be a JSON string or a bare number, as a string.
fn string_field(node: &serde_json::Value, key: &str) -> Option<String> {
    match node.get(key) {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn numeric_field(node: &serde_json::Value, key: &str) -> Option<f64> {
    node.get(key).and_then(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.parse::<f64>().ok()))
    })
}

fn integer_field(node: &serde_json::Value, key: &str) -> Option<i64> {
    node.get(key).and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.parse::<i64>().ok()))
    })
}

/// Best-effort price scan for pages without structured markup: the first
/// dollar-prefixed numeric pattern, kept with its `$`.
fn fallback_price(html: &str) -> Option<String> {
    let price_re = Regex::new(r"\$\d+[.,]?\d*").expect("valid regex");
    price_re.find(html).map(|m| m.as_str().to_string())
}

fn title_text(html: &str) -> Option<String> {
    let title_re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex");
    title_re
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
