//! Canned payload for checking ingestion-endpoint wiring without a crawl.

use shelfwatch_scraper::{AlternativeCandidate, RecommendationItem, Status};

/// One representative recommendation item, matching the ingestion contract.
pub(crate) fn sample_item() -> RecommendationItem {
    RecommendationItem {
        original_name: "Acme Widget 3000".to_string(),
        original_url: "https://example.com/acme-widget-3000".to_string(),
        status: Status::Discontinued,
        slug: "acme-widget-3000".to_string(),
        explanation: "Closest current models with similar capacity and price.".to_string(),
        alternatives: vec![
            AlternativeCandidate {
                name: "Acme Widget 4000".to_string(),
                url: "https://www.bestbuy.com/site/placeholder/000000.p".to_string(),
                price: Some("$129".to_string()),
                merchant: "Best Buy".to_string(),
                reason: "Newer model; same accessories".to_string(),
            },
            AlternativeCandidate {
                name: "Contoso Widget Pro".to_string(),
                url: "https://www.walmart.com/ip/placeholder/000000".to_string(),
                price: Some("$119".to_string()),
                merchant: "Walmart".to_string(),
                reason: "Cheaper; similar spec".to_string(),
            },
            AlternativeCandidate {
                name: "Globex Widget Lite".to_string(),
                url: "https://www.amazon.com/dp/B000000000".to_string(),
                price: Some("$99".to_string()),
                merchant: "Amazon".to_string(),
                reason: "Budget alternative".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_item_serializes_with_all_contract_fields() {
        let json = serde_json::to_value(sample_item()).unwrap();
        assert_eq!(json["original_name"], "Acme Widget 3000");
        assert_eq!(json["status"], "discontinued");
        assert_eq!(json["slug"], "acme-widget-3000");
        assert_eq!(json["alternatives"].as_array().unwrap().len(), 3);
        assert_eq!(json["alternatives"][0]["merchant"], "Best Buy");
    }
}
