//! XML sitemap parsing.

use std::collections::HashSet;

use quick_xml::events::Event;
use quick_xml::Reader;

/// Extract every `<url><loc>` text value from a sitemap document, trimmed of
/// surrounding whitespace, in document order.
///
/// Malformed XML yields an empty list — a broken sitemap is "no URLs", never
/// an error.
#[must_use]
pub fn parse_sitemap(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.local_name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "url" {
                    in_url = true;
                } else if name == "loc" && in_url {
                    in_loc = true;
                    current.clear();
                }
            }
            Ok(Event::End(e)) => {
                let name_buf = e.local_name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "loc" && in_loc {
                    in_loc = false;
                    let trimmed = current.trim();
                    if !trimmed.is_empty() {
                        urls.push(trimmed.to_string());
                    }
                } else if name == "url" {
                    in_url = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_loc {
                    current.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            // Broken document: discard everything, not just the tail.
            Err(_) => return Vec::new(),
        }
    }

    urls
}

/// Deduplicate URLs across multiple sitemaps, keeping first-seen order.
#[must_use]
pub fn dedupe_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}
