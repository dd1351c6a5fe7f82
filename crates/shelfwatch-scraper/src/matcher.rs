//! Fuzzy name matching and alternative ranking.

use std::collections::BTreeSet;

use crate::reason::compose_reason;
use crate::types::{AlternativeCandidate, ProductRecord};

/// Token-set similarity between two names, scored 0–100.
///
/// Both names are lowercased and split into alphanumeric word sets; the
/// score is the best normalized edit-distance ratio among the set
/// intersection and the two intersection-plus-remainder strings. Robust to
/// word reordering, and 100 whenever one name's words are a subset of the
/// other's.
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> u32 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let intersection: Vec<&str> = tokens_a
        .intersection(&tokens_b)
        .map(String::as_str)
        .collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).map(String::as_str).collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).map(String::as_str).collect();

    let base = intersection.join(" ");
    let combined_a = join_parts(&base, &only_a);
    let combined_b = join_parts(&base, &only_b);

    let best = strsim::normalized_levenshtein(&base, &combined_a)
        .max(strsim::normalized_levenshtein(&base, &combined_b))
        .max(strsim::normalized_levenshtein(&combined_a, &combined_b));

    // An empty intersection scores 0 against both combined strings, so only
    // the cross comparison contributes there.
    (best * 100.0).round() as u32
}

fn tokenize(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_parts(base: &str, rest: &[&str]) -> String {
    if rest.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        rest.join(" ")
    } else {
        format!("{base} {}", rest.join(" "))
    }
}

/// Score `pool` against `base` and return the ranked alternative list.
///
/// The base's own URL is excluded from the pool even if present. Candidates
/// are sorted by descending similarity (stable: ties keep pool order), the
/// top `scored_cap` are retained for reason composition, and the final list
/// is truncated to `final_cap`. Callers must restrict `pool` to in-stock
/// products beforehand.
#[must_use]
pub fn rank_alternatives(
    base: &ProductRecord,
    pool: &[ProductRecord],
    scored_cap: usize,
    final_cap: usize,
) -> Vec<AlternativeCandidate> {
    let base_name = base.name.as_deref().unwrap_or_default();

    let mut scored: Vec<(u32, &ProductRecord)> = pool
        .iter()
        .filter(|alt| alt.url != base.url)
        .map(|alt| {
            (
                token_set_ratio(base_name, alt.name.as_deref().unwrap_or_default()),
                alt,
            )
        })
        .collect();
    scored.sort_by(|(sa, _), (sb, _)| sb.cmp(sa));

    scored
        .into_iter()
        .take(scored_cap)
        .map(|(_, alt)| AlternativeCandidate {
            name: alt
                .name
                .clone()
                .unwrap_or_else(|| "Alternative".to_string()),
            url: alt.url.clone(),
            price: alt.price.as_deref().map(display_price),
            merchant: String::new(),
            reason: compose_reason(base, alt),
        })
        .take(final_cap)
        .collect()
}

/// Format a raw price for display: prefix a `$` unless the value already
/// starts with one.
fn display_price(raw: &str) -> String {
    if raw.starts_with('$') {
        raw.to_string()
    } else {
        format!("${raw}")
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
