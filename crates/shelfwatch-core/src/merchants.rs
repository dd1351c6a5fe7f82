use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Merchant configuration: the sitemap URLs a run crawls for product pages.
///
/// Loaded once at process start and read-only thereafter.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantsFile {
    pub sitemaps: Vec<String>,
}

/// Load and validate the merchants configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_merchants(path: &Path) -> Result<MerchantsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MerchantsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let merchants: MerchantsFile = serde_yaml::from_str(&content)?;

    validate_merchants(&merchants)?;

    Ok(merchants)
}

fn validate_merchants(merchants: &MerchantsFile) -> Result<(), ConfigError> {
    if merchants.sitemaps.is_empty() {
        return Err(ConfigError::Validation(
            "merchants file must list at least one sitemap URL".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for url in &merchants.sitemaps {
        if url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sitemap URL must be non-empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "sitemap URL '{url}' must start with http:// or https://"
            )));
        }
        if !seen.insert(url.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate sitemap URL '{url}'"
            )));
        }
    }

    Ok(())
}
