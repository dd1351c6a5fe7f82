use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    // Required vars must be present AND non-empty after trimming: an empty
    // endpoint or secret must abort before any network activity.
    let require = |var: &str| -> Result<String, ConfigError> {
        let raw = lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))?;
        let trimmed = raw.trim().to_string();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be non-empty".to_string(),
            });
        }
        Ok(trimmed)
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value <= 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(value)
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let ingest_endpoint = require("SHELFWATCH_INGEST_ENDPOINT")?;
    let ingest_secret = require("SHELFWATCH_INGEST_SECRET")?;

    let log_level = or_default("SHELFWATCH_LOG_LEVEL", "info");
    let merchants_path = PathBuf::from(or_default(
        "SHELFWATCH_MERCHANTS_PATH",
        "./config/merchants.yaml",
    ));
    let user_agent = or_default(
        "SHELFWATCH_USER_AGENT",
        "shelfwatch/0.1 (alternative-product-discovery)",
    );

    let max_rps_per_host = parse_f64("SHELFWATCH_MAX_RPS_PER_HOST", "1.5")?;
    let request_timeout_secs = parse_u64("SHELFWATCH_REQUEST_TIMEOUT_SECS", "20")?;

    let max_sitemap_urls = parse_usize("SHELFWATCH_MAX_SITEMAP_URLS", "300")?;
    let max_product_pages = parse_usize("SHELFWATCH_MAX_PRODUCT_PAGES", "200")?;
    let max_base_products = parse_usize("SHELFWATCH_MAX_BASE_PRODUCTS", "50")?;
    let scored_pool_size = parse_usize("SHELFWATCH_SCORED_POOL_SIZE", "8")?;
    let max_alternatives = parse_usize("SHELFWATCH_MAX_ALTERNATIVES", "6")?;
    let publish_chunk_size = parse_usize("SHELFWATCH_PUBLISH_CHUNK_SIZE", "25")?;

    Ok(AppConfig {
        ingest_endpoint,
        ingest_secret,
        log_level,
        merchants_path,
        user_agent,
        max_rps_per_host,
        request_timeout_secs,
        max_sitemap_urls,
        max_product_pages,
        max_base_products,
        scored_pool_size,
        max_alternatives,
        publish_chunk_size,
    })
}
