use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod merchants;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use merchants::{load_merchants, MerchantsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read merchants file at {path}: {source}")]
    MerchantsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse merchants file: {0}")]
    MerchantsFileParse(#[from] serde_yaml::Error),

    #[error("merchants file validation failed: {0}")]
    Validation(String),
}
