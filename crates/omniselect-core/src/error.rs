use thiserror::Error;

/// Errors raised by omniselect-core outside the load path (config, stores).
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Failure reported by an option provider.
///
/// These never escape the load controller: they collapse into an empty page
/// and are recorded in `LoadState::error` for whoever renders the state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider failed: {0}")]
    Failed(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("provider dropped the request without responding")]
    Dropped,
}

pub type Result<T> = std::result::Result<T, SelectError>;
