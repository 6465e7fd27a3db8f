use thiserror::Error;

/// Errors raised while loading or validating extractor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bus_label must not be empty")]
    EmptyBusLabel,

    #[error("banner_width must be > 0")]
    ZeroBannerWidth,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors raised while constructing an extractor.
///
/// Once construction succeeds, feeding lines is infallible: malformed
/// captures surface as per-line diagnostics, never as errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("grammar compilation failed: {0}")]
    Grammar(#[from] regex::Error),
}

// Convenience type alias
pub type ExtractResult<T> = Result<T, ExtractError>;
