use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{DEFAULT_BANNER_WIDTH, DEFAULT_BUS_LABEL};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Vendor label inside the parse-failure marker text
    /// (`Failed to parse (non-critical) <bus_label> bridge message on [...]`).
    /// Matched literally; regex metacharacters are escaped at compile time.
    pub bus_label: String,

    /// Number of `=` characters in a section banner line. The banner is
    /// matched exactly: two leading spaces, then `banner_width` equals signs.
    pub banner_width: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            bus_label: DEFAULT_BUS_LABEL.to_string(),
            banner_width: DEFAULT_BANNER_WIDTH,
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from a TOML file. Missing keys fall back to
    /// defaults; the result is validated before it is returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: ExtractorConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus_label.trim().is_empty() {
            return Err(ConfigError::EmptyBusLabel);
        }
        if self.banner_width == 0 {
            return Err(ConfigError::ZeroBannerWidth);
        }
        Ok(())
    }

    /// The exact banner line delimiting unrelated log sections.
    pub(crate) fn banner_line(&self) -> String {
        format!("  {}", "=".repeat(self.banner_width))
    }
}
