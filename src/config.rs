use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field may be omitted from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Dataset read at startup.
    pub data_path: PathBuf,
    /// Lower end of the initial year selection.
    pub default_year_low: i32,
    /// Initial price selection, local currency units.
    pub default_price_low: f64,
    pub default_price_high: f64,
    /// Price slider step.
    pub price_step: f64,
    /// Number of buckets in the year histogram.
    pub histogram_bins: usize,
    /// Rows shown in the preview table.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("cleaned_bike_data.csv"),
            default_year_low: 2010,
            default_price_low: 50_000.0,
            default_price_high: 2_000_000.0,
            price_step: 10_000.0,
            histogram_bins: 15,
            preview_rows: 100,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be at least 1"));
        }
        if !(self.price_step > 0.0) {
            return Err(ConfigError::Invalid("price_step must be positive"));
        }
        if !(self.default_price_low <= self.default_price_high) {
            return Err(ConfigError::Invalid(
                "default_price_low must not exceed default_price_high",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_take_defaults() {
        let config = DashboardConfig::from_json(r#"{"preview_rows": 25}"#).unwrap();
        assert_eq!(config.preview_rows, 25);
        assert_eq!(config.histogram_bins, 15);
        assert_eq!(config.data_path, PathBuf::from("cleaned_bike_data.csv"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{"colour": "blue"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_bins_are_rejected() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{"histogram_bins": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn inverted_default_prices_are_rejected() {
        let text = r#"{"default_price_low": 10.0, "default_price_high": 5.0}"#;
        assert!(matches!(
            DashboardConfig::from_json(text),
            Err(ConfigError::Invalid(_))
        ));
    }
}
