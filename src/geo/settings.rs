//! Search settings for the geohash index.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{GeoError, Result};
use super::types::{DEFAULT_PREFIX_PRECISION, MAX_PRECISION};

/// How search prefixes for a bounding box are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoverStrategy {
    /// Recursive subdivision; never misses a point inside the box.
    #[default]
    Exact,
    /// Sampling grid at 20 steps per degree; cheaper, may miss cells.
    Sampled,
}

/// Settings for geohash indexing and search.
///
/// # Example
///
/// ```
/// use tenerife_geo::geo::{CoverStrategy, GeoSettings};
///
/// let settings = GeoSettings::from_json(r#"{"prefix_precision": 4}"#).unwrap();
/// assert_eq!(settings.prefix_precision, 4);
/// assert_eq!(settings.storage_precision, 9);
/// assert_eq!(settings.cover_strategy, CoverStrategy::Exact);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoSettings {
    /// Geohash length stored for every indexed entry (1-12)
    pub storage_precision: u8,

    /// Geohash length of search prefixes (1 to `storage_precision`)
    ///
    /// Shorter prefixes mean fewer range scans but more candidates to
    /// post-filter.
    pub prefix_precision: u8,

    /// How bounding boxes are turned into prefixes
    pub cover_strategy: CoverStrategy,
}

impl Default for GeoSettings {
    fn default() -> Self {
        Self {
            storage_precision: 9,
            prefix_precision: DEFAULT_PREFIX_PRECISION,
            cover_strategy: CoverStrategy::default(),
        }
    }
}

impl GeoSettings {
    /// Checks precision ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidSettings`] if either precision is outside
    /// 1..=12 or the prefix is longer than the stored geohash.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("storage_precision", self.storage_precision),
            ("prefix_precision", self.prefix_precision),
        ] {
            if value == 0 || value > MAX_PRECISION {
                return Err(GeoError::InvalidSettings(format!(
                    "{name} must be between 1 and {}, got {value}",
                    MAX_PRECISION
                )));
            }
        }
        if self.prefix_precision > self.storage_precision {
            return Err(GeoError::InvalidSettings(format!(
                "prefix_precision ({}) exceeds storage_precision ({})",
                self.prefix_precision, self.storage_precision
            )));
        }
        Ok(())
    }

    /// Parses and validates settings from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the settings are invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Converts these settings to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Loads and validates settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds
    /// invalid settings.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let settings = GeoSettings::default();
        assert_eq!(settings.storage_precision, 9);
        assert_eq!(settings.prefix_precision, 5);
        assert_eq!(settings.cover_strategy, CoverStrategy::Exact);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn json_roundtrip() {
        let settings = GeoSettings {
            storage_precision: 8,
            prefix_precision: 6,
            cover_strategy: CoverStrategy::Sampled,
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"sampled\""));
        assert_eq!(GeoSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn empty_json_uses_defaults() {
        assert_eq!(GeoSettings::from_json("{}").unwrap(), GeoSettings::default());
    }

    #[test]
    fn rejects_zero_precision() {
        let err = GeoSettings::from_json(r#"{"prefix_precision": 0}"#).unwrap_err();
        assert!(matches!(err, GeoError::InvalidSettings(_)));
        assert!(err.to_string().contains("prefix_precision"));
    }

    #[test]
    fn rejects_precision_above_max() {
        let settings = GeoSettings {
            storage_precision: 13,
            ..GeoSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(GeoError::InvalidSettings(_))
        ));
    }

    #[test]
    fn rejects_prefix_longer_than_storage() {
        let err =
            GeoSettings::from_json(r#"{"storage_precision": 5, "prefix_precision": 6}"#).unwrap_err();
        assert!(err.to_string().contains("exceeds storage_precision"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            GeoSettings::from_json("{ not json"),
            Err(GeoError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            GeoSettings::from_file("/nonexistent/tenerife-geo.json"),
            Err(GeoError::Io(_))
        ));
    }
}
