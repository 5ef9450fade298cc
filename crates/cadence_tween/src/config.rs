//! Engine configuration (cadence.toml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::easing::Easing;
use crate::error::Result;
use crate::interpolation::Interpolation;
use crate::pool::DEFAULT_POOL_CAPACITY;
use crate::tween::TweenLimits;

/// Defaults applied to every animation built by a [`TweenEngine`](crate::TweenEngine)
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Buffer sizes of new tweens
    #[serde(default)]
    pub limits: TweenLimits,
    #[serde(default)]
    pub easing: Easing,
    /// Path navigator used when a tween has waypoints
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default = "default_true")]
    pub auto_remove: bool,
    #[serde(default = "default_true")]
    pub auto_start: bool,
    /// Idle tweens kept by the engine's pool
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_pool_capacity() -> usize {
    DEFAULT_POOL_CAPACITY
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limits: TweenLimits::default(),
            easing: Easing::default(),
            interpolation: Interpolation::default(),
            auto_remove: true,
            auto_start: true,
            pool_capacity: default_pool_capacity(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.limits.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TweenError;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.limits, TweenLimits::default());
        assert!(config.auto_remove);
        assert!(config.auto_start);
        assert_eq!(config.pool_capacity, DEFAULT_POOL_CAPACITY);
        assert!(matches!(config.easing, Easing::EaseInOutQuad));
    }

    #[test]
    fn test_parse_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            easing = "linear"
            interpolation = "linear"
            auto_start = false
            pool_capacity = 8

            [limits]
            combined_attrs = 4
            waypoints = 2
            "#,
        )
        .unwrap();

        assert!(matches!(config.easing, Easing::Linear));
        assert!(matches!(config.interpolation, Interpolation::Linear));
        assert!(!config.auto_start);
        assert!(config.auto_remove);
        assert_eq!(config.pool_capacity, 8);
        assert_eq!(config.limits, TweenLimits::new(4, 2));
    }

    #[test]
    fn test_rejects_small_limits() {
        let err = EngineConfig::from_toml_str("[limits]\ncombined_attrs = 2\n").unwrap_err();
        assert!(matches!(err, TweenError::InvalidLimits { combined_attrs: 2 }));
    }

    #[test]
    fn test_rejects_malformed() {
        let err = EngineConfig::from_toml_str("easing = \"wobbly\"").unwrap_err();
        assert!(matches!(err, TweenError::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip_keeps_values() {
        let config = EngineConfig {
            auto_remove: false,
            pool_capacity: 3,
            ..EngineConfig::default()
        };
        let text = config.to_toml().unwrap();
        let parsed = EngineConfig::from_toml_str(&text).unwrap();
        assert!(!parsed.auto_remove);
        assert_eq!(parsed.pool_capacity, 3);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/cadence.toml")).unwrap_err();
        assert!(matches!(err, TweenError::Io(_)));
    }
}
