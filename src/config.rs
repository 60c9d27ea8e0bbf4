//! Configuration file support
//!
//! Settings resolve in three layers: built-in defaults, then a TOML config
//! file, then command-line overrides. A local `adsweep.toml` in the working
//! directory wins over the per-user config file.

use crate::cleaner::CleanOptions;
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "adsweep.toml";

// ============================================================
// Error Types
// ============================================================

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================
// Config Sections
// ============================================================

/// Footer detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectConfig {
    /// Fraction of the page height inspected as the footer band.
    pub footer_fraction: f32,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            footer_fraction: crate::detect::DEFAULT_FOOTER_FRACTION,
        }
    }
}

/// Margin trimming settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrimConfig {
    /// Trim cleaned pages to their content bounds.
    pub enabled: bool,
    /// Luminance at or above this value counts as background.
    pub background_threshold: u8,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            background_threshold: crate::trim::DEFAULT_BACKGROUND_THRESHOLD,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Rasterization resolution in DPI.
    pub dpi: u32,
    /// JPEG quality for assembled PDFs, 1 to 100.
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dpi: crate::pdf::DEFAULT_DPI,
            jpeg_quality: crate::pdf::DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Worker thread count; absent means one per CPU.
    pub threads: Option<usize>,
}

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub detect: DetectConfig,
    pub trim: TrimConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

// ============================================================
// CLI Overrides
// ============================================================

/// Command-line values that take precedence over the config file.
///
/// Only fields the user explicitly set are `Some`, so config file values
/// survive when the flag was omitted.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub footer_fraction: Option<f32>,
    pub trim_margins: Option<bool>,
    pub background_threshold: Option<u8>,
    pub dpi: Option<u32>,
    pub jpeg_quality: Option<u8>,
    pub threads: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================
// Loading and Merging
// ============================================================

impl Config {
    /// Per-user config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("adsweep-pdf").join("config.toml"))
    }

    /// Load configuration from the standard locations.
    ///
    /// Checks `./adsweep.toml`, then the per-user config file. When neither
    /// exists the defaults are returned.
    pub fn load() -> Result<Self> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_path(&local);
        }
        if let Some(user_path) = Self::config_path() {
            if user_path.exists() {
                return Self::load_from_path(&user_path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let f = self.detect.footer_fraction;
        if !f.is_finite() || f <= 0.0 || f > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "detect.footer_fraction {} must be in (0, 1]",
                f
            )));
        }
        if self.output.jpeg_quality == 0 || self.output.jpeg_quality > 100 {
            return Err(ConfigError::Invalid(format!(
                "output.jpeg_quality {} must be between 1 and 100",
                self.output.jpeg_quality
            )));
        }
        if self.output.dpi == 0 {
            return Err(ConfigError::Invalid("output.dpi must be at least 1".to_string()));
        }
        if self.processing.threads == Some(0) {
            return Err(ConfigError::Invalid(
                "processing.threads must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply CLI overrides on top of this configuration.
    #[must_use]
    pub fn merge_with_cli(mut self, overrides: &CliOverrides) -> Self {
        if let Some(fraction) = overrides.footer_fraction {
            self.detect.footer_fraction = fraction;
        }
        if let Some(trim) = overrides.trim_margins {
            self.trim.enabled = trim;
        }
        if let Some(threshold) = overrides.background_threshold {
            self.trim.background_threshold = threshold;
        }
        if let Some(dpi) = overrides.dpi {
            self.output.dpi = dpi;
        }
        if let Some(quality) = overrides.jpeg_quality {
            self.output.jpeg_quality = quality;
        }
        if let Some(threads) = overrides.threads {
            self.processing.threads = Some(threads);
        }
        self
    }

    /// Pipeline configuration from the detect and trim sections.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::builder()
            .footer_fraction(self.detect.footer_fraction)
            .trim_margins(self.trim.enabled)
            .background_threshold(self.trim.background_threshold)
            .build()
    }

    /// Cleaning options from this configuration; the keep map and page
    /// limit stay at their defaults.
    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            pipeline: self.pipeline_config(),
            dpi: self.output.dpi,
            jpeg_quality: self.output.jpeg_quality,
            ..CleanOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.detect.footer_fraction, 0.15);
        assert!(config.trim.enabled);
        assert_eq!(config.trim.background_threshold, 250);
        assert_eq!(config.output.dpi, 150);
        assert_eq!(config.output.jpeg_quality, 90);
        assert_eq!(config.processing.threads, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [detect]
            footer_fraction = 0.2

            [trim]
            enabled = false
            background_threshold = 240

            [output]
            dpi = 300
            jpeg_quality = 85

            [processing]
            threads = 4
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.detect.footer_fraction, 0.2);
        assert!(!config.trim.enabled);
        assert_eq!(config.trim.background_threshold, 240);
        assert_eq!(config.output.dpi, 300);
        assert_eq!(config.output.jpeg_quality, 85);
        assert_eq!(config.processing.threads, Some(4));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
            [output]
            dpi = 200
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.dpi, 200);
        assert_eq!(config.output.jpeg_quality, 90);
        assert_eq!(config.detect.footer_fraction, 0.15);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let toml_str = r#"
            [detect]
            footer_fractoin = 0.2
        "#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.detect.footer_fraction = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.detect.footer_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.jpeg_quality = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.dpi = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.processing.threads = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let config = Config::default();
        let overrides = CliOverrides {
            footer_fraction: Some(0.25),
            trim_margins: Some(false),
            dpi: Some(300),
            ..CliOverrides::new()
        };
        let merged = config.merge_with_cli(&overrides);
        assert_eq!(merged.detect.footer_fraction, 0.25);
        assert!(!merged.trim.enabled);
        assert_eq!(merged.output.dpi, 300);
        // Untouched values keep their defaults.
        assert_eq!(merged.output.jpeg_quality, 90);
        assert_eq!(merged.trim.background_threshold, 250);
    }

    #[test]
    fn test_load_from_path_missing() {
        let result = Config::load_from_path(Path::new("/nonexistent/adsweep.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_path_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adsweep.toml");
        std::fs::write(&path, "[detect]\nfooter_fraction = 0.3\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.detect.footer_fraction, 0.3);
    }

    #[test]
    fn test_load_from_path_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adsweep.toml");
        std::fs::write(&path, "[output]\njpeg_quality = 150\n").unwrap();

        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_pipeline_config_mapping() {
        let mut config = Config::default();
        config.detect.footer_fraction = 0.2;
        config.trim.enabled = false;

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.footer_fraction, 0.2);
        assert!(!pipeline.trim_margins);
        assert_eq!(pipeline.background_threshold, 250);
    }
}
