//! Pipeline configuration management.
//!
//! Loads [`PipelineConfig`] from a TOML file, applies `XSEC_*` environment
//! overrides and validates the result. Every field has a default, so an
//! empty file (or no file at all) yields a working configuration.
//!
//! ```toml
//! log_level = "info"
//!
//! [archive]
//! path = "outfiles/diffxsections"
//!
//! [grid]
//! x_bins = 1695
//! x_min = 0.5
//! x_max = 170.0
//!
//! [flux]
//! normalization = "weight-integral"
//!
//! [sampling]
//! events = 100
//! seed = 42
//! ```

#![deny(missing_docs)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use xsec_core::grid::UniformAxis;
use xsec_core::math::{GridBuilderOptions, Normalization, WeightingOptions};
use xsec_core::types::GridError;

/// Configuration file read when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "xsec.toml";

/// Archive location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSection {
    /// Archive directory
    #[serde(default = "default_archive_path")]
    pub path: PathBuf,
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("outfiles/diffxsections")
}

impl Default for ArchiveSection {
    fn default() -> Self {
        Self {
            path: default_archive_path(),
        }
    }
}

/// Variable-grid construction domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderSection {
    /// Lower x edge of every slice
    #[serde(default)]
    pub x_origin: f64,
    /// Margin added above the largest observed x
    #[serde(default = "default_x_margin")]
    pub x_margin: f64,
    /// Outer y edges at `±y_limit`
    #[serde(default = "default_y_limit")]
    pub y_limit: f64,
}

fn default_x_margin() -> f64 {
    0.001
}

fn default_y_limit() -> f64 {
    1.01
}

impl Default for BuilderSection {
    fn default() -> Self {
        Self {
            x_origin: 0.0,
            x_margin: default_x_margin(),
            y_limit: default_y_limit(),
        }
    }
}

impl BuilderSection {
    /// Kernel options.
    pub fn options(&self) -> GridBuilderOptions {
        GridBuilderOptions {
            x_origin: self.x_origin,
            x_margin: self.x_margin,
            y_limit: self.y_limit,
        }
    }
}

/// Uniform grid every surface is resampled onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSection {
    /// Number of x (electron energy) bins
    #[serde(default = "default_x_bins")]
    pub x_bins: usize,
    /// Lower x edge
    #[serde(default = "default_x_min")]
    pub x_min: f64,
    /// Upper x edge
    #[serde(default = "default_x_max")]
    pub x_max: f64,
    /// Number of y (cosine) bins
    #[serde(default = "default_y_bins")]
    pub y_bins: usize,
    /// Lower y edge
    #[serde(default = "default_y_min")]
    pub y_min: f64,
    /// Upper y edge
    #[serde(default = "default_y_limit")]
    pub y_max: f64,
}

fn default_x_bins() -> usize {
    1695
}

fn default_x_min() -> f64 {
    0.5
}

fn default_x_max() -> f64 {
    170.0
}

fn default_y_bins() -> usize {
    100
}

fn default_y_min() -> f64 {
    -1.01
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            x_bins: default_x_bins(),
            x_min: default_x_min(),
            x_max: default_x_max(),
            y_bins: default_y_bins(),
            y_min: default_y_min(),
            y_max: default_y_limit(),
        }
    }
}

impl GridSection {
    /// The x and y axes.
    pub fn axes(&self) -> Result<(UniformAxis, UniformAxis), GridError> {
        Ok((
            UniformAxis::new(self.x_bins, self.x_min, self.x_max)?,
            UniformAxis::new(self.y_bins, self.y_min, self.y_max)?,
        ))
    }
}

/// Flux-weighting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxSection {
    /// First incident energy sampled
    #[serde(default = "default_param_start")]
    pub param_start: f64,
    /// Step between sampled energies
    #[serde(default = "default_step")]
    pub spacing: f64,
    /// Bin width of the generated flux spectrum
    #[serde(default = "default_step")]
    pub bin_width: f64,
    /// Subtracted from the maximum neutrino energy to bound the electron
    /// energy axis (deuteron break-up threshold)
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Normalisation of the weighted sum
    #[serde(default)]
    pub normalization: Normalization,
    /// Archive name of the flux spectrum
    #[serde(default = "default_spectrum_name")]
    pub spectrum_name: String,
    /// Archive name of the weighted surface
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

fn default_param_start() -> f64 {
    1.5
}

fn default_step() -> f64 {
    0.1
}

fn default_threshold() -> f64 {
    1.44
}

fn default_spectrum_name() -> String {
    "SNSflux".to_string()
}

fn default_output_name() -> String {
    "fluxW".to_string()
}

impl Default for FluxSection {
    fn default() -> Self {
        Self {
            param_start: default_param_start(),
            spacing: default_step(),
            bin_width: default_step(),
            threshold: default_threshold(),
            normalization: Normalization::default(),
            spectrum_name: default_spectrum_name(),
            output_name: default_output_name(),
        }
    }
}

impl FluxSection {
    /// Kernel options.
    pub fn weighting_options(&self) -> WeightingOptions {
        WeightingOptions {
            param_start: self.param_start,
            spacing: self.spacing,
            threshold: Some(self.threshold),
            normalization: self.normalization,
        }
    }
}

/// Event sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSection {
    /// Default number of events
    #[serde(default = "default_events")]
    pub events: usize,
    /// Event file
    #[serde(default = "default_events_output")]
    pub output: PathBuf,
    /// Archive name of the surface sampled
    #[serde(default = "default_output_name")]
    pub source: String,
    /// Fixed seed; drawn from the OS when absent
    pub seed: Option<u64>,
}

fn default_events() -> usize {
    100
}

fn default_events_output() -> PathBuf {
    PathBuf::from("outfiles/rndmEvents.txt")
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            events: default_events(),
            output: default_events_output(),
            source: default_output_name(),
            seed: None,
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Archive location
    #[serde(default)]
    pub archive: ArchiveSection,

    /// Variable-grid construction
    #[serde(default)]
    pub builder: BuilderSection,

    /// Resampling grid
    #[serde(default)]
    pub grid: GridSection,

    /// Flux weighting
    #[serde(default)]
    pub flux: FluxSection,

    /// Event sampling
    #[serde(default)]
    pub sampling: SamplingSection,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            archive: ArchiveSection::default(),
            builder: BuilderSection::default(),
            grid: GridSection::default(),
            flux: FluxSection::default(),
            sampling: SamplingSection::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.log_level.is_empty() {
            config.log_level = default_log_level();
        }
        Ok(config)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides.
    ///
    /// - `XSEC_ARCHIVE`: archive path
    /// - `XSEC_LOG_LEVEL`: log level
    /// - `XSEC_SEED`: sampling seed (ignored unless it parses)
    /// - `XSEC_EVENTS_OUTPUT`: event file
    pub fn with_env_override(mut self) -> Self {
        if let Ok(path) = std::env::var("XSEC_ARCHIVE") {
            self.archive.path = PathBuf::from(path);
        }

        if let Ok(log_level) = std::env::var("XSEC_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Ok(seed) = std::env::var("XSEC_SEED") {
            if let Ok(seed) = seed.parse() {
                self.sampling.seed = Some(seed);
            }
        }

        if let Ok(output) = std::env::var("XSEC_EVENTS_OUTPUT") {
            self.sampling.output = PathBuf::from(output);
        }

        self
    }

    /// Validate the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if self.archive.path.as_os_str().is_empty() {
            errors.push("archive.path cannot be empty".to_string());
        }

        if let Err(e) = self.builder.options().validate() {
            errors.push(format!("builder: {}", e));
        }

        if let Err(e) = self.grid.axes() {
            errors.push(format!("grid: {}", e));
        }

        if let Err(e) = self.flux.weighting_options().validate() {
            errors.push(format!("flux: {}", e));
        }
        if !(self.flux.bin_width.is_finite() && self.flux.bin_width > 0.0) {
            errors.push(format!("flux.bin_width {} must be positive", self.flux.bin_width));
        }
        if self.flux.spectrum_name.is_empty() || self.flux.output_name.is_empty() {
            errors.push("flux.spectrum_name and flux.output_name cannot be empty".to_string());
        }

        if self.sampling.output.as_os_str().is_empty() {
            errors.push("sampling.output cannot be empty".to_string());
        }
        if self.sampling.source.is_empty() {
            errors.push("sampling.source cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load `path` (or the defaults), apply environment overrides and validate.
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }
}

/// Configuration error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in the config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation errors
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.grid.x_bins, 1695);
        assert_eq!(config.flux.spectrum_name, "SNSflux");
        assert_eq!(config.sampling.events, 100);
        assert_eq!(config.sampling.seed, None);
        assert_eq!(config.flux.normalization, Normalization::WeightIntegral);
    }

    #[test]
    fn test_default_config_validates() {
        assert_eq!(PipelineConfig::default().log_level, "info");
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_loads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            PipelineConfig::load_with_env_and_validate(&dir.path().join("xsec.toml")).unwrap();
        assert_eq!(config.grid, GridSection::default());
        assert_eq!(config.flux.output_name, "fluxW");
    }

    #[test]
    fn test_empty_toml_equals_default() {
        assert_eq!(PipelineConfig::from_toml("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            log_level = "debug"

            [flux]
            normalization = "domain-max"
            threshold = 2.0

            [sampling]
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.flux.normalization, Normalization::DomainMax);
        assert_eq!(config.flux.threshold, 2.0);
        assert_eq!(config.flux.spacing, 0.1);
        assert_eq!(config.sampling.seed, Some(7));
        assert_eq!(config.grid, GridSection::default());
    }

    #[test]
    fn test_unknown_normalization_rejected() {
        let err = PipelineConfig::from_toml("[flux]\nnormalization = \"mean\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[grid]\nx_bins = 10\nx_min = 0.0\nx_max = 1.0").unwrap();
        let config = PipelineConfig::load(file.path()).unwrap();
        let (x, _) = config.grid.axes().unwrap();
        assert_eq!(x.n_bins(), 10);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(matches!(
            PipelineConfig::load(&dir.path().join("absent.toml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("XSEC_SEED", "1234");
        std::env::set_var("XSEC_EVENTS_OUTPUT", "events.tsv");
        let config = PipelineConfig::default().with_env_override();
        assert_eq!(config.sampling.seed, Some(1234));
        assert_eq!(config.sampling.output, PathBuf::from("events.tsv"));
        std::env::remove_var("XSEC_SEED");
        std::env::remove_var("XSEC_EVENTS_OUTPUT");
    }

    #[test]
    fn test_validate_collects_errors() {
        let mut config = PipelineConfig::default();
        config.log_level = "loud".to_string();
        config.grid.x_bins = 0;
        config.flux.spacing = -0.1;
        config.sampling.source = String::new();

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 4);
                assert!(errors.iter().any(|e| e.contains("log_level")));
                assert!(errors.iter().any(|e| e.starts_with("grid")));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_grid_rejected() {
        let mut config = PipelineConfig::default();
        config.grid.x_min = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::Validation(vec!["Error 1".to_string(), "Error 2".to_string()]);
        assert_eq!(error.to_string(), "Validation errors: Error 1; Error 2");
    }
}
