//! Reporter Configuration
//!
//! Settings for a distribution check run. Can be built from CLI flags or loaded
//! from a JSON file; missing JSON fields take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::ManifestFormat;
use crate::utils::error::{DistributionError, Result};

/// Default data directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Which chart files to write per split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub png: bool,
    pub svg: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            png: true,
            svg: false,
        }
    }
}

impl ChartConfig {
    pub fn none() -> Self {
        Self {
            png: false,
            svg: false,
        }
    }

    pub fn any(&self) -> bool {
        self.png || self.svg
    }
}

/// Configuration for [`crate::DistributionReporter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Directory holding the split manifests
    pub data_dir: PathBuf,
    /// Where chart files are written
    pub output_dir: PathBuf,
    /// Manifest column layout
    pub format: ManifestFormat,
    /// Chart outputs
    pub charts: ChartConfig,
    /// Warn and continue instead of failing when a manifest is missing
    pub skip_missing: bool,
    /// Optional JSON summary path
    pub json_output: Option<PathBuf>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from("."),
            format: ManifestFormat::default(),
            charts: ChartConfig::default(),
            skip_missing: false,
            json_output: None,
        }
    }
}

impl ReporterConfig {
    /// Create a configuration for a data directory with default settings
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_format(mut self, format: ManifestFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_charts(mut self, charts: ChartConfig) -> Self {
        self.charts = charts;
        self
    }

    /// Check the configuration before touching the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(DistributionError::Config(
                "data directory must not be empty".to_string(),
            ));
        }
        self.format.validate()
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DistributionError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
