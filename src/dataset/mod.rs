//! Dataset module for manifest handling
//!
//! This module provides:
//! - The split layout of a data directory (which manifest belongs to which split)
//! - A configurable, lazy manifest parser
//! - Per-class sample counting
//!
//! ## Data directory layout
//!
//! ```text
//! data/
//! ├── images/...
//! ├── trainval_data_list.txt
//! └── test_data_list.txt
//! ```

pub mod distribution;
pub mod manifest;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export main types for convenience
pub use distribution::{count_manifest, ClassDistribution, SplitCounts};
pub use manifest::{
    is_header_line, parse_line, HeaderPolicy, MalformedPolicy, ManifestEntry, ManifestFormat,
    ManifestReader,
};

/// Manifest for the combined train + validation split
pub const TRAINVAL_LIST: &str = "trainval_data_list.txt";

/// Manifest for the test split
pub const TEST_LIST: &str = "test_data_list.txt";

/// A dataset split with its own manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Split {
    TrainVal,
    Test,
}

impl Split {
    /// All splits, in reporting order
    pub const ALL: [Split; 2] = [Split::TrainVal, Split::Test];

    /// Manifest file name inside the data directory
    pub fn manifest_name(&self) -> &'static str {
        match self {
            Split::TrainVal => TRAINVAL_LIST,
            Split::Test => TEST_LIST,
        }
    }

    /// Manifest path for a given data directory
    pub fn manifest_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.manifest_name())
    }

    /// Chart file stem (`train_distribution`, `test_distribution`)
    pub fn chart_stem(&self) -> &'static str {
        match self {
            Split::TrainVal => "train_distribution",
            Split::Test => "test_distribution",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::TrainVal => write!(f, "TrainVal"),
            Split::Test => write!(f, "Test"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_paths() {
        let dir = Path::new("data");
        assert_eq!(
            Split::TrainVal.manifest_path(dir),
            PathBuf::from("data/trainval_data_list.txt")
        );
        assert_eq!(
            Split::Test.manifest_path(dir),
            PathBuf::from("data/test_data_list.txt")
        );
    }

    #[test]
    fn test_chart_stems() {
        assert_eq!(Split::TrainVal.chart_stem(), "train_distribution");
        assert_eq!(Split::Test.chart_stem(), "test_distribution");
    }

    #[test]
    fn test_display() {
        assert_eq!(Split::TrainVal.to_string(), "TrainVal");
        assert_eq!(Split::Test.to_string(), "Test");
    }
}
