//! Class Distribution
//!
//! Per-class sample counts for one split, accumulated from manifest entries.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::manifest::{ManifestEntry, ManifestFormat, ManifestReader};
use crate::utils::error::Result;

/// Mapping from class label to number of samples, ordered by label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassDistribution {
    counts: BTreeMap<String, usize>,
}

impl ClassDistribution {
    /// Create an empty distribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Count entries, stopping at the first error
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<ManifestEntry>>,
    {
        let mut dist = Self::new();
        for entry in entries {
            dist.add(&entry?.label);
        }
        Ok(dist)
    }

    /// Record one sample of `label`
    pub fn add(&mut self, label: &str) {
        match self.counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(label.to_string(), 1);
            }
        }
    }

    /// Count for a label (0 if absent)
    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Whether the label occurs at least once
    pub fn contains(&self, label: &str) -> bool {
        self.counts.contains_key(label)
    }

    /// (label, count) pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Labels in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Total number of samples
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct classes
    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Largest class size
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Smallest class size
    pub fn min_count(&self) -> usize {
        self.counts.values().copied().min().unwrap_or(0)
    }

    /// Fraction of samples carrying `label`, in [0, 1]
    pub fn share(&self, label: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(label) as f64 / total as f64
    }

    /// Largest over smallest class size; `None` when empty
    pub fn imbalance_ratio(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.max_count() as f64 / self.min_count() as f64)
    }
}

impl<'a> FromIterator<&'a str> for ClassDistribution {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut dist = Self::new();
        for label in iter {
            dist.add(label);
        }
        dist
    }
}

/// Result of counting a single manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitCounts {
    pub distribution: ClassDistribution,
    /// Malformed lines that were skipped
    pub skipped_lines: usize,
}

/// Read a manifest and count its labels
pub fn count_manifest(path: &Path, format: &ManifestFormat) -> Result<SplitCounts> {
    let mut reader = ManifestReader::open(path, format.clone())?;
    let distribution = ClassDistribution::from_entries(reader.by_ref())?;
    let skipped_lines = reader.skipped();

    if skipped_lines > 0 {
        info!("{:?}: skipped {} malformed lines", path, skipped_lines);
    }
    debug!(
        "{:?}: {} samples in {} classes",
        path,
        distribution.total(),
        distribution.num_classes()
    );

    Ok(SplitCounts {
        distribution,
        skipped_lines,
    })
}
