//! Distribution Reporter
//!
//! Runs the full check for a data directory: count each split's manifest,
//! print the breakdown, write charts and an optional JSON summary.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ReporterConfig;
use crate::dataset::{count_manifest, ClassDistribution, Split};
use crate::report::{compare_splits, render_comparison, render_text, SplitComparison};
use crate::utils::charts::{render_png, render_svg};
use crate::utils::error::{DistributionError, Result};

/// Outcome for one split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    pub split: Split,
    /// Manifest that was read
    pub manifest: PathBuf,
    /// False when the manifest was missing and skipped
    pub found: bool,
    pub distribution: ClassDistribution,
    /// Malformed lines skipped while reading
    pub skipped_lines: usize,
    /// Chart files written for this split
    pub charts: Vec<PathBuf>,
}

impl SplitReport {
    fn missing(split: Split, manifest: PathBuf) -> Self {
        Self {
            split,
            manifest,
            found: false,
            distribution: ClassDistribution::new(),
            skipped_lines: 0,
            charts: Vec::new(),
        }
    }
}

/// Results of a complete run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub data_dir: PathBuf,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub splits: Vec<SplitReport>,
    /// Present when both splits were read
    pub comparison: Option<SplitComparison>,
}

impl DistributionSummary {
    /// Report for a given split
    pub fn get(&self, split: Split) -> Option<&SplitReport> {
        self.splits.iter().find(|r| r.split == split)
    }

    /// Save summary to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a summary from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Class-distribution checker for a data directory
#[derive(Debug, Clone)]
pub struct DistributionReporter {
    config: ReporterConfig,
}

impl DistributionReporter {
    pub fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    /// Run the check, printing the report to stdout
    pub fn run(&self) -> Result<DistributionSummary> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out)
    }

    /// Run the check, writing the report to `out`
    pub fn run_with_output<W: Write>(&self, out: &mut W) -> Result<DistributionSummary> {
        self.config.validate()?;

        let data_dir = &self.config.data_dir;
        if !data_dir.is_dir() {
            return Err(DistributionError::DataDirNotFound(data_dir.clone()));
        }

        // Fail before printing anything if a manifest is missing
        if !self.config.skip_missing {
            for split in Split::ALL {
                let path = split.manifest_path(data_dir);
                if !path.is_file() {
                    return Err(DistributionError::ManifestNotFound(path));
                }
            }
        }

        let shown_dir = data_dir
            .canonicalize()
            .unwrap_or_else(|_| data_dir.clone());
        info!("Starting dataset analysis in {:?}", shown_dir);
        writeln!(out, "Starting dataset analysis in: {}\n", shown_dir.display())?;

        let mut splits = Vec::with_capacity(Split::ALL.len());
        for split in Split::ALL {
            splits.push(self.check_split(split, out)?);
        }

        let comparison = match (&splits[0], &splits[1]) {
            (train, test) if train.found && test.found => {
                let cmp = compare_splits(&train.distribution, &test.distribution);
                if !cmp.missing_from_test.is_empty() {
                    warn!(
                        "{} classes have no test samples: {:?}",
                        cmp.missing_from_test.len(),
                        cmp.missing_from_test
                    );
                }
                if let Some(text) = render_comparison(&cmp) {
                    writeln!(out, "{}", text)?;
                }
                Some(cmp)
            }
            _ => None,
        };

        let summary = DistributionSummary {
            data_dir: data_dir.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            splits,
            comparison,
        };

        if let Some(path) = &self.config.json_output {
            summary.save(path)?;
            info!("Wrote summary {:?}", path);
            writeln!(out, "--> Saved summary to '{}'\n", path.display())?;
        }

        writeln!(out, "--- Analysis complete. ---")?;
        Ok(summary)
    }

    fn check_split<W: Write>(&self, split: Split, out: &mut W) -> Result<SplitReport> {
        let manifest = split.manifest_path(&self.config.data_dir);

        if !manifest.is_file() {
            // Only reachable with skip_missing; otherwise checked up front
            warn!("Manifest {:?} not found, skipping {} split", manifest, split);
            writeln!(
                out,
                "--> Warning: Data list file not found at '{}'. Skipping '{}' set.\n",
                manifest.display(),
                split
            )?;
            return Ok(SplitReport::missing(split, manifest));
        }

        let counts = count_manifest(&manifest, &self.config.format)?;
        let dist = counts.distribution;

        write!(out, "{}", render_text(&split.to_string(), &dist))?;
        if counts.skipped_lines > 0 {
            writeln!(out, "  ({} malformed lines skipped)", counts.skipped_lines)?;
        }
        writeln!(out)?;

        let charts = if dist.is_empty() {
            Vec::new()
        } else {
            self.write_charts(split, &dist, out)?
        };

        Ok(SplitReport {
            split,
            manifest,
            found: true,
            distribution: dist,
            skipped_lines: counts.skipped_lines,
            charts,
        })
    }

    fn write_charts<W: Write>(
        &self,
        split: Split,
        dist: &ClassDistribution,
        out: &mut W,
    ) -> Result<Vec<PathBuf>> {
        let charts = self.config.charts;
        let stem = self.config.output_dir.join(split.chart_stem());
        let title = format!("'{}' Set - Sample Distribution per Class", split);
        let mut written = Vec::new();

        if charts.png {
            let path = stem.with_extension("png");
            render_png(&title, dist, &path)?;
            written.push(path);
        }
        if charts.svg {
            let path = stem.with_extension("svg");
            render_svg(&title, dist, &path)?;
            written.push(path);
        }

        for path in &written {
            info!("Saved {} chart {:?}", split, path);
            writeln!(out, "--> Saved bar chart to '{}'\n", path.display())?;
        }
        Ok(written)
    }
}
