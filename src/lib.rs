//! # Dataset Distribution
//!
//! Class-distribution checks for image classification datasets described by
//! split manifests (`trainval_data_list.txt`, `test_data_list.txt`).
//!
//! ## Modules
//!
//! - `dataset`: Split layout, manifest parsing and per-class counting
//! - `report`: Console report and cross-split label check
//! - `reporter`: End-to-end run over a data directory
//! - `config`: Run configuration (CLI or JSON)
//! - `utils`: Errors, logging and chart output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dataset_distribution::{DistributionReporter, ReporterConfig, Split};
//!
//! let summary = DistributionReporter::new(ReporterConfig::new("data")).run()?;
//! let train = summary.get(Split::TrainVal).unwrap();
//! println!("{} train/val samples", train.distribution.total());
//! # Ok::<(), dataset_distribution::DistributionError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod report;
pub mod reporter;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::{ChartConfig, ReporterConfig, DEFAULT_DATA_DIR};
pub use dataset::{
    count_manifest, ClassDistribution, HeaderPolicy, MalformedPolicy, ManifestEntry,
    ManifestFormat, ManifestReader, Split, SplitCounts,
};
pub use report::{compare_splits, render_text, SplitComparison};
pub use reporter::{DistributionReporter, DistributionSummary, SplitReport};
pub use utils::error::{DistributionError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
