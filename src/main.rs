//! Dataset class-distribution checker
//!
//! Reads `trainval_data_list.txt` and `test_data_list.txt` from a data
//! directory, prints per-class sample counts and saves a bar chart per split.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use dataset_distribution::utils::logging::{init_logging, LogConfig};
use dataset_distribution::{
    ChartConfig, DistributionReporter, HeaderPolicy, MalformedPolicy, ReporterConfig,
    DEFAULT_DATA_DIR,
};

/// Analyze and visualize the class distribution of a dataset
///
/// Examples:
///   check_dataset_distributed
///   check_dataset_distributed --data-path custom_data_dir --svg
#[derive(Parser, Debug)]
#[command(name = "check_dataset_distributed")]
#[command(version)]
#[command(about = "Analyzes and visualizes the class distribution of a dataset")]
struct Cli {
    /// Directory containing trainval_data_list.txt and test_data_list.txt [default: data]
    #[arg(long = "data-path", visible_alias = "data_path")]
    data_path: Option<PathBuf>,

    /// Directory for chart files [default: current directory]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Manifest field delimiter (a single character, or "tab" / "space")
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<char>,

    /// Zero-based column holding the image path
    #[arg(long)]
    path_column: Option<usize>,

    /// Zero-based column holding the class label
    #[arg(long)]
    label_column: Option<usize>,

    /// Header handling: auto, present or absent
    #[arg(long)]
    header: Option<HeaderPolicy>,

    /// Fail on malformed manifest lines instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Warn and continue when a manifest file is missing
    #[arg(long)]
    skip_missing: bool,

    /// Also write labelled SVG charts
    #[arg(long)]
    svg: bool,

    /// Do not write any chart files
    #[arg(long, conflicts_with = "svg")]
    no_charts: bool,

    /// Write a JSON summary to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored console and log output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn log_config(&self) -> LogConfig {
        let mut config = if self.verbose {
            LogConfig::verbose()
        } else if self.quiet {
            LogConfig::quiet()
        } else {
            LogConfig::default()
        };
        config.ansi_colors = !self.no_color;
        config
    }

    /// Merge flags over the config file (or defaults)
    fn into_config(self) -> Result<ReporterConfig> {
        let mut config = match &self.config {
            Some(path) => ReporterConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ReporterConfig::new(DEFAULT_DATA_DIR),
        };

        if let Some(dir) = self.data_path {
            config.data_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(delimiter) = self.delimiter {
            config.format.delimiter = delimiter;
        }
        if let Some(col) = self.path_column {
            config.format.path_column = col;
        }
        if let Some(col) = self.label_column {
            config.format.label_column = col;
        }
        if let Some(header) = self.header {
            config.format.header = header;
        }
        if self.strict {
            config.format.on_malformed = MalformedPolicy::Error;
        }
        if self.skip_missing {
            config.skip_missing = true;
        }
        if self.svg {
            config.charts.svg = true;
        }
        if self.no_charts {
            config.charts = ChartConfig::none();
        }
        if self.json.is_some() {
            config.json_output = self.json;
        }

        Ok(config)
    }
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    match s {
        "tab" | "\\t" => Ok('\t'),
        "space" => Ok(' '),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("expected a single character, got '{}'", s)),
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_config = cli.log_config();
    if !log_config.ansi_colors {
        colored::control::set_override(false);
    }
    let _ = init_logging(&log_config);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    debug!("Configuration: {:?}", config);

    println!("{}", "Dataset Class Distribution Check".cyan().bold());
    println!("  Data directory: {}", config.data_dir.display());
    println!("  Chart output:   {}", describe_charts(&config));
    println!();

    let reporter = DistributionReporter::new(config);
    let summary = reporter
        .run()
        .context("Dataset distribution check failed")?;

    let missing = summary.splits.iter().filter(|s| !s.found).count();
    if missing > 0 {
        println!(
            "{} {} split(s) skipped because their manifest was missing",
            "Note:".yellow(),
            missing
        );
    }

    Ok(())
}

fn describe_charts(config: &ReporterConfig) -> String {
    let kinds: Vec<&str> = [("png", config.charts.png), ("svg", config.charts.svg)]
        .iter()
        .filter(|(_, on)| *on)
        .map(|(kind, _)| *kind)
        .collect();

    if kinds.is_empty() {
        "disabled".to_string()
    } else {
        format!("{} in {}", kinds.join(" + "), config.output_dir.display())
    }
}
