//! Manifest Parser
//!
//! Reads split manifests (one `path<delim>label` entry per line) lazily.
//! The column layout is configurable through [`ManifestFormat`]; the defaults
//! match the lists shipped with the dataset:
//!
//! ```text
//! file_path,class_name
//! images/0001.png,class_a
//! images/0002.png,class_b
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::error::{DistributionError, Result};

/// Prefixes that mark the first line as a column header
const HEADER_PREFIXES: [&str; 2] = ["file_path", "file_name"];

const UTF8_BOM: char = '\u{feff}';

/// How to treat the first non-blank line of a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Skip it only if it looks like a header (`file_path...` / `file_name...`)
    #[default]
    Auto,
    /// Always skip it
    Present,
    /// Never skip it
    Absent,
}

impl FromStr for HeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(HeaderPolicy::Auto),
            "present" | "yes" => Ok(HeaderPolicy::Present),
            "absent" | "no" => Ok(HeaderPolicy::Absent),
            other => Err(format!(
                "unknown header policy '{}' (expected auto, present or absent)",
                other
            )),
        }
    }
}

impl fmt::Display for HeaderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderPolicy::Auto => write!(f, "auto"),
            HeaderPolicy::Present => write!(f, "present"),
            HeaderPolicy::Absent => write!(f, "absent"),
        }
    }
}

/// What to do with a line that does not yield a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log and skip the line
    #[default]
    Skip,
    /// Stop with [`DistributionError::MalformedLine`]
    Error,
}

/// Column layout of a manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestFormat {
    /// Field separator. Whitespace delimiters split on runs of whitespace.
    pub delimiter: char,
    /// Zero-based column holding the image path
    pub path_column: usize,
    /// Zero-based column holding the class label
    pub label_column: usize,
    /// Header handling
    pub header: HeaderPolicy,
    /// Malformed line handling
    pub on_malformed: MalformedPolicy,
}

impl Default for ManifestFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            path_column: 0,
            label_column: 1,
            header: HeaderPolicy::Auto,
            on_malformed: MalformedPolicy::Skip,
        }
    }
}

impl ManifestFormat {
    /// Check the settings are usable before reading anything
    pub fn validate(&self) -> Result<()> {
        if self.path_column == self.label_column {
            return Err(DistributionError::InvalidFormat(format!(
                "path and label share column {}",
                self.path_column
            )));
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(DistributionError::InvalidFormat(
                "delimiter cannot be a line break".to_string(),
            ));
        }
        Ok(())
    }

    /// Fewest fields a data line needs
    pub fn min_fields(&self) -> usize {
        self.path_column.max(self.label_column) + 1
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        if self.delimiter.is_whitespace() {
            line.split_whitespace().collect()
        } else {
            line.split(self.delimiter).map(str::trim).collect()
        }
    }
}

/// One (image path, class label) pair from a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Image path as written in the manifest
    pub path: PathBuf,
    /// Class label
    pub label: String,
    /// 1-based line number in the manifest
    pub line: usize,
}

/// Whether a line is a column header
pub fn is_header_line(line: &str) -> bool {
    let line = line.trim_start_matches(UTF8_BOM).trim();
    HEADER_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Parse a single data line. Returns `None` if the line has too few fields or
/// an empty label.
pub fn parse_line(line: &str, line_no: usize, format: &ManifestFormat) -> Option<ManifestEntry> {
    let fields = format.split(line);
    if fields.len() < format.min_fields() {
        return None;
    }

    let label = fields[format.label_column];
    if label.is_empty() {
        return None;
    }

    Some(ManifestEntry {
        path: PathBuf::from(fields[format.path_column]),
        label: label.to_string(),
        line: line_no,
    })
}

/// Lazy reader over the entries of one manifest
pub struct ManifestReader<R: BufRead> {
    lines: Lines<R>,
    path: PathBuf,
    format: ManifestFormat,
    line_no: usize,
    seen_first: bool,
    skipped: usize,
}

impl ManifestReader<BufReader<File>> {
    /// Open a manifest file
    pub fn open<P: AsRef<Path>>(path: P, format: ManifestFormat) -> Result<Self> {
        let path = path.as_ref();
        format.validate()?;

        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DistributionError::ManifestNotFound(path.to_path_buf()),
            _ => DistributionError::Io(e),
        })?;

        debug!("Opened manifest {:?}", path);
        Ok(Self::from_reader(BufReader::new(file), path, format))
    }
}

impl<R: BufRead> ManifestReader<R> {
    /// Wrap any buffered reader; `path` is only used in error messages
    pub fn from_reader<P: AsRef<Path>>(reader: R, path: P, format: ManifestFormat) -> Self {
        Self {
            lines: reader.lines(),
            path: path.as_ref().to_path_buf(),
            format,
            line_no: 0,
            seen_first: false,
            skipped: 0,
        }
    }

    /// Malformed lines skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn skip_as_header(&mut self, line: &str) -> bool {
        if self.seen_first {
            return false;
        }
        self.seen_first = true;

        match self.format.header {
            HeaderPolicy::Present => true,
            HeaderPolicy::Auto => is_header_line(line),
            HeaderPolicy::Absent => false,
        }
    }
}

impl<R: BufRead> Iterator for ManifestReader<R> {
    type Item = Result<ManifestEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.lines.next()? {
                Ok(raw) => raw,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            let line = if self.line_no == 1 {
                raw.trim_start_matches(UTF8_BOM)
            } else {
                raw.as_str()
            };
            if line.trim().is_empty() {
                continue;
            }
            if self.skip_as_header(line) {
                debug!("Skipping header line in {:?}: {}", self.path, line.trim());
                continue;
            }

            if let Some(entry) = parse_line(line, self.line_no, &self.format) {
                return Some(Ok(entry));
            }

            match self.format.on_malformed {
                MalformedPolicy::Skip => {
                    self.skipped += 1;
                    debug!(
                        "Skipping malformed line {} in {:?}: {:?}",
                        self.line_no, self.path, line
                    );
                }
                MalformedPolicy::Error => {
                    return Some(Err(DistributionError::MalformedLine {
                        path: self.path.clone(),
                        line: self.line_no,
                        content: line.to_string(),
                    }));
                }
            }
        }
    }
}
