//! Utilities module for errors, logging, chart output and formatting helpers
//!
//! This module provides:
//! - Error handling types
//! - Structured logging with tracing
//! - PNG and SVG bar charts for class distributions
//! - Small text formatting helpers shared by the report

pub mod charts;
pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{DistributionError, Result};
pub use logging::init_logging;

/// Format a number with thousands separator
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Text bar of `#` characters scaled so that `max` maps to `width` characters.
///
/// Lengths are truncated, so a count that is a small fraction of `max` may
/// render as an empty bar.
pub fn text_bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count as f64 / max as f64 * width as f64) as usize;
    "#".repeat(len.min(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1000000), "1,000,000");
        assert_eq!(format_number(42), "42");
    }

    #[test]
    fn test_text_bar_scaling() {
        assert_eq!(text_bar(10, 10, 30).len(), 30);
        assert_eq!(text_bar(5, 10, 30).len(), 15);
        assert_eq!(text_bar(1, 100, 30), "");
    }

    #[test]
    fn test_text_bar_zero_max() {
        assert_eq!(text_bar(0, 0, 30), "");
    }
}
