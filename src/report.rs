//! Console Report
//!
//! Text rendering of a split's class distribution and a cross-split comparison.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::dataset::ClassDistribution;
use crate::utils::{format_number, text_bar};

/// Width of the `#` bar for the largest class
pub const TEXT_BAR_WIDTH: usize = 30;

/// Render the per-class breakdown for one split
///
/// ```text
/// --- [TrainVal set] Class Distribution ---
///   cat            :    2 | ##############################
///   dog            :    1 | ###############
///   Total: 3 samples across 2 classes
/// ```
pub fn render_text(split_name: &str, dist: &ClassDistribution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- [{} set] Class Distribution ---", split_name);

    if dist.is_empty() {
        let _ = writeln!(out, "  No data found.");
        return out;
    }

    let max = dist.max_count();
    for (label, count) in dist.iter() {
        let _ = writeln!(
            out,
            "  {:15}: {:4} | {}",
            label,
            count,
            text_bar(count, max, TEXT_BAR_WIDTH)
        );
    }

    let _ = writeln!(
        out,
        "  Total: {} samples across {} classes",
        format_number(dist.total()),
        dist.num_classes()
    );
    out
}

/// Labels that appear in only one of the two splits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitComparison {
    /// In train/val but never in test
    pub missing_from_test: Vec<String>,
    /// In test but never in train/val
    pub missing_from_train: Vec<String>,
}

impl SplitComparison {
    pub fn is_consistent(&self) -> bool {
        self.missing_from_test.is_empty() && self.missing_from_train.is_empty()
    }
}

/// Compare the label sets of the two splits
pub fn compare_splits(train: &ClassDistribution, test: &ClassDistribution) -> SplitComparison {
    SplitComparison {
        missing_from_test: train
            .labels()
            .filter(|l| !test.contains(l))
            .map(str::to_string)
            .collect(),
        missing_from_train: test
            .labels()
            .filter(|l| !train.contains(l))
            .map(str::to_string)
            .collect(),
    }
}

/// Render the comparison, or `None` when both splits share the same labels
pub fn render_comparison(cmp: &SplitComparison) -> Option<String> {
    if cmp.is_consistent() {
        return None;
    }

    let mut out = String::new();
    let _ = writeln!(out, "--- Split Label Check ---");
    if !cmp.missing_from_test.is_empty() {
        let _ = writeln!(
            out,
            "  Classes with no test samples: {}",
            cmp.missing_from_test.join(", ")
        );
    }
    if !cmp.missing_from_train.is_empty() {
        let _ = writeln!(
            out,
            "  Classes with no train/val samples: {}",
            cmp.missing_from_train.join(", ")
        );
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_layout() {
        let dist: ClassDistribution = ["cat", "dog", "cat"].into_iter().collect();
        let text = render_text("TrainVal", &dist);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "--- [TrainVal set] Class Distribution ---");
        assert_eq!(lines[1], format!("  {:15}: {:4} | {}", "cat", 2, "#".repeat(30)));
        assert_eq!(lines[2], format!("  {:15}: {:4} | {}", "dog", 1, "#".repeat(15)));
        assert_eq!(lines[3], "  Total: 3 samples across 2 classes");
    }

    #[test]
    fn test_render_text_empty() {
        let text = render_text("Test", &ClassDistribution::new());
        assert_eq!(
            text,
            "--- [Test set] Class Distribution ---\n  No data found.\n"
        );
    }

    #[test]
    fn test_compare_splits() {
        let train: ClassDistribution = ["a", "b", "c"].into_iter().collect();
        let test: ClassDistribution = ["a", "d"].into_iter().collect();
        let cmp = compare_splits(&train, &test);

        assert_eq!(cmp.missing_from_test, vec!["b", "c"]);
        assert_eq!(cmp.missing_from_train, vec!["d"]);
        assert!(!cmp.is_consistent());

        let rendered = render_comparison(&cmp).unwrap();
        assert!(rendered.contains("no test samples: b, c"));
    }

    #[test]
    fn test_consistent_splits_render_nothing() {
        let train: ClassDistribution = ["a", "b"].into_iter().collect();
        let test: ClassDistribution = ["b", "a", "a"].into_iter().collect();
        assert_eq!(render_comparison(&compare_splits(&train, &test)), None);
    }
}
