//! Serializable summary of an aggregation

use std::cmp::Ordering;

use serde::Serialize;

use nodecompat_semver::{AggregationResult, Bound, Comparator, Version};

/// What `--json` prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub global_min: Option<String>,
    pub global_max: Option<String>,
    pub conflict: bool,
    pub message: String,
    /// The final interval with inclusivity, e.g. `>=14.0.0 <16.0.0`
    pub range: String,
}

impl From<&AggregationResult> for Report {
    fn from(result: &AggregationResult) -> Self {
        Report {
            global_min: result.global_min().map(Version::to_string),
            global_max: result.global_max().map(Version::to_string),
            conflict: result.is_conflict(),
            message: summary_message(result),
            range: result.interval().to_string(),
        }
    }
}

/// One-line human summary of the outcome
pub fn summary_message(result: &AggregationResult) -> String {
    let min = result.global_min();
    let max = result.global_max();

    if result.is_conflict() {
        return match (min, max) {
            (Some(lo), Some(hi)) if Comparator::compare(lo, hi) == Ordering::Greater => format!(
                "Version conflict: calculated min ({}) is greater than max ({}).",
                lo, hi
            ),
            _ => format!(
                "Version conflict: no Node.js version satisfies {}.",
                result.interval()
            ),
        };
    }

    match (result.global_lower(), result.global_upper()) {
        (Bound::Finite { .. }, Bound::Finite { .. }) => {
            format!("Determined Node.js version range: {}", result.interval())
        }
        (Bound::Finite { version, inclusive }, Bound::Unbounded) => {
            if *inclusive {
                format!("Determined minimum Node.js version: {}", version)
            } else {
                format!("Determined minimum Node.js version (exclusive): {}", version)
            }
        }
        (Bound::Unbounded, Bound::Finite { version, inclusive }) => format!(
            "Determined maximum Node.js version ({}): {}",
            if *inclusive { "inclusive" } else { "exclusive" },
            version
        ),
        (Bound::Unbounded, Bound::Unbounded) => "No specific Node.js engine constraints found.".to_string(),
    }
}
