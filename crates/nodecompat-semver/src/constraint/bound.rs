//! Bound type for interval edges

use std::cmp::Ordering;
use std::fmt;

use crate::comparator::{Comparator, Side};
use crate::Version;

/// One edge (lower or upper) of an interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    /// No floor on the lower side, no ceiling on the upper side
    Unbounded,
    Finite { version: Version, inclusive: bool },
}

impl Bound {
    /// Create an inclusive bound
    pub fn inclusive(version: Version) -> Self {
        Bound::Finite {
            version,
            inclusive: true,
        }
    }

    /// Create an exclusive bound
    pub fn exclusive(version: Version) -> Self {
        Bound::Finite {
            version,
            inclusive: false,
        }
    }

    /// Get the version, if bounded
    pub fn version(&self) -> Option<&Version> {
        match self {
            Bound::Unbounded => None,
            Bound::Finite { version, .. } => Some(version),
        }
    }

    /// Check if the bound is inclusive. Unbounded edges are never inclusive.
    pub fn is_inclusive(&self) -> bool {
        matches!(self, Bound::Finite { inclusive: true, .. })
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }

    /// Compare this bound to another bound on the same side
    pub fn compare_to(&self, other: &Bound, side: Side) -> Ordering {
        Comparator::compare_bounds(self, other, side)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Unbounded => write!(f, "unbounded"),
            Bound::Finite { version, inclusive } => write!(
                f,
                "{} [{}]",
                version,
                if *inclusive { "inclusive" } else { "exclusive" }
            ),
        }
    }
}
