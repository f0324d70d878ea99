//! Interval - a contiguous range of versions between two bounds

use std::cmp::Ordering;
use std::fmt;

use super::Bound;
use crate::comparator::{Comparator, Side};
use crate::Version;

/// All versions above `lower` and below `upper`, honouring inclusivity.
///
/// An interval may be empty (lower above upper, or equal with an exclusive
/// side). Empty intervals are kept as they are, they are never widened to
/// unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    lower: Bound,
    upper: Bound,
}

impl Interval {
    pub fn new(lower: Bound, upper: Bound) -> Self {
        Interval { lower, upper }
    }

    /// The interval admitting every version
    pub fn unbounded() -> Self {
        Interval::new(Bound::Unbounded, Bound::Unbounded)
    }

    /// The interval admitting exactly one version
    pub fn exact(version: Version) -> Self {
        Interval::new(Bound::inclusive(version.clone()), Bound::inclusive(version))
    }

    pub fn lower(&self) -> &Bound {
        &self.lower
    }

    pub fn upper(&self) -> &Bound {
        &self.upper
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_unbounded() && self.upper.is_unbounded()
    }

    /// Check if no version satisfies this interval
    pub fn is_empty(&self) -> bool {
        match (self.lower.version(), self.upper.version()) {
            (Some(lower), Some(upper)) => match Comparator::compare(lower, upper) {
                Ordering::Greater => true,
                Ordering::Equal => !(self.lower.is_inclusive() && self.upper.is_inclusive()),
                Ordering::Less => false,
            },
            _ => false,
        }
    }

    /// Versions admitted by both intervals (AND). The result may be empty.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval {
            lower: Comparator::max_bound(self.lower.clone(), other.lower.clone(), Side::Lower),
            upper: Comparator::min_bound(self.upper.clone(), other.upper.clone(), Side::Upper),
        }
    }

    /// Smallest single interval covering both operands (OR).
    ///
    /// Empty operands contribute nothing. A gap between two disjoint operands
    /// is covered by the result.
    pub fn union(&self, other: &Interval) -> Interval {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        Interval {
            lower: Comparator::min_bound(self.lower.clone(), other.lower.clone(), Side::Lower),
            upper: Comparator::max_bound(self.upper.clone(), other.upper.clone(), Side::Upper),
        }
    }

    /// Check if a concrete version lies inside this interval
    pub fn contains(&self, version: &Version) -> bool {
        let above_lower = match &self.lower {
            Bound::Unbounded => true,
            Bound::Finite { version: lower, inclusive } => match Comparator::compare(version, lower) {
                Ordering::Greater => true,
                Ordering::Equal => *inclusive,
                Ordering::Less => false,
            },
        };
        let below_upper = match &self.upper {
            Bound::Unbounded => true,
            Bound::Finite { version: upper, inclusive } => match Comparator::compare(version, upper) {
                Ordering::Less => true,
                Ordering::Equal => *inclusive,
                Ordering::Greater => false,
            },
        };
        above_lower && below_upper
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.lower, &self.upper) {
            (Bound::Unbounded, Bound::Unbounded) => write!(f, "*"),
            (
                Bound::Finite { version: lo, inclusive: true },
                Bound::Finite { version: hi, inclusive: true },
            ) if lo == hi => write!(f, "{}", lo),
            (lower, upper) => {
                let mut parts = Vec::with_capacity(2);
                if let Bound::Finite { version, inclusive } = lower {
                    parts.push(format!("{}{}", if *inclusive { ">=" } else { ">" }, version));
                }
                if let Bound::Finite { version, inclusive } = upper {
                    parts.push(format!("{}{}", if *inclusive { "<=" } else { "<" }, version));
                }
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}
