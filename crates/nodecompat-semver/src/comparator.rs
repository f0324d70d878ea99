//! Version comparison utilities

use std::cmp::Ordering;

use crate::constraint::Bound;
use crate::Component;
use crate::Version;

/// Which edge of an interval a bound sits on.
///
/// An unbounded lower edge is below every version, an unbounded upper edge is
/// above every version, so bounds can only be ordered relative to a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Lower,
    Upper,
}

static ZERO: Component = Component::Numeric(0);

/// Comparator for versions and interval bounds
pub struct Comparator;

impl Comparator {
    /// Total order over versions.
    ///
    /// Components are compared pairwise with missing ones read as zero. A text
    /// component sorts below a numeric one and two text components tie. When
    /// all components tie, a pre-release sorts below a release and two
    /// pre-release tags compare lexically.
    pub fn compare(a: &Version, b: &Version) -> Ordering {
        let len = std::cmp::max(a.components().len(), b.components().len());
        for i in 0..len {
            let ca = a.components().get(i).unwrap_or(&ZERO);
            let cb = b.components().get(i).unwrap_or(&ZERO);
            let ord = match (ca, cb) {
                (Component::Numeric(x), Component::Numeric(y)) => x.cmp(y),
                (Component::Text(_), Component::Numeric(_)) => Ordering::Less,
                (Component::Numeric(_), Component::Text(_)) => Ordering::Greater,
                (Component::Text(_), Component::Text(_)) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }

        match (a.pre_release(), b.pre_release()) {
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(y),
            (None, None) => Ordering::Equal,
        }
    }

    /// Compare two arbitrary version strings, parsed leniently
    pub fn compare_str(a: &str, b: &str) -> Ordering {
        Self::compare(&Version::parse_lenient(a), &Version::parse_lenient(b))
    }

    /// Check if version1 > version2
    pub fn greater_than(version1: &str, version2: &str) -> bool {
        Self::compare_str(version1, version2) == Ordering::Greater
    }

    /// Check if version1 >= version2
    pub fn greater_than_or_equal_to(version1: &str, version2: &str) -> bool {
        Self::compare_str(version1, version2) != Ordering::Less
    }

    /// Check if version1 < version2
    pub fn less_than(version1: &str, version2: &str) -> bool {
        Self::compare_str(version1, version2) == Ordering::Less
    }

    /// Check if version1 <= version2
    pub fn less_than_or_equal_to(version1: &str, version2: &str) -> bool {
        Self::compare_str(version1, version2) != Ordering::Greater
    }

    /// Check if version1 == version2
    pub fn equal_to(version1: &str, version2: &str) -> bool {
        Self::compare_str(version1, version2) == Ordering::Equal
    }

    /// Order two bounds sitting on the same side.
    ///
    /// At equal versions an exclusive lower bound is tighter (greater) than an
    /// inclusive one, and an exclusive upper bound is tighter (less).
    pub fn compare_bounds(a: &Bound, b: &Bound, side: Side) -> Ordering {
        match (a, b) {
            (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
            (Bound::Unbounded, _) => match side {
                Side::Lower => Ordering::Less,
                Side::Upper => Ordering::Greater,
            },
            (_, Bound::Unbounded) => match side {
                Side::Lower => Ordering::Greater,
                Side::Upper => Ordering::Less,
            },
            (
                Bound::Finite { version: va, inclusive: ia },
                Bound::Finite { version: vb, inclusive: ib },
            ) => match Self::compare(va, vb) {
                Ordering::Equal => match (*ia, *ib, side) {
                    (true, false, Side::Lower) | (false, true, Side::Upper) => Ordering::Less,
                    (false, true, Side::Lower) | (true, false, Side::Upper) => Ordering::Greater,
                    _ => Ordering::Equal,
                },
                other => other,
            },
        }
    }

    /// The lesser of two bounds on the given side
    pub fn min_bound(a: Bound, b: Bound, side: Side) -> Bound {
        if a.compare_to(&b, side) == Ordering::Greater {
            b
        } else {
            a
        }
    }

    /// The greater of two bounds on the given side
    pub fn max_bound(a: Bound, b: Bound, side: Side) -> Bound {
        if a.compare_to(&b, side) == Ordering::Less {
            b
        } else {
            a
        }
    }
}
