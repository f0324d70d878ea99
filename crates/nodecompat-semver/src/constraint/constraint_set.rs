//! ConstraintSet - the OR-separated AND-groups of one range expression

use std::fmt;

use super::Interval;

/// One interval per `||` alternative of a range expression.
///
/// Each group is the intersection of the atoms inside that alternative and
/// may itself be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    groups: Vec<Interval>,
}

impl ConstraintSet {
    pub fn new(groups: Vec<Interval>) -> Self {
        ConstraintSet { groups }
    }

    /// The set that constrains nothing
    pub fn unbounded() -> Self {
        ConstraintSet::new(vec![Interval::unbounded()])
    }

    pub fn groups(&self) -> &[Interval] {
        &self.groups
    }

    /// Groups that admit at least one version
    pub fn satisfiable_groups(&self) -> impl Iterator<Item = &Interval> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    pub fn is_unsatisfiable(&self) -> bool {
        !self.groups.is_empty() && self.satisfiable_groups().next().is_none()
    }

    /// Collapse the alternatives to one interval.
    ///
    /// The lowest floor and the highest ceiling among the non-empty groups
    /// win, so gaps between disjoint alternatives are covered. When every group
    /// is empty the first group is returned unchanged. No groups at all means
    /// no constraint.
    pub fn interval(&self) -> Interval {
        let collapsed = self
            .satisfiable_groups()
            .fold(None, |acc: Option<Interval>, group| match acc {
                None => Some(group.clone()),
                Some(acc) => Some(acc.union(group)),
            });

        match collapsed {
            Some(interval) => interval,
            None => self.groups.first().cloned().unwrap_or_else(Interval::unbounded),
        }
    }

    /// Cross-intersect two sets, keeping every non-empty pairwise overlap.
    ///
    /// Unlike intersecting the collapsed intervals this never admits a
    /// version that falls in a gap between alternatives.
    pub fn intersect(&self, other: &ConstraintSet) -> ConstraintSet {
        let mut groups = Vec::new();
        for a in self.satisfiable_groups() {
            for b in other.satisfiable_groups() {
                let overlap = a.intersect(b);
                if !overlap.is_empty() && !groups.contains(&overlap) {
                    groups.push(overlap);
                }
            }
        }
        ConstraintSet::new(groups)
    }
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl From<Interval> for ConstraintSet {
    fn from(interval: Interval) -> Self {
        ConstraintSet::new(vec![interval])
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.groups.iter().map(|g| g.to_string()).collect();
        write!(f, "{}", parts.join(" || "))
    }
}
