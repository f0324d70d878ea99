//! Folding every participant's range into one global interval

use crate::constraint::{Bound, ConstraintSet, Interval};
use crate::range_parser::RangeParser;
use crate::Version;

/// How OR-alternatives are carried through the fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationMode {
    /// Each participant's alternatives are collapsed to one interval first.
    /// A version in the gap of `<5 || >=12` counts as admitted.
    #[default]
    Collapsed,
    /// Alternatives are kept apart and cross-intersected, so gaps stay gaps.
    Disjoint,
}

/// What one participant contributed to the fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationStep {
    pub participant: String,
    /// Raw expression, `None` when nothing was declared
    pub expression: Option<String>,
    /// The participant's own collapsed interval
    pub interval: Interval,
    /// Running global interval after this step
    pub running: Interval,
    pub well_formed: bool,
}

/// Final outcome of an aggregation
#[derive(Debug, Clone)]
pub struct AggregationResult {
    interval: Interval,
    surviving: Option<ConstraintSet>,
    conflict: bool,
    steps: Vec<AggregationStep>,
}

impl AggregationResult {
    /// The final interval, inclusivity included
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn global_lower(&self) -> &Bound {
        self.interval.lower()
    }

    pub fn global_upper(&self) -> &Bound {
        self.interval.upper()
    }

    /// Value of the lower bound; `None` when there is no floor
    pub fn global_min(&self) -> Option<&Version> {
        self.interval.lower().version()
    }

    /// Value of the upper bound; `None` when there is no ceiling
    pub fn global_max(&self) -> Option<&Version> {
        self.interval.upper().version()
    }

    pub fn is_conflict(&self) -> bool {
        self.conflict
    }

    /// Intervals still admitted in disjoint mode
    pub fn surviving(&self) -> Option<&ConstraintSet> {
        self.surviving.as_ref()
    }

    /// Per-participant trace, in input order
    pub fn steps(&self) -> &[AggregationStep] {
        &self.steps
    }
}

/// Left-to-right intersection of participant ranges.
///
/// The project's own range should be added first, then each dependency.
#[derive(Debug, Clone)]
pub struct Aggregator {
    mode: AggregationMode,
    parser: RangeParser,
    running: Interval,
    surviving: ConstraintSet,
    steps: Vec<AggregationStep>,
}

impl Aggregator {
    pub fn new(mode: AggregationMode) -> Self {
        Aggregator {
            mode,
            parser: RangeParser::new(),
            running: Interval::unbounded(),
            surviving: ConstraintSet::unbounded(),
            steps: Vec::new(),
        }
    }

    /// Parse and fold one participant's declared range
    pub fn add(&mut self, participant: &str, expression: Option<&str>) -> &AggregationStep {
        let parsed = self.parser.parse_optional(expression);
        let well_formed = parsed.is_well_formed();
        let source = parsed.source().map(str::to_string);
        self.push(participant, source, parsed.into_constraint_set(), well_formed)
    }

    /// Fold an already parsed constraint set
    pub fn add_set(&mut self, participant: &str, set: ConstraintSet) -> &AggregationStep {
        let expression = Some(set.to_string());
        self.push(participant, expression, set, true)
    }

    fn push(
        &mut self,
        participant: &str,
        expression: Option<String>,
        set: ConstraintSet,
        well_formed: bool,
    ) -> &AggregationStep {
        if set.is_unsatisfiable() {
            log::warn!("{} declares a range no version satisfies: {}", participant, set);
        }

        let interval = set.interval();
        self.running = self.running.intersect(&interval);
        if self.mode == AggregationMode::Disjoint {
            self.surviving = self.surviving.intersect(&set);
        }

        log::debug!(
            "{} ({}): {} => running {}",
            participant,
            expression.as_deref().unwrap_or("no constraint"),
            interval,
            self.running
        );

        self.steps.push(AggregationStep {
            participant: participant.to_string(),
            expression,
            interval,
            running: self.running.clone(),
            well_formed,
        });
        // Just pushed, so the vector is non-empty
        &self.steps[self.steps.len() - 1]
    }

    /// Finalize: an empty result is a conflict
    pub fn finish(self) -> AggregationResult {
        let (interval, surviving, conflict) = match self.mode {
            AggregationMode::Collapsed => {
                let conflict = self.running.is_empty();
                (self.running, None, conflict)
            }
            AggregationMode::Disjoint => {
                let conflict = self.surviving.groups().is_empty();
                let interval = if conflict {
                    self.running
                } else {
                    self.surviving.interval()
                };
                (interval, Some(self.surviving), conflict)
            }
        };

        if conflict {
            log::debug!("No version satisfies all {} participants ({})", self.steps.len(), interval);
        }

        AggregationResult {
            interval,
            surviving,
            conflict,
            steps: self.steps,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AggregationMode::default())
    }
}

/// Intersect every constraint set in order, collapsing alternatives
pub fn aggregate<I>(constraints: I) -> AggregationResult
where
    I: IntoIterator<Item = ConstraintSet>,
{
    let mut aggregator = Aggregator::default();
    for (i, set) in constraints.into_iter().enumerate() {
        aggregator.add_set(&format!("#{}", i), set);
    }
    aggregator.finish()
}
