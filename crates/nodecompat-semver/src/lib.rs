//! Node.js engine range resolution
//!
//! This crate parses `engines.node` style range expressions into intervals of
//! versions and intersects the ranges of a project and all its dependencies to
//! find the runtime versions every participant accepts.

mod aggregator;
mod comparator;
pub mod constraint;
mod range_parser;
mod version;

pub use aggregator::{aggregate, AggregationMode, AggregationResult, AggregationStep, Aggregator};
pub use comparator::{Comparator, Side};
pub use constraint::{Bound, ConstraintSet, Interval, Operator};
pub use range_parser::{Diagnostic, ParsedRange, RangeParser};
pub use version::{Component, Version, VersionError};
