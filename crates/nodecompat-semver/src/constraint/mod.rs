//! Constraint types for version ranges

mod bound;
mod constraint_set;
mod interval;
mod operator;

pub use bound::Bound;
pub use constraint_set::ConstraintSet;
pub use interval::Interval;
pub use operator::{InvalidOperatorError, Operator};
