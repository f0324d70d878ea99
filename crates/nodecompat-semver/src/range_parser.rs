//! Range expression parsing

use std::fmt;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::constraint::{Bound, ConstraintSet, Interval, Operator};
use crate::Version;

lazy_static! {
    // OR splitter
    static ref OR_RE: Regex = Regex::new(r"\s*\|\|\s*").unwrap();

    // Hyphen range spanning a whole AND-group
    static ref HYPHEN_RE: Regex = Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap();

    // Optional operator followed by the version text
    static ref ATOM_RE: Regex = Regex::new(r"^(<=|>=|<|>|=|\^|~)?\s*(.*)$").unwrap();

    // Match any wildcard
    static ref WILDCARD_RE: Regex = Regex::new(r"^[vV]?[xX*](?:\.[xX*])*$").unwrap();

    // X range: concrete leading components followed by wildcards
    static ref X_RANGE_RE: Regex = Regex::new(r"^[vV]?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:\.[xX*])+$").unwrap();
}

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '^', '~'];

/// A token the parser could not understand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub token: String,
    pub reason: String,
}

impl Diagnostic {
    fn new(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Diagnostic {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\": {}", self.token, self.reason)
    }
}

/// Result of parsing one range expression.
///
/// Parsing never fails. A malformed expression resolves to "no constraint"
/// and carries the diagnostics explaining why.
#[derive(Debug, Clone)]
pub struct ParsedRange {
    source: Option<String>,
    constraint_set: ConstraintSet,
    diagnostics: Vec<Diagnostic>,
}

impl ParsedRange {
    fn unconstrained(source: Option<&str>, diagnostics: Vec<Diagnostic>) -> Self {
        ParsedRange {
            source: source.map(str::to_string),
            constraint_set: ConstraintSet::unbounded(),
            diagnostics,
        }
    }

    /// The raw expression, `None` when the participant declared nothing
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn constraint_set(&self) -> &ConstraintSet {
        &self.constraint_set
    }

    pub fn into_constraint_set(self) -> ConstraintSet {
        self.constraint_set
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_well_formed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The expression collapsed to a single interval
    pub fn interval(&self) -> Interval {
        self.constraint_set.interval()
    }
}

/// Parser for range expressions such as `>=14.0.0 <16.0.0 || ^18.0.0`
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeParser;

impl RangeParser {
    pub fn new() -> Self {
        RangeParser
    }

    /// Parse a range expression into its OR-groups
    pub fn parse(&self, expression: &str) -> ParsedRange {
        self.parse_optional(Some(expression))
    }

    /// Parse an optional expression; absence means no constraint
    pub fn parse_optional(&self, expression: Option<&str>) -> ParsedRange {
        let trimmed = match expression.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => return ParsedRange::unconstrained(expression, Vec::new()),
        };

        let mut groups = Vec::new();
        let mut diagnostics = Vec::new();
        for alternative in OR_RE.split(trimmed) {
            match self.parse_group(alternative) {
                Ok(interval) => groups.push(interval),
                Err(errors) => diagnostics.extend(errors),
            }
        }

        if !diagnostics.is_empty() {
            for diagnostic in &diagnostics {
                log::warn!("Ignoring malformed range \"{}\": {}", trimmed, diagnostic);
            }
            return ParsedRange::unconstrained(expression, diagnostics);
        }

        ParsedRange {
            source: expression.map(str::to_string),
            constraint_set: ConstraintSet::new(groups),
            diagnostics,
        }
    }

    /// Exclusive ceiling implied by `^version`. `None` when the bumped
    /// component would overflow, so nothing lies above the range.
    pub fn caret_upper(version: &Version) -> Option<Version> {
        if version.major() > 0 {
            version.bump_major()
        } else if version.minor() > 0 {
            version.bump_minor()
        } else {
            version.bump_patch()
        }
    }

    /// Exclusive ceiling implied by `~version`
    pub fn tilde_upper(version: &Version) -> Option<Version> {
        if version.major() > 0 || version.minor() > 0 {
            version.bump_minor()
        } else {
            version.bump_patch()
        }
    }

    /// Intersect the atoms of one AND-group
    fn parse_group(&self, group: &str) -> Result<Interval, Vec<Diagnostic>> {
        let group = group.trim();
        if group.is_empty() {
            return Ok(Interval::unbounded());
        }

        if let Some(caps) = HYPHEN_RE.captures(group) {
            return self.parse_hyphen_range(&caps).map_err(|d| vec![d]);
        }

        let mut interval = Interval::unbounded();
        let mut errors = Vec::new();
        for atom in self.split_atoms(group) {
            match atom.and_then(|atom| self.parse_atom(&atom)) {
                Ok(parsed) => interval = interval.intersect(&parsed),
                Err(diagnostic) => errors.push(diagnostic),
            }
        }

        if errors.is_empty() {
            Ok(interval)
        } else {
            Err(errors)
        }
    }

    /// Split an AND-group on whitespace, keeping `>= 1.0.0` together
    fn split_atoms(&self, group: &str) -> Vec<Result<String, Diagnostic>> {
        let mut atoms = Vec::new();
        let mut pending_operator: Option<&str> = None;

        for token in group.split_whitespace() {
            if token.chars().all(|c| OPERATOR_CHARS.contains(&c)) {
                if let Some(op) = pending_operator.replace(token) {
                    atoms.push(Err(Diagnostic::new(op, "operator without a version")));
                }
                continue;
            }

            match pending_operator.take() {
                Some(op) => atoms.push(Ok(format!("{}{}", op, token))),
                None => atoms.push(Ok(token.to_string())),
            }
        }

        if let Some(op) = pending_operator {
            atoms.push(Err(Diagnostic::new(op, "operator without a version")));
        }

        atoms
    }

    fn parse_atom(&self, atom: &str) -> Result<Interval, Diagnostic> {
        let caps = ATOM_RE
            .captures(atom)
            .ok_or_else(|| Diagnostic::new(atom, "could not parse constraint"))?;
        let operator_str = caps.get(1).map_or("", |m| m.as_str());
        let version_str = caps.get(2).map_or("", |m| m.as_str()).trim();

        let operator = Operator::from_str(operator_str).map_err(|e| Diagnostic::new(atom, e.to_string()))?;

        if version_str.is_empty() {
            return Err(Diagnostic::new(atom, "empty version"));
        }

        if operator == Operator::Tilde && version_str.starts_with('>') {
            return Err(Diagnostic::new(
                atom,
                "Invalid operator \"~>\", you probably meant to use the \"~\" operator",
            ));
        }

        if WILDCARD_RE.is_match(version_str) {
            return Ok(Interval::unbounded());
        }

        if let Some(caps) = X_RANGE_RE.captures(version_str) {
            let (floor, given) = x_range_floor(&caps).map_err(|reason| Diagnostic::new(atom, reason))?;
            return self
                .x_range_interval(operator, floor, given)
                .map_err(|reason| Diagnostic::new(atom, reason));
        }

        let version = Version::parse(version_str).map_err(|e| Diagnostic::new(atom, e.to_string()))?;

        let interval = match operator {
            Operator::Equal => Interval::exact(version),
            Operator::GreaterThanOrEqual => Interval::new(Bound::inclusive(version), Bound::Unbounded),
            // `>` is treated like `>=`: the floor stays inclusive
            Operator::GreaterThan => Interval::new(Bound::inclusive(version), Bound::Unbounded),
            Operator::LessThanOrEqual => Interval::new(Bound::Unbounded, Bound::inclusive(version)),
            Operator::LessThan => Interval::new(Bound::Unbounded, Bound::exclusive(version)),
            Operator::Caret => {
                let upper = ceiling(Self::caret_upper(&version));
                Interval::new(Bound::inclusive(version), upper)
            }
            Operator::Tilde => {
                let upper = ceiling(Self::tilde_upper(&version));
                Interval::new(Bound::inclusive(version), upper)
            }
        };

        Ok(interval)
    }

    fn x_range_interval(&self, operator: Operator, floor: Version, given: usize) -> Result<Interval, String> {
        let next = bump_at(&floor, given - 1);
        let interval = match operator {
            Operator::Equal => Interval::new(Bound::inclusive(floor), ceiling(next)),
            Operator::GreaterThanOrEqual => Interval::new(Bound::inclusive(floor), Bound::Unbounded),
            Operator::GreaterThan => match next {
                Some(next) => Interval::new(Bound::inclusive(next), Bound::Unbounded),
                None => return Err(format!("no version is greater than {}", floor)),
            },
            Operator::LessThan => Interval::new(Bound::Unbounded, Bound::exclusive(floor)),
            Operator::LessThanOrEqual => Interval::new(Bound::Unbounded, ceiling(next)),
            Operator::Caret => {
                let significant = [floor.major(), floor.minor(), floor.patch()]
                    .iter()
                    .take(given)
                    .position(|&n| n != 0)
                    .unwrap_or(given - 1);
                let upper = ceiling(bump_at(&floor, significant));
                Interval::new(Bound::inclusive(floor), upper)
            }
            Operator::Tilde => {
                let upper = ceiling(bump_at(&floor, std::cmp::min(given - 1, 1)));
                Interval::new(Bound::inclusive(floor), upper)
            }
        };
        Ok(interval)
    }

    fn parse_hyphen_range(&self, caps: &Captures) -> Result<Interval, Diagnostic> {
        let from = caps.get(1).map_or("", |m| m.as_str());
        let to = caps.get(2).map_or("", |m| m.as_str());

        let lower = if WILDCARD_RE.is_match(from) {
            Bound::Unbounded
        } else if let Some(x) = X_RANGE_RE.captures(from) {
            let (floor, _) = x_range_floor(&x).map_err(|reason| Diagnostic::new(from, reason))?;
            Bound::inclusive(floor)
        } else {
            Bound::inclusive(Version::parse(from).map_err(|e| Diagnostic::new(from, e.to_string()))?)
        };

        let upper = if WILDCARD_RE.is_match(to) {
            Bound::Unbounded
        } else if let Some(x) = X_RANGE_RE.captures(to) {
            let (floor, given) = x_range_floor(&x).map_err(|reason| Diagnostic::new(to, reason))?;
            ceiling(bump_at(&floor, given - 1))
        } else {
            let version = Version::parse(to).map_err(|e| Diagnostic::new(to, e.to_string()))?;
            let given = version.components().len();
            if given < 3 && !version.is_pre_release() {
                ceiling(bump_at(&version, given - 1))
            } else {
                Bound::inclusive(version)
            }
        };

        Ok(Interval::new(lower, upper))
    }
}

/// Zero-padded floor of an x-range and how many components were concrete
fn x_range_floor(caps: &Captures) -> Result<(Version, usize), String> {
    let mut parts = [0u64; 3];
    let mut given = 0;
    for (i, slot) in parts.iter_mut().enumerate() {
        if let Some(m) = caps.get(i + 1) {
            *slot = m
                .as_str()
                .parse()
                .map_err(|_| format!("version component \"{}\" is out of range", m.as_str()))?;
            given = i + 1;
        }
    }
    Ok((Version::new(parts[0], parts[1], parts[2]), given))
}

/// Exclusive upper bound at `upper`; no upper bound when the bump overflowed
fn ceiling(upper: Option<Version>) -> Bound {
    upper.map_or(Bound::Unbounded, Bound::exclusive)
}

fn bump_at(version: &Version, index: usize) -> Option<Version> {
    match index {
        0 => version.bump_major(),
        1 => version.bump_minor(),
        _ => version.bump_patch(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn parse(expression: &str) -> Interval {
        RangeParser::new().parse(expression).interval()
    }

    fn assert_bounds(expression: &str, lower: Bound, upper: Bound) {
        let interval = parse(expression);
        assert_eq!(interval.lower(), &lower, "lower bound of {:?}", expression);
        assert_eq!(interval.upper(), &upper, "upper bound of {:?}", expression);
    }

    #[test]
    fn test_exact_version() {
        assert_bounds("14.0.0", Bound::inclusive(v("14.0.0")), Bound::inclusive(v("14.0.0")));
        assert_bounds("=14", Bound::inclusive(v("14.0.0")), Bound::inclusive(v("14.0.0")));
        assert_bounds("v14.1", Bound::inclusive(v("14.1.0")), Bound::inclusive(v("14.1.0")));
    }

    #[test]
    fn test_comparison_operators() {
        assert_bounds(">=14.0.0", Bound::inclusive(v("14.0.0")), Bound::Unbounded);
        assert_bounds(">14.0.0", Bound::inclusive(v("14.0.0")), Bound::Unbounded);
        assert_bounds("<=16.0.0", Bound::Unbounded, Bound::inclusive(v("16.0.0")));
        assert_bounds("<16.0.0", Bound::Unbounded, Bound::exclusive(v("16.0.0")));
        assert_bounds(">= 14.0.0", Bound::inclusive(v("14.0.0")), Bound::Unbounded);
    }

    #[test]
    fn test_caret() {
        assert_bounds("^14.0.0", Bound::inclusive(v("14.0.0")), Bound::exclusive(v("15.0.0")));
        assert_bounds("^1.2.3", Bound::inclusive(v("1.2.3")), Bound::exclusive(v("2.0.0")));
        assert_bounds("^0.2.3", Bound::inclusive(v("0.2.3")), Bound::exclusive(v("0.3.0")));
        assert_bounds("^0.0.3", Bound::inclusive(v("0.0.3")), Bound::exclusive(v("0.0.4")));
        assert_bounds("^14", Bound::inclusive(v("14.0.0")), Bound::exclusive(v("15.0.0")));
    }

    #[test]
    fn test_tilde() {
        assert_bounds("~14.2.3", Bound::inclusive(v("14.2.3")), Bound::exclusive(v("14.3.0")));
        assert_bounds("~14.0.0", Bound::inclusive(v("14.0.0")), Bound::exclusive(v("14.1.0")));
        assert_bounds("~0.2.3", Bound::inclusive(v("0.2.3")), Bound::exclusive(v("0.3.0")));
        assert_bounds("~0.0.3", Bound::inclusive(v("0.0.3")), Bound::exclusive(v("0.0.4")));
    }

    #[test]
    fn test_upper_bounds_never_admit_the_boundary() {
        for expression in ["<16.0.0", "^15.1.0", "~16.0.0-rc.1 <16.0.0"] {
            assert!(!parse(expression).contains(&v("16.0.0")), "{} admits 16.0.0", expression);
        }
    }

    #[test]
    fn test_unconstrained_inputs() {
        let parser = RangeParser::new();
        for expression in ["*", "", "   ", "x", "X", "*.*"] {
            let parsed = parser.parse(expression);
            assert!(parsed.interval().is_unbounded(), "{:?}", expression);
            assert!(parsed.is_well_formed(), "{:?}", expression);
        }
        let absent = parser.parse_optional(None);
        assert!(absent.interval().is_unbounded());
        assert!(absent.is_well_formed());
        assert_eq!(absent.source(), None);
    }

    #[test]
    fn test_and_group() {
        assert_bounds(
            ">=14.0.0 <16.0.0",
            Bound::inclusive(v("14.0.0")),
            Bound::exclusive(v("16.0.0")),
        );
        assert_bounds(
            ">= 14.0.0   < 16.0.0",
            Bound::inclusive(v("14.0.0")),
            Bound::exclusive(v("16.0.0")),
        );
    }

    #[test]
    fn test_unsatisfiable_group_is_empty() {
        let parsed = RangeParser::new().parse(">2.0.0 <1.0.0");
        assert!(parsed.is_well_formed());
        assert!(parsed.interval().is_empty());
        assert!(parsed.constraint_set().is_unsatisfiable());
    }

    #[test]
    fn test_or_removes_upper_bound() {
        assert_bounds(
            ">=14.0.0 <16.0.0 || >=18.0.0",
            Bound::inclusive(v("14.0.0")),
            Bound::Unbounded,
        );
    }

    #[test]
    fn test_or_skips_empty_alternatives() {
        assert_bounds(
            ">3.0.0 <1.0.0 || ^18.0.0",
            Bound::inclusive(v("18.0.0")),
            Bound::exclusive(v("19.0.0")),
        );
        let parsed = RangeParser::new().parse(">=14.0.0 ||");
        assert!(parsed.is_well_formed());
        assert!(parsed.interval().is_unbounded());
    }

    #[test]
    fn test_or_keeps_groups() {
        let parsed = RangeParser::new().parse("^14.17.0 || ^16.13.0 || >=18.0.0");
        assert_eq!(parsed.constraint_set().groups().len(), 3);
        assert_eq!(parsed.constraint_set().to_string(), ">=14.17.0 <15.0.0 || >=16.13.0 <17.0.0 || >=18.0.0");
    }

    #[test]
    fn test_x_ranges() {
        assert_bounds("14.x", Bound::inclusive(v("14.0.0")), Bound::exclusive(v("15.0.0")));
        assert_bounds("1.2.*", Bound::inclusive(v("1.2.0")), Bound::exclusive(v("1.3.0")));
        assert_bounds(">=14.x", Bound::inclusive(v("14.0.0")), Bound::Unbounded);
        assert_bounds(">14.x", Bound::inclusive(v("15.0.0")), Bound::Unbounded);
        assert_bounds("<14.x", Bound::Unbounded, Bound::exclusive(v("14.0.0")));
        assert_bounds("<=14.x", Bound::Unbounded, Bound::exclusive(v("15.0.0")));
        assert_bounds("^0.x", Bound::inclusive(v("0.0.0")), Bound::exclusive(v("1.0.0")));
        assert_bounds("^0.2.x", Bound::inclusive(v("0.2.0")), Bound::exclusive(v("0.3.0")));
        assert_bounds("~1.x", Bound::inclusive(v("1.0.0")), Bound::exclusive(v("2.0.0")));
    }

    #[test]
    fn test_hyphen_ranges() {
        assert_bounds(
            "1.2.3 - 2.3.4",
            Bound::inclusive(v("1.2.3")),
            Bound::inclusive(v("2.3.4")),
        );
        assert_bounds("1 - 2", Bound::inclusive(v("1.0.0")), Bound::exclusive(v("3.0.0")));
        assert_bounds("1.2 - 2.3", Bound::inclusive(v("1.2.0")), Bound::exclusive(v("2.4.0")));
        assert_bounds("14 - *", Bound::inclusive(v("14.0.0")), Bound::Unbounded);
    }

    #[test]
    fn test_pre_release_bounds() {
        let interval = parse(">=16.0.0-rc.1 <17");
        assert_eq!(interval.lower(), &Bound::inclusive(v("16.0.0-rc.1")));
        assert!(interval.contains(&v("16.0.0")));
        assert!(interval.contains(&v("16.0.0-rc.2")));
        assert!(!interval.contains(&v("16.0.0-beta")));
    }

    #[test]
    fn test_malformed_resolves_to_unbounded() {
        let parser = RangeParser::new();
        for expression in [">=abc", "node >= 14", ">=14.0.0 <", "1.2.3 - ", "=> 1.0.0", "14.0.0 | 16.0.0"] {
            let parsed = parser.parse(expression);
            assert!(!parsed.is_well_formed(), "{:?} should be malformed", expression);
            assert!(parsed.interval().is_unbounded(), "{:?}", expression);
        }
    }

    #[test]
    fn test_malformed_reports_every_token() {
        let parsed = RangeParser::new().parse(">=foo <bar || ^1.0.0");
        let tokens: Vec<&str> = parsed.diagnostics().iter().map(|d| d.token.as_str()).collect();
        assert_eq!(tokens, vec![">=foo", "<bar"]);
        assert!(parsed.interval().is_unbounded());
    }

    #[test]
    fn test_nudges_ruby_devs() {
        let parsed = RangeParser::new().parse("~>1.2");
        assert!(!parsed.is_well_formed());
        assert!(parsed.diagnostics()[0].reason.contains("~>"));
    }

    #[test]
    fn test_implied_bounds() {
        assert_eq!(RangeParser::caret_upper(&v("1.2.3")), Some(v("2.0.0")));
        assert_eq!(RangeParser::tilde_upper(&v("1.2.3")), Some(v("1.3.0")));
        assert_eq!(RangeParser::caret_upper(&v("0.0.3")), Some(v("0.0.4")));
        assert_eq!(RangeParser::caret_upper(&v("18446744073709551615.0.0")), None);
    }

    #[test]
    fn test_greater_than_keeps_floor_inclusive() {
        let interval = parse(">14.0.0");
        assert!(interval.contains(&v("14.0.0")));
        assert!(!parse(">14.0.0 <=14.0.0").is_empty());
        assert_eq!(parse(">14.0.0 <=14.0.0"), Interval::exact(v("14.0.0")));
    }

    #[test]
    fn test_ceiling_overflow_leaves_range_open() {
        let max = "18446744073709551615";
        let cases = [
            (format!("^{}.0.0", max), format!("{}.0.0", max)),
            (format!("~0.0.{}", max), format!("0.0.{}", max)),
            (format!("~1.{}.0", max), format!("1.{}.0", max)),
            (format!("{}.x", max), format!("{}.0.0", max)),
            (format!("1.0.0 - {}", max), "1.0.0".to_string()),
        ];
        for (expression, floor) in &cases {
            let parsed = RangeParser::new().parse(expression);
            assert!(parsed.is_well_formed(), "{}", expression);
            let interval = parsed.interval();
            assert!(!interval.is_empty(), "{} should not be empty", expression);
            assert_eq!(interval.lower(), &Bound::inclusive(v(floor)), "{}", expression);
            assert_eq!(interval.upper(), &Bound::Unbounded, "{}", expression);
        }
    }

    #[test]
    fn test_nothing_above_largest_x_range() {
        let parsed = RangeParser::new().parse(&format!(">{}.x", u64::MAX));
        assert!(!parsed.is_well_formed());
        assert!(parsed.interval().is_unbounded());
    }
}
