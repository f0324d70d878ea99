//! Version value type

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::Comparator;

/// Error type for strict version parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version string \"{0}\"")]
    InvalidVersion(String),
    #[error("Version component \"{component}\" in \"{version}\" is out of range")]
    ComponentOverflow { version: String, component: String },
}

lazy_static! {
    // Dotted numeric core, optional pre-release, optional build metadata (discarded)
    static ref VERSION_RE: Regex = Regex::new(
        r"^[vV]?(\d+(?:\.\d+)*)(?:-([0-9A-Za-z][0-9A-Za-z.-]*))?(?:\+[0-9A-Za-z.-]+)?$"
    ).unwrap();
}

/// One dotted component of a version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    Numeric(u64),
    /// Non-numeric component; only produced by [`Version::parse_lenient`]
    Text(String),
}

impl Component {
    fn numeric_or_zero(&self) -> u64 {
        match self {
            Component::Numeric(n) => *n,
            Component::Text(_) => 0,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Numeric(n) => write!(f, "{}", n),
            Component::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A dotted version with an optional pre-release tag.
///
/// Equality and ordering follow [`Comparator::compare`]: missing trailing
/// components count as zero, so `14` and `14.0.0` are equal.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<Component>,
    pre_release: Option<String>,
}

impl Version {
    /// Create a release version `major.minor.patch`
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            components: vec![
                Component::Numeric(major),
                Component::Numeric(minor),
                Component::Numeric(patch),
            ],
            pre_release: None,
        }
    }

    /// Parse a version string, rejecting anything that is not a dotted
    /// numeric version with an optional pre-release and build suffix.
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        let trimmed = version.trim();
        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::InvalidVersion(version.to_string()))?;

        let core = caps.get(1).map_or("", |m| m.as_str());
        let mut components = Vec::with_capacity(3);
        for part in core.split('.') {
            let n = part.parse::<u64>().map_err(|_| VersionError::ComponentOverflow {
                version: version.to_string(),
                component: part.to_string(),
            })?;
            components.push(Component::Numeric(n));
        }

        Ok(Version {
            components,
            pre_release: caps.get(2).map(|m| m.as_str().to_string()),
        })
    }

    /// Parse any string into a version. Never fails: components that are not
    /// numbers are kept as text and sort below numeric ones.
    pub fn parse_lenient(version: &str) -> Self {
        let trimmed = version.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let without_build = trimmed.split('+').next().unwrap_or("");

        let (core, pre_release) = match without_build.find('-') {
            Some(pos) if pos > 0 => (
                &without_build[..pos],
                Some(without_build[pos + 1..].to_string()),
            ),
            _ => (without_build, None),
        };

        let components = core
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    Component::Numeric(0)
                } else {
                    part.parse::<u64>()
                        .map(Component::Numeric)
                        .unwrap_or_else(|_| Component::Text(part.to_string()))
                }
            })
            .collect();

        Version {
            components,
            pre_release,
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn pre_release(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).map_or(0, Component::numeric_or_zero)
    }

    pub fn major(&self) -> u64 {
        self.component(0)
    }

    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    pub fn patch(&self) -> u64 {
        self.component(2)
    }

    /// `(major+1).0.0`, or `None` when the major component is already `u64::MAX`
    pub fn bump_major(&self) -> Option<Version> {
        Some(Version::new(self.major().checked_add(1)?, 0, 0))
    }

    /// `major.(minor+1).0`
    pub fn bump_minor(&self) -> Option<Version> {
        Some(Version::new(self.major(), self.minor().checked_add(1)?, 0))
    }

    /// `major.minor.(patch+1)`
    pub fn bump_patch(&self) -> Option<Version> {
        Some(Version::new(self.major(), self.minor(), self.patch().checked_add(1)?))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        Comparator::compare(self, other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        Comparator::compare(self, other)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = std::cmp::max(3, self.components.len());
        for i in 0..width {
            if i > 0 {
                f.write_str(".")?;
            }
            match self.components.get(i) {
                Some(component) => write!(f, "{}", component)?,
                None => f.write_str("0")?,
            }
        }
        if let Some(ref pre) = self.pre_release {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}
