//! End-to-end engine analysis of a project directory

use std::path::{Path, PathBuf};

use nodecompat_semver::{AggregationMode, AggregationResult, Aggregator};

use crate::error::{ManifestError, Result};
use crate::json::{dependency_names, load_dependency_manifest, load_root_manifest, PackageJson};
use crate::retry::{with_retries_if, RetryPolicy};

/// Participant name used for the project's own constraint
pub const ROOT_PARTICIPANT: &str = "Project root";

/// Options for [`analyze`]
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub project_dir: PathBuf,
    /// Skip devDependencies
    pub exclude_dev: bool,
    pub mode: AggregationMode,
    pub retry: RetryPolicy,
}

impl AnalysisOptions {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        AnalysisOptions {
            project_dir: project_dir.into(),
            exclude_dev: false,
            mode: AggregationMode::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// A dependency left out of the fold because its manifest could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDependency {
    pub name: String,
    pub reason: String,
}

/// Result of analyzing one project
#[derive(Debug, Clone)]
pub struct Analysis {
    pub project_name: Option<String>,
    pub result: AggregationResult,
    /// Number of dependencies considered, skipped ones included
    pub dependencies: usize,
    pub skipped: Vec<SkippedDependency>,
}

impl Analysis {
    pub fn result(&self) -> &AggregationResult {
        &self.result
    }

    pub fn is_conflict(&self) -> bool {
        self.result.is_conflict()
    }
}

/// Fold the project's `engines.node` and every dependency's into one range.
///
/// The root manifest must be readable. Dependencies that cannot be read are
/// skipped and reported in [`Analysis::skipped`].
pub fn analyze(options: &AnalysisOptions) -> Result<Analysis> {
    let project_dir = options.project_dir.as_path();
    let root = with_retries_if(
        "Reading root package.json",
        &options.retry,
        ManifestError::is_transient,
        || load_root_manifest(project_dir),
    )?;

    let mut aggregator = Aggregator::new(options.mode);
    aggregator.add(ROOT_PARTICIPANT, root.node_engine());

    let names = dependency_names(&root, options.exclude_dev);
    log::info!("Analyzing {} dependencies in {}", names.len(), project_dir.display());

    let mut skipped = Vec::new();
    for name in &names {
        match read_dependency(project_dir, name, &options.retry) {
            Ok(pkg) => {
                let step = aggregator.add(name, pkg.node_engine());
                if !step.well_formed {
                    log::warn!("{} declares a malformed engines.node, treating it as unconstrained", name);
                }
            }
            Err(err) => {
                log::warn!("Skipping {}: {}", name, err);
                skipped.push(SkippedDependency {
                    name: name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(Analysis {
        project_name: root.name,
        result: aggregator.finish(),
        dependencies: names.len(),
        skipped,
    })
}

fn read_dependency(project_dir: &Path, name: &str, policy: &RetryPolicy) -> Result<PackageJson> {
    with_retries_if(
        &format!("Reading {}", name),
        policy,
        ManifestError::is_transient,
        || load_dependency_manifest(project_dir, name),
    )
}
