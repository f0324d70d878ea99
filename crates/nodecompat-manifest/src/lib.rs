//! Reading package.json manifests and folding their `engines.node` ranges

pub mod analysis;
pub mod error;
pub mod json;
pub mod report;
pub mod retry;

pub use analysis::{analyze, Analysis, AnalysisOptions, SkippedDependency, ROOT_PARTICIPANT};
pub use error::{ManifestError, Result};
pub use json::PackageJson;
pub use report::{summary_message, Report};
pub use retry::{with_retries_if, RetryPolicy};
