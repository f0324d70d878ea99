use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse package.json: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid package.json: top-level value is not an object")]
    NotAnObject,

    #[error("Could not load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<ManifestError>,
    },
}

impl ManifestError {
    /// Whether trying again could succeed. Missing files and bad JSON never will.
    pub fn is_transient(&self) -> bool {
        match self {
            ManifestError::Io(e) => !matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::InvalidData
            ),
            ManifestError::Load { source, .. } => source.is_transient(),
            ManifestError::JsonParse(_) | ManifestError::NotAnObject => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
