use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::schema::PackageJson;
use crate::error::{ManifestError, Result};

/// Load and parse a package.json file
pub fn load_package_json(path: &Path) -> Result<PackageJson> {
    log::debug!("Reading {}", path.display());
    fs::read_to_string(path)
        .map_err(ManifestError::from)
        .and_then(|content| parse_package_json(&content))
        .map_err(|source| ManifestError::Load {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
}

/// Parse package.json from a string. The top-level value must be an object.
pub fn parse_package_json(content: &str) -> Result<PackageJson> {
    let value: Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(ManifestError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

/// Load `<project>/package.json`
pub fn load_root_manifest(project_dir: &Path) -> Result<PackageJson> {
    load_package_json(&project_dir.join("package.json"))
}

/// `<project>/node_modules/<name>/package.json`; scoped names nest one level
pub fn dependency_manifest_path(project_dir: &Path, name: &str) -> PathBuf {
    let mut path = project_dir.join("node_modules");
    for segment in name.split('/') {
        path.push(segment);
    }
    path.join("package.json")
}

/// Load an installed dependency's package.json
pub fn load_dependency_manifest(project_dir: &Path, name: &str) -> Result<PackageJson> {
    load_package_json(&dependency_manifest_path(project_dir, name))
}

/// Runtime dependencies followed by dev dependencies, without duplicates
pub fn dependency_names(pkg: &PackageJson, exclude_dev: bool) -> Vec<String> {
    let mut names: Vec<String> = pkg.dependencies.keys().cloned().collect();
    if !exclude_dev {
        for name in pkg.dev_dependencies.keys() {
            if !pkg.dependencies.contains_key(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_pkg() -> PackageJson {
        parse_package_json(
            r#"{
                "dependencies": {"dep1": "1.0.0", "dep2": "2.0.0"},
                "devDependencies": {"dev-dep1": "3.0.0", "dep2": "2.1.0", "dev-dep2": "4.0.0"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_dependency_names_include_dev() {
        assert_eq!(
            dependency_names(&mock_pkg(), false),
            vec!["dep1", "dep2", "dev-dep1", "dev-dep2"]
        );
    }

    #[test]
    fn test_dependency_names_exclude_dev() {
        assert_eq!(dependency_names(&mock_pkg(), true), vec!["dep1", "dep2"]);
    }

    #[test]
    fn test_dependency_names_empty() {
        assert!(dependency_names(&PackageJson::default(), false).is_empty());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(parse_package_json("[1, 2]"), Err(ManifestError::NotAnObject)));
        assert!(matches!(parse_package_json("null"), Err(ManifestError::NotAnObject)));
        assert!(matches!(parse_package_json("{oops"), Err(ManifestError::JsonParse(_))));
    }

    #[test]
    fn test_dependency_manifest_path() {
        let root = Path::new("/project");
        assert_eq!(
            dependency_manifest_path(root, "left-pad"),
            Path::new("/project/node_modules/left-pad/package.json")
        );
        assert_eq!(
            dependency_manifest_path(root, "@scope/pkg"),
            Path::new("/project/node_modules/@scope/pkg/package.json")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_root_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::Load { .. }));
        assert!(!err.is_transient());
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "demo", "engines": {"node": "^18"}}"#).unwrap();
        let pkg = load_root_manifest(dir.path()).unwrap();
        assert_eq!(pkg.name.as_deref(), Some("demo"));
        assert_eq!(pkg.node_engine(), Some("^18"));
    }
}
