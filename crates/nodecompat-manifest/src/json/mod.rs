//! package.json model and loading

mod loader;
mod schema;

pub use loader::{
    dependency_manifest_path, dependency_names, load_dependency_manifest, load_package_json,
    load_root_manifest, parse_package_json,
};
pub use schema::PackageJson;
