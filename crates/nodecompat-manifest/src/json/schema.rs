use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The parts of a package.json the engine analysis reads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Kept raw: legacy packages declare `engines` as an array or string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<Value>,

    #[serde(default, deserialize_with = "lenient_map", skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,

    #[serde(default, deserialize_with = "lenient_map", skip_serializing_if = "IndexMap::is_empty")]
    pub dev_dependencies: IndexMap<String, String>,
}

impl PackageJson {
    /// The `engines.node` range, when `engines` is an object with a string `node`
    pub fn node_engine(&self) -> Option<&str> {
        self.engines.as_ref()?.as_object()?.get("node")?.as_str()
    }
}

/// Dependency maps: `null` or a non-object value reads as empty, non-string
/// specs are kept as their JSON text.
fn lenient_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(name, spec)| {
                let spec = match spec {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, spec)
            })
            .collect(),
        _ => IndexMap::new(),
    })
}
