use anyhow::{Context, Result};
use nodecompat_manifest::AnalysisOptions;
use nodecompat_semver::AggregationMode;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "nodecompat.toml";

/// The nodecompat configuration file structure (nodecompat.toml)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NodecompatConfig {
    /// Analysis settings
    pub analysis: AnalysisConfig,

    /// Manifest read retries
    pub retry: RetryConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Skip devDependencies
    pub exclude_dev: Option<bool>,

    /// How OR-alternatives are aggregated
    pub mode: Option<ModeConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeConfig {
    Collapsed,
    Disjoint,
}

impl From<ModeConfig> for AggregationMode {
    fn from(mode: ModeConfig) -> Self {
        match mode {
            ModeConfig::Collapsed => AggregationMode::Collapsed,
            ModeConfig::Disjoint => AggregationMode::Disjoint,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts after the first failed read
    pub max_retries: Option<u32>,

    /// Pause between attempts in milliseconds
    pub delay_ms: Option<u64>,
}

impl NodecompatConfig {
    /// Load configuration from nodecompat.toml, searching upward from the given directory
    pub fn load(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE);

            if config_path.exists() {
                log::debug!("Using configuration from {}", config_path.display());
                let content = std::fs::read_to_string(&config_path)
                    .with_context(|| format!("Failed to read {}", config_path.display()))?;
                let config: NodecompatConfig = toml::from_str(&content)
                    .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
                return Ok(Some(config));
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Overlay the configured values onto `options`
    pub fn apply(&self, options: &mut AnalysisOptions) {
        if let Some(exclude_dev) = self.analysis.exclude_dev {
            options.exclude_dev = exclude_dev;
        }
        if let Some(mode) = self.analysis.mode {
            options.mode = mode.into();
        }
        if let Some(max_retries) = self.retry.max_retries {
            options.retry.max_retries = max_retries;
        }
        if let Some(delay_ms) = self.retry.delay_ms {
            options.retry.delay = Duration::from_millis(delay_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodecompat_manifest::RetryPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_config() {
        let config: NodecompatConfig = toml::from_str("").unwrap();
        assert_eq!(config.analysis.exclude_dev, None);
        assert_eq!(config.analysis.mode, None);
        assert_eq!(config.retry.max_retries, None);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[analysis]
exclude_dev = true
mode = "disjoint"

[retry]
max_retries = 5
delay_ms = 250
"#;
        let config: NodecompatConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.analysis.exclude_dev, Some(true));
        assert_eq!(config.analysis.mode, Some(ModeConfig::Disjoint));
        assert_eq!(config.retry.max_retries, Some(5));
        assert_eq!(config.retry.delay_ms, Some(250));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(toml::from_str::<NodecompatConfig>("[analysis]\nmode = \"loose\"").is_err());
    }

    #[test]
    fn test_apply_overrides_only_set_values() {
        let config: NodecompatConfig = toml::from_str("[retry]\ndelay_ms = 10").unwrap();
        let mut options = AnalysisOptions::new(".");
        config.apply(&mut options);

        assert!(!options.exclude_dev);
        assert_eq!(options.mode, AggregationMode::Collapsed);
        assert_eq!(options.retry.max_retries, RetryPolicy::default().max_retries);
        assert_eq!(options.retry.delay, Duration::from_millis(10));
    }

    #[test]
    fn test_load_searches_upward() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join(CONFIG_FILE), "[analysis]\nexclude_dev = true").unwrap();
        let nested = root.path().join("packages").join("app");
        std::fs::create_dir_all(&nested).unwrap();

        let config = NodecompatConfig::load(&nested).unwrap().unwrap();
        assert_eq!(config.analysis.exclude_dev, Some(true));
    }

    #[test]
    fn test_load_reports_invalid_toml() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join(CONFIG_FILE), "[analysis\n").unwrap();
        assert!(NodecompatConfig::load(root.path()).is_err());
    }
}
