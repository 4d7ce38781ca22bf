//! Configuration schema (pipescope.toml)

use serde::{Deserialize, Serialize};

/// Limits and defaults for the visibility engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Upstream hop limit used when a request does not specify one
    pub default_upstream_depth: usize,

    /// Downstream hop limit used when a request does not specify one
    pub default_downstream_depth: usize,

    /// Hard cap on the number of nodes returned for anchor-based views
    pub max_visible_nodes: usize,

    /// Depth bound for the anchor -> focus path search
    pub focus_path_max_depth: usize,

    /// Restrict anchor traversal to the selected flow's members
    ///
    /// Off by default so the anchor's full neighborhood stays visible.
    pub prune_to_flow: bool,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            default_upstream_depth: 3,
            default_downstream_depth: 2,
            max_visible_nodes: 300,
            focus_path_max_depth: 10,
            prune_to_flow: false,
        }
    }
}

/// Naming conventions used to infer semantic layers
///
/// Matching is case-insensitive and applies to the last dot-separated
/// segment of a node name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub staging_prefixes: Vec<String>,
    pub intermediate_prefixes: Vec<String>,
    pub mart_prefixes: Vec<String>,
    pub final_suffixes: Vec<String>,
    pub report_prefixes: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            staging_prefixes: vec!["stg_".to_string(), "staging_".to_string()],
            intermediate_prefixes: vec!["int_".to_string(), "intermediate_".to_string()],
            mart_prefixes: vec!["mart_".to_string(), "fct_".to_string(), "dim_".to_string()],
            final_suffixes: vec!["_final".to_string()],
            report_prefixes: vec!["rpt_".to_string(), "report_".to_string()],
        }
    }
}

impl ClassifierConfig {
    fn all_patterns(&self) -> impl Iterator<Item = &String> {
        self.staging_prefixes
            .iter()
            .chain(&self.intermediate_prefixes)
            .chain(&self.mart_prefixes)
            .chain(&self.final_suffixes)
            .chain(&self.report_prefixes)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub visibility: VisibilityConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Directory the config was loaded from (for resolving relative paths)
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            visibility: VisibilityConfig::default(),
            classifier: ClassifierConfig::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Resolve a path relative to the project root; absolute paths are returned as-is
    pub fn resolve_path(&self, path: &std::path::Path) -> std::path::PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.visibility.max_visible_nodes == 0 {
            return Err(ConfigError::InvalidValue(
                "visibility.max_visible_nodes must be at least 1".to_string(),
            ));
        }

        if self.classifier.all_patterns().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "classifier patterns must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.visibility.default_upstream_depth, 3);
        assert_eq!(config.visibility.default_downstream_depth, 2);
        assert_eq!(config.visibility.max_visible_nodes, 300);
        assert_eq!(config.visibility.focus_path_max_depth, 10);
        assert!(!config.visibility.prune_to_flow);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [visibility]
            max_visible_nodes = 50

            [classifier]
            report_prefixes = ["dash_"]
            "#,
        )
        .unwrap();

        assert_eq!(config.visibility.max_visible_nodes, 50);
        assert_eq!(config.visibility.default_upstream_depth, 3);
        assert_eq!(config.classifier.report_prefixes, vec!["dash_".to_string()]);
        assert_eq!(config.classifier.staging_prefixes, ClassifierConfig::default().staging_prefixes);
    }

    #[test]
    fn zero_cap_is_rejected() {
        let err = Config::from_toml("[visibility]\nmax_visible_nodes = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let err = Config::from_toml("[classifier]\nmart_prefixes = [\"\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.visibility, parsed.visibility);
        assert_eq!(config.classifier, parsed.classifier);
    }
}
