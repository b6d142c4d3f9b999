//! Registry configuration: which models to load and from where

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Mapping from logical model name to artifact path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base directory for relative artifact paths
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Artifact path by logical model name
    #[serde(default = "default_models")]
    pub models: BTreeMap<String, PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            models: default_models(),
        }
    }
}

impl RegistryConfig {
    /// Create an empty configuration rooted at `models_dir`
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            models: BTreeMap::new(),
        }
    }

    /// Add a model entry
    pub fn with_model(mut self, name: impl Into<String>, artifact: impl Into<PathBuf>) -> Self {
        self.models.insert(name.into(), artifact.into());
        self
    }

    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }

    /// Resolved artifact path for a model.
    ///
    /// Absolute paths are kept as-is, since `Path::join` replaces the base
    /// when the joined path is absolute.
    pub fn artifact_path(&self, name: &str) -> Option<PathBuf> {
        self.models.get(name).map(|p| self.models_dir.join(p))
    }

    /// Every configured model with its resolved artifact path, sorted by name
    pub fn artifacts(&self) -> impl Iterator<Item = (&str, PathBuf)> + '_ {
        self.models
            .iter()
            .map(|(name, p)| (name.as_str(), self.models_dir.join(p)))
    }

    /// All configured model names, sorted
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("./models")
}

fn default_models() -> BTreeMap<String, PathBuf> {
    [
        ("linear_reg", "linear_reg.json"),
        ("logistic_reg", "log_reg.json"),
        ("decision_tree", "decision_tree.json"),
        ("random_forest", "random_forest.json"),
        ("kmeans", "kmeans_model.json"),
    ]
    .into_iter()
    .map(|(name, file)| (name.to_string(), PathBuf::from(file)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let config = RegistryConfig::default();

        assert_eq!(
            config.model_names(),
            vec!["decision_tree", "kmeans", "linear_reg", "logistic_reg", "random_forest"]
        );
        assert_eq!(
            config.artifact_path("logistic_reg"),
            Some(PathBuf::from("./models/log_reg.json"))
        );
        assert_eq!(config.artifact_path("svm"), None);
    }

    #[test]
    fn test_registry_config_yaml() {
        let yaml = r#"
models_dir: /srv/models
models:
  linear_reg: linear.json
  kmeans: /opt/clusters/kmeans.json
"#;

        let config = RegistryConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.models.len(), 2);
        assert_eq!(
            config.artifact_path("linear_reg"),
            Some(PathBuf::from("/srv/models/linear.json"))
        );
        assert_eq!(
            config.artifact_path("kmeans"),
            Some(PathBuf::from("/opt/clusters/kmeans.json"))
        );
    }

    #[test]
    fn test_artifacts_match_artifact_path() {
        let config = RegistryConfig::new("/srv/models")
            .with_model("linear_reg", "linear.json")
            .with_model("kmeans", "/opt/clusters/kmeans.json");

        let artifacts: Vec<(&str, PathBuf)> = config.artifacts().collect();
        assert_eq!(
            artifacts,
            vec![
                ("kmeans", PathBuf::from("/opt/clusters/kmeans.json")),
                ("linear_reg", PathBuf::from("/srv/models/linear.json")),
            ]
        );
        for (name, path) in &artifacts {
            assert_eq!(config.artifact_path(name).as_ref(), Some(path));
        }
    }

    #[test]
    fn test_yaml_defaults() {
        let config = RegistryConfig::from_yaml("models_dir: ./artifacts\n").unwrap();
        assert_eq!(config.models.len(), 5);
        assert_eq!(config.models_dir, PathBuf::from("./artifacts"));
    }

    #[test]
    fn test_builder() {
        let config = RegistryConfig::new("/tmp").with_model("linear_reg", "lr.json");
        assert_eq!(config.model_names(), vec!["linear_reg"]);
    }
}
