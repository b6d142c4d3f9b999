//! Model registry initialization and lookup

use crate::artifact::load_predictor;
use crate::config::RegistryConfig;
use crate::output_kind::OutputKind;
use crate::predictor::Predictor;
use modelserve_core::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Shared registry for application-wide use
pub type SharedRegistry = Arc<ModelRegistry>;

/// A loaded model and the policy used to interpret its output
#[derive(Clone)]
pub struct ModelEntry {
    name: String,
    predictor: Arc<dyn Predictor>,
    output_kind: OutputKind,
    artifact_path: Option<PathBuf>,
}

impl ModelEntry {
    /// Create an entry; the output kind comes from the static policy table
    pub fn new(name: impl Into<String>, predictor: Arc<dyn Predictor>) -> Self {
        let name = name.into();
        let output_kind = OutputKind::for_model(&name);
        Self {
            name,
            predictor,
            output_kind,
            artifact_path: None,
        }
    }

    /// Record the artifact this entry was loaded from
    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    pub fn output_kind(&self) -> OutputKind {
        self.output_kind
    }

    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact_path.as_deref()
    }

    /// Summary for listings
    pub fn describe(&self) -> ModelInfo {
        ModelInfo {
            name: self.name.clone(),
            kind: self.output_kind,
            algorithm: self.predictor.algorithm().to_string(),
            n_features: self.predictor.n_features(),
            artifact: self.artifact_path.clone(),
        }
    }
}

impl std::fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEntry")
            .field("name", &self.name)
            .field("algorithm", &self.predictor.algorithm())
            .field("output_kind", &self.output_kind)
            .field("artifact_path", &self.artifact_path)
            .finish()
    }
}

/// Public description of a registered model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub kind: OutputKind,
    pub algorithm: String,
    pub n_features: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
}

/// Registry of loaded models, keyed by logical name.
///
/// Built once at startup and read-only afterwards; wrap it in an `Arc` to
/// share it between request handlers.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelEntry>,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every configured model.
    ///
    /// All-or-nothing: the first artifact that fails to load aborts the
    /// whole registry.
    pub fn load(config: &RegistryConfig) -> Result<Self> {
        info!("Initializing model registry with {} models", config.models.len());

        let mut registry = Self::new();
        for (name, path) in config.artifacts() {
            info!("Loading model: {} from {}", name, path.display());
            let predictor = load_predictor(&path).map_err(|e| {
                error!("Failed to load model {}: {}", name, e);
                Error::artifact_load(name, &path, e.reason())
            })?;

            let entry = ModelEntry::new(name, predictor).with_artifact_path(&path);
            info!(
                "Loaded model: {} ({}, {} features, {})",
                name,
                entry.predictor().algorithm(),
                entry.predictor().n_features(),
                entry.output_kind()
            );
            registry.register(entry);
        }

        info!("Model registry initialized with {} models", registry.len());
        Ok(registry)
    }

    /// Build a registry from ready-made entries
    pub fn from_entries(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry.register(entry);
        }
        registry
    }

    /// Register an entry, replacing any previous entry with the same name
    pub fn register(&mut self, entry: ModelEntry) {
        self.models.insert(entry.name.clone(), entry);
    }

    /// Get a model by name
    pub fn lookup(&self, name: &str) -> Option<&ModelEntry> {
        self.models.get(name)
    }

    /// Check if a model is registered
    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered model names, sorted
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    /// Entries sorted by name
    pub fn entries(&self) -> Vec<&ModelEntry> {
        let mut entries: Vec<&ModelEntry> = self.models.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Descriptions of all models, sorted by name
    pub fn describe(&self) -> Vec<ModelInfo> {
        self.entries().into_iter().map(ModelEntry::describe).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
