//! On-disk model artifacts
//!
//! Artifacts are JSON documents written by the training pipeline. Each one
//! is tagged with its model family:
//!
//! ```json
//! { "model": "linear_regression", "coef": [1.0, 1.0], "intercept": 0.0 }
//! ```
//!
//! A document with an unknown `model` tag, missing parameters, or
//! inconsistent dimensions is rejected before it can serve a prediction.

use crate::kmeans::KMeans;
use crate::linear::LinearRegression;
use crate::logistic::LogisticRegression;
use crate::predictor::Predictor;
use crate::tree::{DecisionTree, RandomForest, TreeNode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Reason an artifact could not be turned into a predictor
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidArtifact(String);

impl InvalidArtifact {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// Serialized model parameters, tagged by family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ArtifactSpec {
    LinearRegression {
        coef: Vec<f64>,
        intercept: f64,
    },

    LogisticRegression {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        classes: Vec<f64>,
    },

    DecisionTree {
        n_features: usize,
        nodes: Vec<TreeNode>,
    },

    RandomForest {
        n_features: usize,
        trees: Vec<TreeSpec>,
    },

    #[serde(rename = "kmeans")]
    KMeans {
        cluster_centers: Vec<Vec<f64>>,
    },
}

/// One tree inside a random forest artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<TreeNode>,
}

impl ArtifactSpec {
    /// Parse an artifact document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InvalidArtifact> {
        serde_json::from_slice(bytes)
            .map_err(|e| InvalidArtifact::new(format!("malformed artifact: {}", e)))
    }

    /// Family name as written in the `model` tag
    pub fn family(&self) -> &'static str {
        match self {
            Self::LinearRegression { .. } => "linear_regression",
            Self::LogisticRegression { .. } => "logistic_regression",
            Self::DecisionTree { .. } => "decision_tree",
            Self::RandomForest { .. } => "random_forest",
            Self::KMeans { .. } => "kmeans",
        }
    }

    /// Validate parameters and build the predictor
    pub fn into_predictor(self) -> Result<Arc<dyn Predictor>, InvalidArtifact> {
        let predictor: Arc<dyn Predictor> = match self {
            Self::LinearRegression { coef, intercept } => {
                Arc::new(LinearRegression::new(coef, intercept)?)
            }
            Self::LogisticRegression {
                coef,
                intercept,
                classes,
            } => Arc::new(LogisticRegression::new(coef, intercept, classes)?),
            Self::DecisionTree { n_features, nodes } => {
                Arc::new(DecisionTree::new(n_features, nodes)?)
            }
            Self::RandomForest { n_features, trees } => {
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(i, spec)| {
                        DecisionTree::new(n_features, spec.nodes)
                            .map_err(|e| InvalidArtifact::new(format!("tree {}: {}", i, e)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Arc::new(RandomForest::new(n_features, trees)?)
            }
            Self::KMeans { cluster_centers } => Arc::new(KMeans::new(cluster_centers)?),
        };

        Ok(predictor)
    }
}

/// Read, parse, and validate the artifact at `path`
pub fn load_predictor(path: impl AsRef<Path>) -> Result<Arc<dyn Predictor>, InvalidArtifact> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InvalidArtifact::new("artifact file not found"),
        _ => InvalidArtifact::new(format!("cannot read artifact: {}", e)),
    })?;

    ArtifactSpec::from_slice(&bytes)?.into_predictor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_artifact() {
        let spec = ArtifactSpec::from_slice(
            br#"{"model": "linear_regression", "coef": [1.0, 1.0], "intercept": 0.0}"#,
        )
        .unwrap();
        assert_eq!(spec.family(), "linear_regression");

        let predictor = spec.into_predictor().unwrap();
        assert_eq!(predictor.algorithm(), "LinearRegression");
        assert_eq!(predictor.n_features(), 2);

        let out = predictor.predict(array![[1.0, 2.0]].view()).unwrap();
        assert_eq!(out.to_vec(), vec![3.0]);
    }

    #[test]
    fn test_forest_artifact() {
        let json = r#"{
            "model": "random_forest",
            "n_features": 1,
            "trees": [
                {"nodes": [{"value": 2.0}]},
                {"nodes": [{"feature": 0, "threshold": 0.0, "left": 1, "right": 2}, {"value": 0.0}, {"value": 4.0}]}
            ]
        }"#;

        let predictor = ArtifactSpec::from_slice(json.as_bytes())
            .unwrap()
            .into_predictor()
            .unwrap();
        let out = predictor.predict(array![[1.0]].view()).unwrap();
        assert_eq!(out.to_vec(), vec![3.0]);
    }

    #[test]
    fn test_kmeans_tag() {
        let spec = ArtifactSpec::from_slice(
            br#"{"model": "kmeans", "cluster_centers": [[0.0], [1.0]]}"#,
        )
        .unwrap();
        assert_eq!(spec.family(), "kmeans");
        assert!(spec.into_predictor().is_ok());
    }

    #[test]
    fn test_unknown_family() {
        let err = ArtifactSpec::from_slice(br#"{"model": "svm", "support_vectors": []}"#)
            .unwrap_err();
        assert!(err.reason().starts_with("malformed artifact"));
    }

    #[test]
    fn test_corrupt_bytes() {
        assert!(ArtifactSpec::from_slice(b"\x80\x04\x95pickle").is_err());
        assert!(ArtifactSpec::from_slice(br#"{"model": "linear_regression"}"#).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        let err = ArtifactSpec::from_slice(
            br#"{"model": "random_forest", "n_features": 1, "trees": [{"nodes": []}]}"#,
        )
        .unwrap()
        .into_predictor()
        .err()
        .unwrap();
        assert_eq!(err.reason(), "tree 0: decision tree has no nodes");
    }

    #[test]
    fn test_missing_file() {
        let err = load_predictor("/nonexistent/modelserve/artifact.json").err().unwrap();
        assert_eq!(err.reason(), "artifact file not found");
    }
}
