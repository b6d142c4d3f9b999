//! modelserve Models
//!
//! In-memory predictors and the dispatch logic that routes feature vectors
//! to them by logical name.
//!
//! Models are loaded once at startup from JSON artifacts produced by an
//! external training pipeline:
//! - Regressors: linear regression, decision tree, random forest
//! - Classifiers: logistic regression
//! - Clustering: k-means
//!
//! After loading, the registry is read-only and can be shared freely
//! across request handlers.

pub mod artifact;
pub mod config;
pub mod dispatcher;
pub mod kmeans;
pub mod linear;
pub mod logistic;
pub mod output_kind;
pub mod predictor;
pub mod registry;
pub mod tree;

pub use artifact::{load_predictor, ArtifactSpec, InvalidArtifact};
pub use config::RegistryConfig;
pub use dispatcher::Dispatcher;
pub use output_kind::OutputKind;
pub use predictor::Predictor;
pub use registry::{ModelEntry, ModelInfo, ModelRegistry, SharedRegistry};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dispatcher::Dispatcher;
    pub use crate::kmeans::KMeans;
    pub use crate::linear::LinearRegression;
    pub use crate::logistic::LogisticRegression;
    pub use crate::output_kind::OutputKind;
    pub use crate::predictor::Predictor;
    pub use crate::registry::{ModelEntry, ModelRegistry};
    pub use crate::tree::{DecisionTree, RandomForest, TreeNode};
}
