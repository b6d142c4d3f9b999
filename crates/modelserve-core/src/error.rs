//! Error types for modelserve

use std::path::PathBuf;

/// Result type alias using modelserve's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for modelserve operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested model name is not in the registry
    #[error("Model '{0}' not found")]
    ModelNotFound(String),

    /// Request carried no `features` field, or it was null
    #[error("Request must contain 'features'")]
    MissingFeatures,

    /// Features could not be reshaped into a single numeric row
    #[error("invalid features: {0}")]
    Shape(String),

    /// Request body was not a usable JSON document
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The predictor rejected or failed on a well-formed input
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// A model artifact could not be turned into a predictor
    #[error("failed to load model '{name}' from {}: {reason}", .path.display())]
    ArtifactLoad {
        name: String,
        path: PathBuf,
        reason: String,
    },

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new model-not-found error
    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound(name.into())
    }

    /// Create a new shape error
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Create a new invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a new prediction failure
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a new artifact load error
    pub fn artifact_load(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ArtifactLoad {
            name: name.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller caused this error with a bad request.
    ///
    /// Everything else is a server-side fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ModelNotFound(_)
                | Self::MissingFeatures
                | Self::Shape(_)
                | Self::InvalidRequest(_)
        )
    }

    /// Short stable identifier, used as a metrics and log label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelNotFound(_) => "model_not_found",
            Self::MissingFeatures => "missing_features",
            Self::Shape(_) => "shape",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Prediction(_) => "prediction",
            Self::ArtifactLoad { .. } => "artifact_load",
            Self::Internal(_) => "internal",
        }
    }
}
