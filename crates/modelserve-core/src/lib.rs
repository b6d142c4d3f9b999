//! modelserve Core
//!
//! Core types and error handling shared across modelserve components.
//!
//! This crate provides:
//! - The error taxonomy separating client-input errors from server faults
//! - Request and result types exchanged with the transport boundary
//! - The single-row feature matrix and its JSON echo format

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{FeatureMatrix, Prediction, PredictionRequest, PredictionResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{FeatureMatrix, Prediction, PredictionRequest, PredictionResult};
}
