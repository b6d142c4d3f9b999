//! Core types for modelserve

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A prediction request as handed over by the transport boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Logical model name (e.g. `linear_reg`)
    pub model_name: String,

    /// Raw feature payload; `None` when absent or `null`
    #[serde(default)]
    pub features: Option<Value>,
}

impl PredictionRequest {
    /// Create a new request
    pub fn new(model_name: impl Into<String>, features: Option<Value>) -> Self {
        Self {
            model_name: model_name.into(),
            features,
        }
    }
}

/// Normalized prediction value
///
/// Serialized untagged, so a continuous prediction is a JSON float, a class
/// or cluster label is a JSON integer, and the fallback is a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prediction {
    /// Regression output
    Float(f64),
    /// Class label or cluster index
    Integer(i64),
    /// Textual rendering for models without a declared output kind
    Text(String),
}

impl Prediction {
    /// Check if the prediction is numeric
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

/// Result of a single dispatched prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    /// Model that produced the prediction
    pub model_name: String,

    /// The reshaped input, echoed back as `[[f1, ..., fN]]`
    pub features: FeatureMatrix,

    /// Normalized prediction
    pub prediction: Prediction,
}

/// Single-row feature matrix (1 x N)
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix(Array2<f64>);

impl FeatureMatrix {
    /// Reshape a raw JSON payload into a 1 x N matrix.
    ///
    /// Only a non-empty, flat array of JSON numbers is accepted.
    pub fn from_json(value: &Value) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| Error::shape("features must be a sequence of numbers"))?;

        let mut row = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let number = match item {
                Value::Number(n) => n.as_f64(),
                Value::Array(_) => {
                    return Err(Error::shape(format!(
                        "features must be a flat sequence, found nested array at index {}",
                        index
                    )))
                }
                _ => None,
            };

            match number {
                Some(v) => row.push(v),
                None => {
                    return Err(Error::shape(format!(
                        "feature at index {} is not numeric: {}",
                        index, item
                    )))
                }
            }
        }

        Self::from_row(row)
    }

    /// Build a 1 x N matrix from a row of values
    pub fn from_row(row: Vec<f64>) -> Result<Self> {
        if row.is_empty() {
            return Err(Error::shape("features must not be empty"));
        }

        let n = row.len();
        Array2::from_shape_vec((1, n), row)
            .map(Self)
            .map_err(|e| Error::internal(format!("failed to reshape features: {}", e)))
    }

    /// Number of columns
    pub fn n_features(&self) -> usize {
        self.0.ncols()
    }

    /// Borrow as an ndarray view
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }

    /// Borrow the single row
    pub fn row(&self) -> ArrayView1<'_, f64> {
        self.0.row(0)
    }
}

impl Serialize for FeatureMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.rows().into_iter().map(|row| row.to_vec()))
    }
}
