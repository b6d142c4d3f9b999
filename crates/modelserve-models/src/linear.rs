//! Ordinary least squares regressor

use crate::artifact::InvalidArtifact;
use crate::predictor::{ensure_n_features, Predictor};
use modelserve_core::Result;
use ndarray::{Array1, ArrayView2};

/// Fitted linear regression: `y = x . coef + intercept`
#[derive(Debug, Clone)]
pub struct LinearRegression {
    coef: Array1<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Create a regressor from fitted parameters
    pub fn new(coef: Vec<f64>, intercept: f64) -> std::result::Result<Self, InvalidArtifact> {
        if coef.is_empty() {
            return Err(InvalidArtifact::new("linear regression has no coefficients"));
        }
        if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
            return Err(InvalidArtifact::new(
                "linear regression parameters must be finite",
            ));
        }

        Ok(Self {
            coef: Array1::from(coef),
            intercept,
        })
    }
}

impl Predictor for LinearRegression {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        ensure_n_features(self.algorithm(), self.n_features(), &features)?;
        Ok(features.dot(&self.coef) + self.intercept)
    }

    fn algorithm(&self) -> &str {
        "LinearRegression"
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }
}
