//! Predictor trait shared by every model family

use modelserve_core::{Error, Result};
use ndarray::{Array1, ArrayView2};

/// Trait for all loaded models
///
/// Implementations must be immutable after construction so a single
/// instance can serve concurrent requests without locking.
pub trait Predictor: Send + Sync {
    /// Predict one raw value per row of `features`
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>>;

    /// Algorithm name, used in diagnostics (e.g. `LinearRegression`)
    fn algorithm(&self) -> &str;

    /// Number of input columns the model was trained on
    fn n_features(&self) -> usize;
}

/// Reject inputs whose column count differs from the trained dimensionality
pub fn ensure_n_features(
    algorithm: &str,
    expected: usize,
    features: &ArrayView2<'_, f64>,
) -> Result<()> {
    let got = features.ncols();
    if got != expected {
        return Err(Error::prediction(format!(
            "X has {} features, but {} is expecting {} features as input.",
            got, algorithm, expected
        )));
    }
    Ok(())
}
