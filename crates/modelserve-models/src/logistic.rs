//! Logistic regression classifier

use crate::artifact::InvalidArtifact;
use crate::predictor::{ensure_n_features, Predictor};
use modelserve_core::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Fitted logistic regression classifier.
///
/// A binary model carries one coefficient row and two classes; a
/// multiclass (one-vs-rest) model carries one row per class. Predictions
/// are class labels, not probabilities.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Shape: (rows, n_features)
    coef: Array2<f64>,
    intercept: Array1<f64>,
    classes: Vec<f64>,
}

impl LogisticRegression {
    /// Create a classifier from fitted parameters
    pub fn new(
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        classes: Vec<f64>,
    ) -> std::result::Result<Self, InvalidArtifact> {
        let rows = coef.len();
        let n_features = coef.first().map(Vec::len).unwrap_or(0);

        if rows == 0 || n_features == 0 {
            return Err(InvalidArtifact::new("logistic regression has no coefficients"));
        }
        if coef.iter().any(|row| row.len() != n_features) {
            return Err(InvalidArtifact::new(
                "logistic regression coefficient rows differ in length",
            ));
        }
        if intercept.len() != rows {
            return Err(InvalidArtifact::new(format!(
                "logistic regression has {} coefficient rows but {} intercepts",
                rows,
                intercept.len()
            )));
        }

        let expected_classes = if rows == 1 { 2 } else { rows };
        if classes.len() != expected_classes {
            return Err(InvalidArtifact::new(format!(
                "logistic regression with {} coefficient rows needs {} classes, found {}",
                rows,
                expected_classes,
                classes.len()
            )));
        }

        let flat: Vec<f64> = coef.into_iter().flatten().collect();
        if flat.iter().chain(intercept.iter()).any(|v| !v.is_finite()) {
            return Err(InvalidArtifact::new(
                "logistic regression parameters must be finite",
            ));
        }

        let coef = Array2::from_shape_vec((rows, n_features), flat)
            .map_err(|e| InvalidArtifact::new(e.to_string()))?;

        Ok(Self {
            coef,
            intercept: Array1::from(intercept),
            classes,
        })
    }

    /// Raw decision values, shape (n_samples, rows)
    pub fn decision_function(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        ensure_n_features(self.algorithm(), self.n_features(), &features)?;
        Ok(features.dot(&self.coef.t()) + &self.intercept)
    }
}

impl Predictor for LogisticRegression {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let scores = self.decision_function(features)?;

        let labels = scores
            .axis_iter(Axis(0))
            .map(|row| {
                let index = if row.len() == 1 {
                    usize::from(row[0] > 0.0)
                } else {
                    // First maximum wins on ties
                    row.iter()
                        .enumerate()
                        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| {
                            if v > best.1 {
                                (i, v)
                            } else {
                                best
                            }
                        })
                        .0
                };
                self.classes
                    .get(index)
                    .copied()
                    .ok_or_else(|| Error::prediction("decision index outside class list"))
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array1::from(labels))
    }

    fn algorithm(&self) -> &str {
        "LogisticRegression"
    }

    fn n_features(&self) -> usize {
        self.coef.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn binary() -> LogisticRegression {
        LogisticRegression::new(vec![vec![4.0, 3.0]], vec![-1.0], vec![0.0, 1.0]).unwrap()
    }

    #[test]
    fn test_binary_positive_class() {
        let out = binary().predict(array![[0.0, 0.0]].view()).unwrap();
        assert_eq!(out.to_vec(), vec![0.0]);

        let out = binary().predict(array![[0.5, 0.5]].view()).unwrap();
        assert_eq!(out.to_vec(), vec![1.0]);
    }

    #[test]
    fn test_multiclass_argmax() {
        let model = LogisticRegression::new(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
            vec![0.0, 0.0, 0.0],
            vec![3.0, 5.0, 7.0],
        )
        .unwrap();

        let out = model
            .predict(array![[2.0, 1.0], [1.0, 2.0], [-3.0, -3.0]].view())
            .unwrap();
        assert_eq!(out.to_vec(), vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_multiclass_tie_takes_first() {
        let model = LogisticRegression::new(
            vec![vec![1.0], vec![1.0]],
            vec![0.0, 0.0],
            vec![10.0, 20.0],
        )
        .unwrap();

        let out = model.predict(array![[1.0]].view()).unwrap();
        assert_eq!(out.to_vec(), vec![10.0]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(LogisticRegression::new(vec![], vec![], vec![0.0, 1.0]).is_err());
        assert!(LogisticRegression::new(vec![vec![1.0]], vec![], vec![0.0, 1.0]).is_err());
        assert!(LogisticRegression::new(vec![vec![1.0]], vec![0.0], vec![0.0]).is_err());
        assert!(LogisticRegression::new(
            vec![vec![1.0, 2.0], vec![1.0]],
            vec![0.0, 0.0],
            vec![0.0, 1.0]
        )
        .is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(binary().predict(array![[1.0]].view()).is_err());
    }
}
