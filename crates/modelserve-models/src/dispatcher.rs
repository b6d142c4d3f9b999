//! Prediction dispatch: request validation, model invocation, normalization

use crate::registry::{ModelEntry, SharedRegistry};
use modelserve_core::{Error, FeatureMatrix, PredictionRequest, PredictionResult, Result};
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Routes feature vectors to registered models.
///
/// Holds no per-call state; cloning is cheap and every clone shares the
/// same registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: SharedRegistry,
}

impl Dispatcher {
    /// Create a dispatcher over a fully loaded registry
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// Get reference to the registry
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Dispatch a transport-level request
    pub fn dispatch(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        self.predict(&request.model_name, request.features.as_ref())
    }

    /// Run one prediction.
    ///
    /// Checks run in order: model lookup, feature presence, reshaping. Only
    /// then is the model invoked, and its single output normalized by the
    /// model's output kind.
    pub fn predict(&self, model_name: &str, raw_features: Option<&Value>) -> Result<PredictionResult> {
        let entry = self
            .registry
            .lookup(model_name)
            .ok_or_else(|| Error::model_not_found(model_name))?;

        let raw_features = match raw_features {
            Some(value) if !value.is_null() => value,
            _ => return Err(Error::MissingFeatures),
        };

        let features = FeatureMatrix::from_json(raw_features)?;
        let raw = invoke(entry, &features)?;
        let prediction = entry.output_kind().normalize(raw)?;

        debug!(
            "Model {} predicted {:?} ({})",
            model_name,
            prediction,
            entry.output_kind()
        );

        Ok(PredictionResult {
            model_name: model_name.to_string(),
            features,
            prediction,
        })
    }
}

/// Call the predictor, turning every failure into a prediction error
fn invoke(entry: &ModelEntry, features: &FeatureMatrix) -> Result<f64> {
    let predictor = entry.predictor();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| predictor.predict(features.view())));

    let output = match outcome {
        Ok(Ok(output)) => output,
        Ok(Err(Error::Prediction(msg))) => return Err(Error::Prediction(msg)),
        Ok(Err(other)) => return Err(Error::prediction(other.to_string())),
        Err(payload) => {
            return Err(Error::prediction(format!(
                "{} panicked: {}",
                predictor.algorithm(),
                panic_message(payload.as_ref())
            )))
        }
    };

    if output.len() != 1 {
        return Err(Error::prediction(format!(
            "expected 1 prediction for a single row, got {}",
            output.len()
        )));
    }

    Ok(output[0])
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmeans::KMeans;
    use crate::linear::LinearRegression;
    use crate::logistic::LogisticRegression;
    use crate::registry::ModelRegistry;
    use modelserve_core::Prediction;
    use serde_json::json;
    use std::sync::Arc;

    fn dispatcher() -> Dispatcher {
        let registry = ModelRegistry::from_entries([
            ModelEntry::new(
                "linear_reg",
                Arc::new(LinearRegression::new(vec![1.0, 1.0], 0.0).unwrap()),
            ),
            ModelEntry::new(
                "logistic_reg",
                Arc::new(
                    LogisticRegression::new(vec![vec![10.0, 10.0]], vec![-1.0], vec![0.0, 1.0])
                        .unwrap(),
                ),
            ),
            ModelEntry::new(
                "kmeans",
                Arc::new(
                    KMeans::new(vec![vec![0.0, 0.0], vec![10.0, 10.0], vec![5.0, 5.0]]).unwrap(),
                ),
            ),
        ]);
        Dispatcher::new(Arc::new(registry))
    }

    #[test]
    fn test_scenarios() {
        let d = dispatcher();

        let result = d.predict("linear_reg", Some(&json!([1.0, 2.0]))).unwrap();
        assert_eq!(result.model_name, "linear_reg");
        assert_eq!(result.prediction, Prediction::Float(3.0));

        let result = d.predict("logistic_reg", Some(&json!([0.1, 0.2]))).unwrap();
        assert_eq!(result.prediction, Prediction::Integer(1));

        let result = d.predict("kmeans", Some(&json!([5.0, 5.0]))).unwrap();
        assert_eq!(result.prediction, Prediction::Integer(2));
    }

    #[test]
    fn test_lookup_precedes_validation() {
        let err = dispatcher().predict("svm", None).unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(name) if name == "svm"));
    }

    #[test]
    fn test_null_features() {
        let err = dispatcher().predict("kmeans", Some(&Value::Null)).unwrap_err();
        assert!(matches!(err, Error::MissingFeatures));
    }

    #[test]
    fn test_dispatch_request() {
        let request = PredictionRequest::new("linear_reg", Some(json!([2, 2])));
        let result = dispatcher().dispatch(&request).unwrap();
        assert_eq!(result.features.row().to_vec(), vec![2.0, 2.0]);
        assert_eq!(result.prediction, Prediction::Float(4.0));
    }

    #[test]
    fn test_wrong_arity_is_server_fault() {
        let err = dispatcher()
            .predict("linear_reg", Some(&json!([1.0, 2.0, 3.0])))
            .unwrap_err();
        assert!(matches!(err, Error::Prediction(_)));
        assert!(!err.is_client_error());
    }
}
