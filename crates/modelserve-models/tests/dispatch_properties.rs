//! Property tests for dispatch invariants

use modelserve_core::Error;
use modelserve_models::prelude::*;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn dispatcher() -> Dispatcher {
    let registry = ModelRegistry::from_entries([
        ModelEntry::new(
            "linear_reg",
            Arc::new(LinearRegression::new(vec![0.5, -2.0, 1.0], 0.25).unwrap()),
        ),
        ModelEntry::new(
            "kmeans",
            Arc::new(
                KMeans::new(vec![
                    vec![0.0, 0.0, 0.0],
                    vec![100.0, 100.0, 100.0],
                    vec![-100.0, 50.0, 0.0],
                ])
                .unwrap(),
            ),
        ),
        ModelEntry::new(
            "logistic_reg",
            Arc::new(
                LogisticRegression::new(vec![vec![1.0, 1.0, -1.0]], vec![0.0], vec![0.0, 1.0])
                    .unwrap(),
            ),
        ),
    ]);
    Dispatcher::new(Arc::new(registry))
}

fn features(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6..1.0e6f64, len)
}

proptest! {
    #[test]
    fn registered_models_echo_name_and_predict_numbers(
        name in prop::sample::select(vec!["linear_reg", "kmeans", "logistic_reg"]),
        row in features(3),
    ) {
        let result = dispatcher().predict(name, Some(&json!(row))).unwrap();

        prop_assert_eq!(&result.model_name, name);
        prop_assert!(result.prediction.is_numeric());
        prop_assert_eq!(result.features.row().to_vec(), row);
    }

    #[test]
    fn unknown_models_are_not_found(
        name in "[a-z_]{1,16}",
        payload in prop_oneof![
            Just(Value::Null),
            features(3).prop_map(|row| json!(row)),
            Just(json!(["a", "b"])),
        ],
    ) {
        prop_assume!(!["linear_reg", "kmeans", "logistic_reg"].contains(&name.as_str()));

        let err = dispatcher().predict(&name, Some(&payload)).unwrap_err();
        prop_assert!(matches!(err, Error::ModelNotFound(_)));
    }

    #[test]
    fn predictions_are_deterministic(
        name in prop::sample::select(vec!["linear_reg", "kmeans", "logistic_reg"]),
        row in features(3),
    ) {
        let d = dispatcher();
        let first = d.predict(name, Some(&json!(row))).unwrap();
        let second = d.predict(name, Some(&json!(row))).unwrap();

        prop_assert_eq!(first.prediction, second.prediction);
    }

    #[test]
    fn non_numeric_features_are_shape_errors(
        words in prop::collection::vec("[a-z]{1,8}", 1..6),
    ) {
        let err = dispatcher().predict("linear_reg", Some(&json!(words))).unwrap_err();
        prop_assert!(matches!(err, Error::Shape(_)));
    }
}
