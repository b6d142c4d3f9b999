//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        DefaultBodyLimit, Path, State,
    },
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use modelserve_core::{Error, PredictionResult};
use serde_json::{json, Value};
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::landing::landing_page;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/", get(landing_page))
        .route("/health", get(health_check))
        .route("/models", get(list_models))
        .route("/metrics", get(metrics))
        .route(
            "/predict/:model_name",
            post(predict).fallback(method_not_allowed),
        )
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "models": state.registry().len(),
    }))
}

async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry().describe())
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

async fn fallback() -> AppError {
    AppError::NotFound
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// `POST /predict/:model_name`
///
/// The model name is checked before the body so an unknown model always
/// answers with "not found", whatever the payload.
async fn predict(
    State(state): State<AppState>,
    model_name: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictionResult>, AppError> {
    let Path(model_name) = model_name.map_err(|rejection| {
        warn!("Rejected model path: {}", rejection.body_text());
        AppError::Rejected(rejection.status(), rejection.body_text())
    })?;

    let request_id = Uuid::new_v4();
    info_span!("predict", %request_id, model = %model_name)
        .in_scope(|| handle_predict(&state, &model_name, body))
        .map(Json)
}

fn handle_predict(
    state: &AppState,
    model_name: &str,
    body: Result<Bytes, BytesRejection>,
) -> Result<PredictionResult, AppError> {
    // Unknown names share one label
    let known = state.registry().has_model(model_name);
    let model_label = if known {
        model_name.to_string()
    } else {
        "unknown".to_string()
    };
    metrics::counter!("modelserve_requests_total", "model" => model_label.clone()).increment(1);

    let start = Instant::now();
    let outcome = run_prediction(state, model_name, known, body);
    let elapsed_us = start.elapsed().as_micros() as f64;

    let outcome_label = match &outcome {
        Ok(_) => "ok",
        Err(err) if err.status().is_server_error() => "server_error",
        Err(_) => "client_error",
    };
    metrics::counter!(
        "modelserve_predictions_total",
        "model" => model_label.clone(),
        "outcome" => outcome_label
    )
    .increment(1);

    match &outcome {
        Ok(_) => {
            metrics::histogram!("modelserve_prediction_latency_us", "model" => model_label)
                .record(elapsed_us);
        }
        Err(err) if err.status().is_server_error() => {
            error!("Prediction failed: {}", err.message());
        }
        Err(err) => {
            warn!("Request rejected ({}): {}", err.status(), err.message());
        }
    }

    outcome
}

fn run_prediction(
    state: &AppState,
    model_name: &str,
    known: bool,
    body: Result<Bytes, BytesRejection>,
) -> Result<PredictionResult, AppError> {
    if !known {
        return Err(Error::model_not_found(model_name).into());
    }

    let body = body.map_err(|rejection| {
        AppError::Rejected(rejection.status(), rejection.body_text())
    })?;
    let features = parse_features(&body)?;

    Ok(state.dispatcher.predict(model_name, features.as_ref())?)
}

/// Pull the `features` member out of a request body.
///
/// An empty body is treated like an object without `features`.
fn parse_features(body: &[u8]) -> Result<Option<Value>, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::invalid_request(format!("body is not valid JSON: {}", e)))?;

    match value {
        Value::Object(mut map) => Ok(map.remove("features")),
        _ => Err(Error::invalid_request("body must be a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_features_present() {
        let features = parse_features(br#"{"features": [1.0, 2.0]}"#).unwrap();
        assert_eq!(features, Some(json!([1.0, 2.0])));
    }

    #[test]
    fn test_parse_features_absent() {
        assert_eq!(parse_features(br#"{"other": 1}"#).unwrap(), None);
        assert_eq!(parse_features(b"").unwrap(), None);
        assert_eq!(parse_features(b"  \n").unwrap(), None);
    }

    #[test]
    fn test_parse_features_null_kept() {
        assert_eq!(
            parse_features(br#"{"features": null}"#).unwrap(),
            Some(Value::Null)
        );
    }

    #[test]
    fn test_parse_features_invalid() {
        assert!(matches!(
            parse_features(b"{not json"),
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            parse_features(b"[1.0, 2.0]"),
            Err(Error::InvalidRequest(_))
        ));
    }
}
