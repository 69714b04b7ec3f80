//! HTTP API for predictions, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use habitability_core::{
    health::{components, HealthRegistry},
    EncodedFeatureVector, FieldDomain, HabitabilityPredictor, PlanetType, PredictionResult,
    PredictorError, PredictorMetrics, RawInputRecord, StructuredLogger, FEATURE_COLUMNS,
    FIELD_DOMAINS,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<HabitabilityPredictor>,
    pub health_registry: HealthRegistry,
    pub metrics: PredictorMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        predictor: Arc<HabitabilityPredictor>,
        health_registry: HealthRegistry,
        metrics: PredictorMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            predictor,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Successful prediction response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: PredictionResult,
    pub features: EncodedFeatureVector,
    pub out_of_domain: Vec<&'static str>,
    pub generated_at: i64,
}

/// Error body returned for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

/// Feature layout and advisory input domains
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub columns: &'static [&'static str],
    pub planet_types: Vec<&'static str>,
    pub domains: &'static [FieldDomain],
}

/// Wrapper mapping core errors onto HTTP responses
pub struct ApiError(PredictorError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PredictorError::ArtifactLoad { .. } => StatusCode::SERVICE_UNAVAILABLE,
            PredictorError::SchemaMismatch { .. } | PredictorError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// Encode the record, classify it and report label + probability
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(record): Json<RawInputRecord>,
) -> Result<Json<PredictResponse>, ApiError> {
    let start = Instant::now();
    let out_of_domain: Vec<&'static str> =
        record.out_of_domain().iter().map(|d| d.column).collect();
    for column in &out_of_domain {
        state.metrics.inc_out_of_domain(column);
    }

    let (features, prediction) = match state.predictor.predict_with_features(&record) {
        Ok(output) => output,
        Err(e) => {
            state.metrics.inc_prediction_errors(e.kind());
            state.logger.log_prediction_failure(e.kind(), &e.to_string());
            if matches!(e, PredictorError::SchemaMismatch { .. }) {
                state
                    .health_registry
                    .set_unhealthy(components::ENCODER, e.to_string())
                    .await;
            }
            return Err(ApiError(e));
        }
    };

    let elapsed = start.elapsed().as_secs_f64();
    state.metrics.observe_prediction_latency(elapsed);
    state.metrics.inc_predictions(prediction.label);

    let service = state.predictor.service();
    if !service.is_consistent(&prediction) {
        state.metrics.inc_label_disagreements();
        state.logger.log_label_disagreement(
            prediction.label,
            prediction.probability_habitable,
            service.decision_threshold(),
        );
        state
            .health_registry
            .set_degraded(
                components::CLASSIFIER,
                "Label and probability outputs disagree under the decision threshold",
            )
            .await;
    }

    state.logger.log_prediction(
        record.planet_type,
        prediction.label,
        prediction.probability_habitable,
        &out_of_domain,
        elapsed,
    );

    Ok(Json(PredictResponse {
        prediction,
        features,
        out_of_domain,
        generated_at: chrono::Utc::now().timestamp(),
    }))
}

async fn schema() -> Json<SchemaResponse> {
    Json(SchemaResponse {
        columns: &FEATURE_COLUMNS,
        planet_types: PlanetType::FORM_ORDER.iter().map(|t| t.name()).collect(),
        domains: &FIELD_DOMAINS,
    })
}

/// Health check response - returns 200 while operational, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = if health.status.is_operational() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            e.to_string().into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/schema", get(schema))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server and run until the shutdown future resolves
pub async fn serve<F>(port: u16, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
