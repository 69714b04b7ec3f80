//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, predictions by label, errors by
//!   kind, label/probability disagreements, loaded classifier)
//! - Structured JSON logging with tracing

use crate::models::{HabitabilityLabel, PlanetType};
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

struct PredictorMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions: IntCounterVec,
    prediction_errors: IntCounterVec,
    label_disagreements: IntCounter,
    out_of_domain_inputs: IntCounterVec,
    classifier_info: GaugeVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "habitability_prediction_latency_seconds",
                "Time spent encoding features and running the classifier",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions: register_int_counter_vec!(
                "habitability_predictions_total",
                "Predictions served, by predicted label",
                &["label"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors: register_int_counter_vec!(
                "habitability_prediction_errors_total",
                "Failed prediction requests, by error kind",
                &["kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            label_disagreements: register_int_counter!(
                "habitability_label_disagreements_total",
                "Predictions whose label disagrees with the probability under the decision threshold"
            )
            .expect("Failed to register label_disagreements_total"),

            out_of_domain_inputs: register_int_counter_vec!(
                "habitability_out_of_domain_inputs_total",
                "Input values outside the advisory domain, by feature column",
                &["column"]
            )
            .expect("Failed to register out_of_domain_inputs_total"),

            classifier_info: register_gauge_vec!(
                "habitability_classifier_info",
                "Information about the loaded classifier artifact",
                &["backend", "artifact"]
            )
            .expect("Failed to register classifier_info"),
        }
    }
}

/// Prediction metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self, label: HabitabilityLabel) {
        self.inner()
            .predictions
            .with_label_values(&[label.as_str()])
            .inc();
    }

    pub fn inc_prediction_errors(&self, kind: &str) {
        self.inner()
            .prediction_errors
            .with_label_values(&[kind])
            .inc();
    }

    pub fn inc_label_disagreements(&self) {
        self.inner().label_disagreements.inc();
    }

    pub fn inc_out_of_domain(&self, column: &str) {
        self.inner()
            .out_of_domain_inputs
            .with_label_values(&[column])
            .inc();
    }

    pub fn set_classifier_info(&self, backend: &str, artifact: &str) {
        self.inner().classifier_info.reset();
        self.inner()
            .classifier_info
            .with_label_values(&[backend, artifact])
            .set(1.0);
    }

    pub fn predictions_count(&self, label: HabitabilityLabel) -> u64 {
        self.inner()
            .predictions
            .with_label_values(&[label.as_str()])
            .get()
    }

    pub fn prediction_errors_count(&self, kind: &str) -> u64 {
        self.inner()
            .prediction_errors
            .with_label_values(&[kind])
            .get()
    }

    pub fn label_disagreements_count(&self) -> u64 {
        self.inner().label_disagreements.get()
    }
}

/// Structured logger for prediction service events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str, backend: &str) {
        info!(
            event = "server_started",
            instance = %self.instance,
            server_version = %version,
            backend = %backend,
            "Habitability prediction server started"
        );
    }

    pub fn log_classifier_loaded(&self, artifact: &str, backend: &str) {
        info!(
            event = "classifier_loaded",
            instance = %self.instance,
            artifact = %artifact,
            backend = %backend,
            "Classifier artifact loaded"
        );
    }

    pub fn log_prediction(
        &self,
        planet_type: PlanetType,
        label: HabitabilityLabel,
        probability_habitable: f64,
        out_of_domain: &[&str],
        latency_secs: f64,
    ) {
        info!(
            event = "prediction_served",
            instance = %self.instance,
            planet_type = %planet_type,
            label = %label,
            probability_habitable = probability_habitable,
            out_of_domain = ?out_of_domain,
            latency_secs = latency_secs,
            "Served habitability prediction"
        );
    }

    pub fn log_prediction_failure(&self, kind: &str, message: &str) {
        error!(
            event = "prediction_failed",
            instance = %self.instance,
            kind = %kind,
            message = %message,
            "Habitability prediction failed"
        );
    }

    pub fn log_label_disagreement(
        &self,
        label: HabitabilityLabel,
        probability_habitable: f64,
        threshold: f64,
    ) {
        warn!(
            event = "label_probability_disagreement",
            instance = %self.instance,
            label = %label,
            probability_habitable = probability_habitable,
            threshold = threshold,
            "Classifier label and probability disagree; both returned unchanged"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "server_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Habitability prediction server shutting down"
        );
    }
}
