//! Core library for exoplanet habitability prediction
//!
//! This crate provides the core functionality for:
//! - Encoding raw planetary and stellar parameters into the classifier's
//!   training-time feature layout
//! - Loading a frozen binary classifier artifact (logistic regression JSON
//!   or ONNX via tract)
//! - Serving label + probability predictions
//! - Health checks and observability

pub mod classifier;
pub mod encoder;
pub mod error;
pub mod health;
pub mod inference;
pub mod models;
pub mod observability;

mod predictor;

pub use classifier::{load_classifier, Classifier, ClassifierBackend};
pub use encoder::{FeatureEncoder, FEATURE_COLUMNS, FEATURE_COUNT};
pub use error::{PredictorError, Result};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use inference::{
    ClassifierHandle, InferenceService, ServiceState, DEFAULT_DECISION_THRESHOLD,
};
pub use models::*;
pub use observability::{PredictorMetrics, StructuredLogger};
pub use predictor::HabitabilityPredictor;
