//! Logistic regression classifier loaded from a JSON artifact

use super::{check_arity, Classifier, ClassifierBackend};
use crate::encoder::{FEATURE_COLUMNS, FEATURE_COUNT};
use crate::error::Result;
use serde::{Deserialize, Serialize};

const MODEL_TYPE: &str = "logistic_regression";

/// Serialized form of a fitted binary logistic regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionArtifact {
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Binary logistic regression over the 11 training features
#[derive(Debug, Clone)]
pub struct LogisticRegressionClassifier {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticRegressionClassifier {
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Parse and validate a JSON artifact
    pub fn from_json(bytes: &[u8]) -> std::result::Result<Self, String> {
        let artifact: LogisticRegressionArtifact =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid artifact JSON: {}", e))?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: LogisticRegressionArtifact) -> std::result::Result<Self, String> {
        if artifact.model_type != MODEL_TYPE {
            return Err(format!(
                "unsupported model_type '{}', expected '{}'",
                artifact.model_type, MODEL_TYPE
            ));
        }
        if artifact.feature_names != FEATURE_COLUMNS {
            return Err(format!(
                "artifact feature_names {:?} do not match training columns {:?}",
                artifact.feature_names, FEATURE_COLUMNS
            ));
        }
        let coefficients: [f64; FEATURE_COUNT] =
            artifact.coefficients.as_slice().try_into().map_err(|_| {
                format!(
                    "expected {} coefficients, got {}",
                    FEATURE_COUNT,
                    artifact.coefficients.len()
                )
            })?;
        if coefficients.iter().any(|c| !c.is_finite()) || !artifact.intercept.is_finite() {
            return Err("artifact contains non-finite weights".to_string());
        }
        Ok(Self::new(coefficients, artifact.intercept))
    }

    /// Signed distance to the separating hyperplane
    pub fn decision_function(&self, features: &[f64]) -> Result<f64> {
        check_arity(features)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }
}

impl Classifier for LogisticRegressionClassifier {
    fn predict_class(&self, features: &[f64]) -> Result<u8> {
        // Positive class only when strictly past the boundary.
        let z = self.decision_function(features)?;
        Ok(u8::from(z > 0.0))
    }

    fn predict_probabilities(&self, features: &[f64]) -> Result<[f64; 2]> {
        let p = sigmoid(self.decision_function(features)?);
        Ok([1.0 - p, p])
    }

    fn backend(&self) -> ClassifierBackend {
        ClassifierBackend::LogisticRegression
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> LogisticRegressionArtifact {
        LogisticRegressionArtifact {
            model_type: MODEL_TYPE.to_string(),
            feature_names: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            coefficients: vec![0.0; FEATURE_COUNT],
            intercept: 0.0,
        }
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(50.0) > 0.999);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
    }

    #[test]
    fn test_rejects_reordered_feature_names() {
        let mut a = artifact();
        a.feature_names.swap(5, 10);
        let err = LogisticRegressionClassifier::from_artifact(a).unwrap_err();
        assert!(err.contains("do not match"), "error was {}", err);
    }

    #[test]
    fn test_rejects_wrong_coefficient_count() {
        let mut a = artifact();
        a.coefficients.pop();
        assert!(LogisticRegressionClassifier::from_artifact(a).is_err());
    }

    #[test]
    fn test_rejects_unknown_model_type() {
        let mut a = artifact();
        a.model_type = "xgboost".to_string();
        assert!(LogisticRegressionClassifier::from_artifact(a).is_err());
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        let mut a = artifact();
        a.intercept = f64::NAN;
        assert!(LogisticRegressionClassifier::from_artifact(a).is_err());
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[1] = 0.02;
        weights[10] = 1.5;
        let clf = LogisticRegressionClassifier::new(weights, -6.0);
        let features = [3.9, 268.1, 0.85, 1.72, 5.61, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let [p0, p1] = clf.predict_probabilities(&features).unwrap();
        assert!((p0 + p1 - 1.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&p1));
    }

    #[test]
    fn test_class_agrees_with_probability_off_boundary() {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[0] = 1.0;
        let clf = LogisticRegressionClassifier::new(weights, -4.0);

        let mut above = [0.0; FEATURE_COUNT];
        above[0] = 6.0;
        assert_eq!(clf.predict_class(&above).unwrap(), 1);
        assert!(clf.predict_probabilities(&above).unwrap()[1] > 0.5);

        let mut below = [0.0; FEATURE_COUNT];
        below[0] = 2.0;
        assert_eq!(clf.predict_class(&below).unwrap(), 0);
        assert!(clf.predict_probabilities(&below).unwrap()[1] < 0.5);
    }

    #[test]
    fn test_boundary_tie_maps_to_negative_class() {
        let clf = LogisticRegressionClassifier::new([0.0; FEATURE_COUNT], 0.0);
        let features = [0.0; FEATURE_COUNT];
        assert_eq!(clf.predict_class(&features).unwrap(), 0);
        assert_eq!(clf.predict_probabilities(&features).unwrap()[1], 0.5);
    }

    #[test]
    fn test_wrong_arity_is_inference_error() {
        let clf = LogisticRegressionClassifier::new([0.0; FEATURE_COUNT], 0.0);
        let err = clf.predict_class(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err.kind(), "inference_error");
        assert!(clf.predict_probabilities(&[0.0; 12]).is_err());
    }
}
