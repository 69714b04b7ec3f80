//! Single entry point composing the encoder and the inference service

use crate::classifier::Classifier;
use crate::encoder::FeatureEncoder;
use crate::error::Result;
use crate::inference::{ClassifierHandle, InferenceService};
use crate::models::{EncodedFeatureVector, PredictionResult, RawInputRecord};
use std::path::Path;
use std::sync::Arc;

/// Raw input in, label and probability out
pub struct HabitabilityPredictor {
    encoder: FeatureEncoder,
    service: InferenceService,
}

impl HabitabilityPredictor {
    pub fn new(service: InferenceService) -> Self {
        Self {
            encoder: FeatureEncoder::new(),
            service,
        }
    }

    pub fn from_classifier(classifier: Arc<dyn Classifier>) -> Self {
        Self::new(InferenceService::from_classifier(classifier))
    }

    /// Load the classifier artifact; any failure here is fatal for a server
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> Result<Self> {
        let handle = ClassifierHandle::new();
        handle.load(path, expected_sha256)?;
        Ok(Self::new(InferenceService::new(handle)))
    }

    pub fn with_decision_threshold(self, threshold: f64) -> Self {
        Self {
            encoder: self.encoder,
            service: self.service.with_decision_threshold(threshold),
        }
    }

    pub fn service(&self) -> &InferenceService {
        &self.service
    }

    pub fn encode(&self, record: &RawInputRecord) -> Result<EncodedFeatureVector> {
        self.encoder.encode(record)
    }

    pub fn predict(&self, record: &RawInputRecord) -> Result<PredictionResult> {
        self.predict_with_features(record).map(|(_, result)| result)
    }

    /// Predict and also return the encoded vector the classifier saw
    pub fn predict_with_features(
        &self,
        record: &RawInputRecord,
    ) -> Result<(EncodedFeatureVector, PredictionResult)> {
        let vector = self.encoder.encode(record)?;
        let result = self.service.classify(&vector)?;
        Ok((vector, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LogisticRegressionClassifier;
    use crate::encoder::{FEATURE_COLUMNS, FEATURE_COUNT};
    use crate::models::{HabitabilityLabel, PlanetType};
    use std::io::Write;

    fn terran_favoring_weights() -> [f64; FEATURE_COUNT] {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[5] = -4.0; // Jovian
        weights[10] = 4.0; // Terran
        weights
    }

    #[test]
    fn test_predict_end_to_end() {
        let predictor = HabitabilityPredictor::from_classifier(Arc::new(
            LogisticRegressionClassifier::new(terran_favoring_weights(), 0.0),
        ));

        let terran = RawInputRecord {
            planet_type: PlanetType::Terran,
            ..RawInputRecord::default()
        };
        let result = predictor.predict(&terran).unwrap();
        assert_eq!(result.label, HabitabilityLabel::Habitable);
        assert!(result.probability_habitable > 0.9);

        let jovian = RawInputRecord::default();
        let result = predictor.predict(&jovian).unwrap();
        assert_eq!(result.label, HabitabilityLabel::NonHabitable);
        assert!(result.probability_habitable < 0.1);
    }

    #[test]
    fn test_predict_with_features_returns_encoded_vector() {
        let predictor = HabitabilityPredictor::from_classifier(Arc::new(
            LogisticRegressionClassifier::new(terran_favoring_weights(), 0.0),
        ));
        let record = RawInputRecord {
            star_age_gyr: 3.9,
            surface_temp_k: 268.1,
            planetary_flux: 0.85,
            planet_radius_earth: 1.72,
            planet_mass_earth: 5.61,
            planet_type: PlanetType::Terran,
        };
        let (vector, _) = predictor.predict_with_features(&record).unwrap();
        assert_eq!(
            vector.values(),
            &[3.9, 268.1, 0.85, 1.72, 5.61, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_load_missing_artifact_is_fatal_error() {
        let err = HabitabilityPredictor::load(Path::new("/does/not/exist.json"), None)
            .err()
            .unwrap();
        assert_eq!(err.kind(), "artifact_load_error");
    }

    #[test]
    fn test_load_from_artifact_file() {
        let artifact = serde_json::json!({
            "model_type": "logistic_regression",
            "feature_names": FEATURE_COLUMNS,
            "coefficients": terran_favoring_weights(),
            "intercept": 0.0
        });
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(artifact.to_string().as_bytes()).unwrap();
        file.flush().unwrap();

        let predictor = HabitabilityPredictor::load(file.path(), None).unwrap();
        let result = predictor
            .predict(&RawInputRecord {
                planet_type: PlanetType::Terran,
                ..RawInputRecord::default()
            })
            .unwrap();
        assert_eq!(result.label, HabitabilityLabel::Habitable);
    }
}
