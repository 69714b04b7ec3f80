//! Feature encoding for classifier inference
//!
//! Converts a [`RawInputRecord`] into the exact 11-column layout the
//! classifier was trained on: five continuous values passed through
//! unchanged, followed by a one-hot block for the planet type.

mod schema;

pub use schema::{CONTINUOUS_COUNT, FEATURE_COLUMNS, FEATURE_COUNT};

use crate::error::{PredictorError, Result};
use crate::models::{EncodedFeatureVector, RawInputRecord};
use tracing::trace;

/// Encodes raw input records into classifier feature vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a record; never rejects out-of-range or non-finite values
    pub fn encode(&self, record: &RawInputRecord) -> Result<EncodedFeatureVector> {
        Self::verify_schema()?;

        let mut values = [0.0_f64; FEATURE_COUNT];
        values[..CONTINUOUS_COUNT].copy_from_slice(&record.continuous_values());
        values[CONTINUOUS_COUNT..].copy_from_slice(record.planet_type.one_hot());

        let hot = values[CONTINUOUS_COUNT..]
            .iter()
            .filter(|v| **v == 1.0)
            .count();
        if hot != 1 {
            return Err(PredictorError::SchemaMismatch {
                expected: schema::expected_columns(),
                actual: vec![format!("{} active planet type indicators", hot)],
            });
        }

        trace!(planet_type = %record.planet_type, "Encoded feature vector");
        Ok(EncodedFeatureVector::from_values(values))
    }

    /// Check that the category set still expands to the training column order
    pub fn verify_schema() -> Result<()> {
        let actual = schema::derived_columns();
        let expected = schema::expected_columns();
        if actual != expected {
            return Err(PredictorError::SchemaMismatch { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanetType;

    fn record(planet_type: PlanetType) -> RawInputRecord {
        RawInputRecord {
            star_age_gyr: 3.9,
            surface_temp_k: 268.1,
            planetary_flux: 0.85,
            planet_radius_earth: 1.72,
            planet_mass_earth: 5.61,
            planet_type,
        }
    }

    #[test]
    fn test_terran_scenario() {
        let encoded = FeatureEncoder::new().encode(&record(PlanetType::Terran)).unwrap();
        assert_eq!(
            encoded.values(),
            &[3.9, 268.1, 0.85, 1.72, 5.61, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_column_names_for_every_category() {
        let encoder = FeatureEncoder::new();
        for t in PlanetType::ALL {
            let encoded = encoder.encode(&record(t)).unwrap();
            let names: Vec<&str> = encoded.iter().map(|(name, _)| name).collect();
            assert_eq!(names, FEATURE_COLUMNS.to_vec(), "layout differs for {}", t);
        }
    }

    #[test]
    fn test_exactly_one_indicator_set() {
        let encoder = FeatureEncoder::new();
        for t in PlanetType::FORM_ORDER {
            let encoded = encoder.encode(&record(t)).unwrap();
            let indicators = &encoded.values()[CONTINUOUS_COUNT..];
            assert_eq!(indicators.iter().filter(|v| **v == 1.0).count(), 1);
            assert_eq!(indicators.iter().filter(|v| **v == 0.0).count(), 5);
            assert_eq!(encoded.get(t.column_name()), Some(1.0));
        }
    }

    #[test]
    fn test_jovian_indicator_independent_of_other_fields() {
        let encoder = FeatureEncoder::new();
        let inputs = [
            record(PlanetType::Jovian),
            RawInputRecord {
                star_age_gyr: 0.4,
                surface_temp_k: 325.4,
                planetary_flux: 0.25,
                planet_radius_earth: 3.03,
                planet_mass_earth: 36.0,
                planet_type: PlanetType::Jovian,
            },
        ];
        for input in inputs {
            let encoded = encoder.encode(&input).unwrap();
            assert_eq!(&encoded.values()[CONTINUOUS_COUNT..], &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_continuous_values_pass_through_unchanged() {
        let input = RawInputRecord {
            star_age_gyr: 7.123456789,
            surface_temp_k: 201.5,
            planetary_flux: 1.01,
            planet_radius_earth: 0.8,
            planet_mass_earth: 35.9,
            planet_type: PlanetType::Neptunian,
        };
        let encoded = FeatureEncoder::new().encode(&input).unwrap();
        assert_eq!(&encoded.values()[..CONTINUOUS_COUNT], &input.continuous_values());
    }

    #[test]
    fn test_out_of_range_values_encode() {
        let input = RawInputRecord {
            star_age_gyr: -100.0,
            surface_temp_k: 1.0e9,
            planetary_flux: 0.0,
            planet_radius_earth: f64::MAX,
            planet_mass_earth: f64::NAN,
            planet_type: PlanetType::Subterran,
        };
        let encoded = FeatureEncoder::new().encode(&input).unwrap();
        assert_eq!(encoded.get("S_AGE"), Some(-100.0));
        assert!(encoded.get("P_MASS").unwrap().is_nan());
        assert_eq!(encoded.get("P_TYPE_Subterran"), Some(1.0));
    }

    #[test]
    fn test_verify_schema() {
        assert!(FeatureEncoder::verify_schema().is_ok());
    }
}
