//! Core data models for habitability prediction

use crate::encoder::{FEATURE_COLUMNS, FEATURE_COUNT};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Planet classification by mass/radius regime
///
/// Variant order is the training-time indicator column order. Names are
/// matched case-insensitively when deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PlanetType {
    #[default]
    Jovian,
    Miniterran,
    Neptunian,
    Subterran,
    Superterran,
    Terran,
}

impl PlanetType {
    /// All categories in indicator column order
    pub const ALL: [PlanetType; 6] = [
        PlanetType::Jovian,
        PlanetType::Miniterran,
        PlanetType::Neptunian,
        PlanetType::Subterran,
        PlanetType::Superterran,
        PlanetType::Terran,
    ];

    /// Order in which the input form offers the categories
    pub const FORM_ORDER: [PlanetType; 6] = [
        PlanetType::Jovian,
        PlanetType::Miniterran,
        PlanetType::Neptunian,
        PlanetType::Terran,
        PlanetType::Superterran,
        PlanetType::Subterran,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlanetType::Jovian => "Jovian",
            PlanetType::Miniterran => "Miniterran",
            PlanetType::Neptunian => "Neptunian",
            PlanetType::Subterran => "Subterran",
            PlanetType::Superterran => "Superterran",
            PlanetType::Terran => "Terran",
        }
    }
}

impl fmt::Display for PlanetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown planet type '{0}' (expected one of Jovian, Miniterran, Neptunian, Terran, Superterran, Subterran)")]
pub struct ParsePlanetTypeError(String);

impl FromStr for PlanetType {
    type Err = ParsePlanetTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PlanetType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParsePlanetTypeError(s.to_string()))
    }
}

impl TryFrom<String> for PlanetType {
    type Error = ParsePlanetTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Advisory input range for one continuous field
///
/// Ranges are enforced by input collection only; the encoder accepts any value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDomain {
    pub column: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FieldDomain {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

pub const STAR_AGE_DOMAIN: FieldDomain = FieldDomain {
    column: "S_AGE",
    label: "Star Age (Billion Years)",
    min: 0.4,
    max: 8.0,
    default: 3.9,
};

pub const SURFACE_TEMP_DOMAIN: FieldDomain = FieldDomain {
    column: "P_TEMP_SURF",
    label: "Surface Temperature (K)",
    min: 198.9,
    max: 325.4,
    default: 268.1,
};

pub const FLUX_DOMAIN: FieldDomain = FieldDomain {
    column: "P_FLUX",
    label: "Planetary Flux",
    min: 0.25,
    max: 1.64,
    default: 0.85,
};

pub const RADIUS_DOMAIN: FieldDomain = FieldDomain {
    column: "P_RADIUS",
    label: "Planet Radius (Earth Radii)",
    min: 0.79,
    max: 3.03,
    default: 1.72,
};

pub const MASS_DOMAIN: FieldDomain = FieldDomain {
    column: "P_MASS",
    label: "Planet Mass (Earth Mass)",
    min: 0.39,
    max: 36.0,
    default: 5.61,
};

/// Domains of the continuous fields, in feature column order
pub const FIELD_DOMAINS: [FieldDomain; 5] = [
    STAR_AGE_DOMAIN,
    SURFACE_TEMP_DOMAIN,
    FLUX_DOMAIN,
    RADIUS_DOMAIN,
    MASS_DOMAIN,
];

/// One inference request as collected from the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawInputRecord {
    pub star_age_gyr: f64,
    pub surface_temp_k: f64,
    pub planetary_flux: f64,
    pub planet_radius_earth: f64,
    pub planet_mass_earth: f64,
    pub planet_type: PlanetType,
}

impl Default for RawInputRecord {
    fn default() -> Self {
        Self {
            star_age_gyr: STAR_AGE_DOMAIN.default,
            surface_temp_k: SURFACE_TEMP_DOMAIN.default,
            planetary_flux: FLUX_DOMAIN.default,
            planet_radius_earth: RADIUS_DOMAIN.default,
            planet_mass_earth: MASS_DOMAIN.default,
            planet_type: PlanetType::default(),
        }
    }
}

impl RawInputRecord {
    /// Continuous values in feature column order
    pub fn continuous_values(&self) -> [f64; 5] {
        [
            self.star_age_gyr,
            self.surface_temp_k,
            self.planetary_flux,
            self.planet_radius_earth,
            self.planet_mass_earth,
        ]
    }

    /// Fields whose value lies outside the advisory domain
    pub fn out_of_domain(&self) -> Vec<FieldDomain> {
        FIELD_DOMAINS
            .iter()
            .zip(self.continuous_values())
            .filter(|(domain, value)| !domain.contains(*value))
            .map(|(domain, _)| *domain)
            .collect()
    }
}

/// Fixed-order numeric input for the classifier
///
/// Only the encoder constructs these, so the column layout always matches
/// [`FEATURE_COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedFeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl EncodedFeatureVector {
    pub(crate) fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn columns(&self) -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_COLUMNS
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.values[idx])
    }

    /// Column name / value pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }
}

impl Serialize for EncodedFeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}

/// Predicted habitability class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitabilityLabel {
    Habitable,
    NonHabitable,
}

impl HabitabilityLabel {
    /// Map the classifier's discrete class (1 = positive) to a label
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            HabitabilityLabel::Habitable
        } else {
            HabitabilityLabel::NonHabitable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitabilityLabel::Habitable => "habitable",
            HabitabilityLabel::NonHabitable => "non_habitable",
        }
    }
}

impl fmt::Display for HabitabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HabitabilityLabel::Habitable => f.write_str("Habitable"),
            HabitabilityLabel::NonHabitable => f.write_str("Non-Habitable"),
        }
    }
}

/// Label and positive-class probability for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: HabitabilityLabel,
    pub probability_habitable: f64,
}
