//! Training-time feature schema
//!
//! The classifier has no notion of column names at inference time, only
//! positions. Everything here is the single source of truth for that layout.

use crate::models::PlanetType;

/// Number of features the classifier was trained on
pub const FEATURE_COUNT: usize = 11;

/// Number of continuous features preceding the planet type indicators
pub const CONTINUOUS_COUNT: usize = 5;

/// Column order used when the classifier was trained
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "S_AGE",
    "P_TEMP_SURF",
    "P_FLUX",
    "P_RADIUS",
    "P_MASS",
    "P_TYPE_Jovian",
    "P_TYPE_Miniterran",
    "P_TYPE_Neptunian",
    "P_TYPE_Subterran",
    "P_TYPE_Superterran",
    "P_TYPE_Terran",
];

const CONTINUOUS_COLUMNS: [&str; CONTINUOUS_COUNT] =
    ["S_AGE", "P_TEMP_SURF", "P_FLUX", "P_RADIUS", "P_MASS"];

/// Indicator row per category, indexed by `indicator_index`
const ONE_HOT_TABLE: [[f64; 6]; 6] = [
    [1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
];

impl PlanetType {
    /// Position of this category within the indicator block
    pub fn indicator_index(&self) -> usize {
        match self {
            PlanetType::Jovian => 0,
            PlanetType::Miniterran => 1,
            PlanetType::Neptunian => 2,
            PlanetType::Subterran => 3,
            PlanetType::Superterran => 4,
            PlanetType::Terran => 5,
        }
    }

    /// Indicator column name, e.g. `P_TYPE_Terran`
    pub fn column_name(&self) -> &'static str {
        FEATURE_COLUMNS[CONTINUOUS_COUNT + self.indicator_index()]
    }

    pub(crate) fn one_hot(&self) -> &'static [f64; 6] {
        &ONE_HOT_TABLE[self.indicator_index()]
    }
}

/// Column layout derived from the continuous columns and category set
pub(crate) fn derived_columns() -> Vec<String> {
    CONTINUOUS_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(PlanetType::ALL.iter().map(|t| format!("P_TYPE_{}", t.name())))
        .collect()
}

pub(crate) fn expected_columns() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_layout_matches_training_order() {
        assert_eq!(derived_columns(), expected_columns());
    }

    #[test]
    fn test_column_name_per_category() {
        assert_eq!(PlanetType::Jovian.column_name(), "P_TYPE_Jovian");
        assert_eq!(PlanetType::Subterran.column_name(), "P_TYPE_Subterran");
        assert_eq!(PlanetType::Terran.column_name(), "P_TYPE_Terran");
    }

    #[test]
    fn test_one_hot_rows_have_single_indicator() {
        for t in PlanetType::ALL {
            let row = t.one_hot();
            assert_eq!(row.iter().filter(|v| **v == 1.0).count(), 1);
            assert_eq!(row.iter().filter(|v| **v == 0.0).count(), 5);
            assert_eq!(row[t.indicator_index()], 1.0);
        }
    }

    #[test]
    fn test_indicator_index_follows_all_order() {
        for (idx, t) in PlanetType::ALL.iter().enumerate() {
            assert_eq!(t.indicator_index(), idx);
        }
    }
}
