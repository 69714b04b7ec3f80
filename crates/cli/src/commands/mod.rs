//! CLI command implementations

pub mod encode;
pub mod predict;
pub mod schema;

use clap::Args;
use habitability_core::{
    PlanetType, RawInputRecord, FLUX_DOMAIN, MASS_DOMAIN, RADIUS_DOMAIN, STAR_AGE_DOMAIN,
    SURFACE_TEMP_DOMAIN,
};

use crate::output::print_warning;

/// Planet and host star parameters, defaulting to the form defaults
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Star age in billion years (advisory range 0.4 - 8.0)
    #[arg(long, default_value_t = STAR_AGE_DOMAIN.default, allow_negative_numbers = true)]
    pub star_age: f64,

    /// Surface temperature in K (advisory range 198.9 - 325.4)
    #[arg(long, default_value_t = SURFACE_TEMP_DOMAIN.default, allow_negative_numbers = true)]
    pub surface_temp: f64,

    /// Planetary flux relative to Earth (advisory range 0.25 - 1.64)
    #[arg(long, default_value_t = FLUX_DOMAIN.default, allow_negative_numbers = true)]
    pub flux: f64,

    /// Planet radius in Earth radii (advisory range 0.79 - 3.03)
    #[arg(long, default_value_t = RADIUS_DOMAIN.default, allow_negative_numbers = true)]
    pub radius: f64,

    /// Planet mass in Earth masses (advisory range 0.39 - 36.0)
    #[arg(long, default_value_t = MASS_DOMAIN.default, allow_negative_numbers = true)]
    pub mass: f64,

    /// Planet type: Jovian, Miniterran, Neptunian, Terran, Superterran or Subterran
    #[arg(long, default_value = "Jovian")]
    pub planet_type: PlanetType,
}

impl InputArgs {
    pub fn to_record(&self) -> RawInputRecord {
        RawInputRecord {
            star_age_gyr: self.star_age,
            surface_temp_k: self.surface_temp,
            planetary_flux: self.flux,
            planet_radius_earth: self.radius,
            planet_mass_earth: self.mass,
            planet_type: self.planet_type,
        }
    }
}

/// Warn about values outside the advisory domain; never blocks the request
pub fn warn_out_of_domain(record: &RawInputRecord) {
    for domain in record.out_of_domain() {
        print_warning(&format!(
            "{} ({}) is outside the range {} - {}; the prediction may be unreliable",
            domain.label, domain.column, domain.min, domain.max
        ));
    }
}
