//! Habitability prediction commands

use anyhow::{Context, Result};
use colored::Colorize;
use habitability_core::{
    HabitabilityLabel, HabitabilityPredictor, PredictionResult, RawInputRecord,
    DEFAULT_DECISION_THRESHOLD,
};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tracing::debug;

use super::{warn_out_of_domain, InputArgs};
use crate::client::{ApiClient, PredictResponse};
use crate::output::{color_label, color_probability, format_value, print_info, OutputFormat};

/// Row for the input parameters table
#[derive(Tabled)]
struct InputRow {
    #[tabled(rename = "Parameter")]
    parameter: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Serialize)]
struct PredictionOutput<'a> {
    input: &'a RawInputRecord,
    prediction: &'a PredictionResult,
}

/// Load the artifact and predict in-process
pub fn predict_local(
    model: &Path,
    model_sha256: Option<&str>,
    input: &InputArgs,
    format: OutputFormat,
) -> Result<()> {
    let predictor = HabitabilityPredictor::load(model, model_sha256)
        .context("Failed to load classifier artifact")?;
    debug!(model = %model.display(), "Classifier loaded");

    let record = input.to_record();
    let prediction = predictor.predict(&record)?;
    render(
        &record,
        &prediction,
        predictor.service().decision_threshold(),
        format,
    )
}

/// Ask the prediction server
pub async fn predict_remote(client: &ApiClient, input: &InputArgs, format: OutputFormat) -> Result<()> {
    let record = input.to_record();
    let response: PredictResponse = client.post("api/v1/predict", &record).await?;
    debug!(generated_at = response.generated_at, features = ?response.features, "Server prediction received");
    render(
        &record,
        &response.prediction,
        DEFAULT_DECISION_THRESHOLD,
        format,
    )
}

fn render(
    record: &RawInputRecord,
    prediction: &PredictionResult,
    threshold: f64,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&PredictionOutput {
                input: record,
                prediction,
            })?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{}", "User Input Parameters".bold());
            let rows = input_rows(record);
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            warn_out_of_domain(record);
            println!();

            println!("{}", "Prediction".bold());
            println!("{}", "=".repeat(40));
            println!("Predicted Habitability:         {}", color_label(prediction.label));
            println!(
                "Probability of being Habitable: {}",
                color_probability(prediction.probability_habitable)
            );
            if disagrees(prediction, threshold) {
                print_info(&format!(
                    "Label and probability disagree at the {} threshold; both are shown as the model reported them",
                    threshold
                ));
            }
        }
    }
    Ok(())
}

/// Label says one thing, `probability >= threshold` says the other
fn disagrees(prediction: &PredictionResult, threshold: f64) -> bool {
    let positive = prediction.label == HabitabilityLabel::Habitable;
    positive != (prediction.probability_habitable >= threshold)
}

fn input_rows(record: &RawInputRecord) -> Vec<InputRow> {
    vec![
        InputRow {
            parameter: "Star Age (Billion Years)".to_string(),
            value: format_value(record.star_age_gyr),
        },
        InputRow {
            parameter: "Surface Temperature (K)".to_string(),
            value: format_value(record.surface_temp_k),
        },
        InputRow {
            parameter: "Planetary Flux".to_string(),
            value: format_value(record.planetary_flux),
        },
        InputRow {
            parameter: "Planet Radius (Earth Radii)".to_string(),
            value: format_value(record.planet_radius_earth),
        },
        InputRow {
            parameter: "Planet Mass (Earth Mass)".to_string(),
            value: format_value(record.planet_mass_earth),
        },
        InputRow {
            parameter: "Planet Type".to_string(),
            value: record.planet_type.to_string(),
        },
    ]
}
