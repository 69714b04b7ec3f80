//! Feature schema and input range listing

use anyhow::Result;
use colored::Colorize;
use habitability_core::{PlanetType, FEATURE_COLUMNS, FIELD_DOMAINS};
use serde_json::json;
use tabled::Tabled;

use crate::output::OutputFormat;

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Column")]
    column: &'static str,
    #[tabled(rename = "Input")]
    label: &'static str,
    #[tabled(rename = "Min")]
    min: f64,
    #[tabled(rename = "Max")]
    max: f64,
    #[tabled(rename = "Default")]
    default: f64,
}

/// Print the training column order and advisory input domains
pub fn show_schema(format: OutputFormat) -> Result<()> {
    let planet_types: Vec<&str> = PlanetType::FORM_ORDER.iter().map(|t| t.name()).collect();

    match format {
        OutputFormat::Json => {
            let body = json!({
                "columns": FEATURE_COLUMNS,
                "planet_types": planet_types,
                "domains": FIELD_DOMAINS,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => {
            println!("{}", "Feature Columns (training order)".bold());
            for (idx, column) in FEATURE_COLUMNS.iter().enumerate() {
                println!("  {:>2}  {}", idx, column.cyan());
            }
            println!();

            println!("{}", "Input Ranges".bold());
            let rows: Vec<DomainRow> = FIELD_DOMAINS
                .iter()
                .map(|d| DomainRow {
                    column: d.column,
                    label: d.label,
                    min: d.min,
                    max: d.max,
                    default: d.default,
                })
                .collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!("Planet types: {}", planet_types.join(", "));
        }
    }
    Ok(())
}
