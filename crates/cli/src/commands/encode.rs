//! Feature encoding inspection

use anyhow::Result;
use colored::Colorize;
use habitability_core::FeatureEncoder;
use tabled::Tabled;

use super::{warn_out_of_domain, InputArgs};
use crate::output::{format_value, OutputFormat};

/// Row for the encoded vector table
#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Print the vector the classifier would receive
pub fn show_encoding(input: &InputArgs, format: OutputFormat) -> Result<()> {
    let record = input.to_record();
    let vector = FeatureEncoder::new().encode(&record)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&vector)?);
        }
        OutputFormat::Table => {
            println!("{}", "Encoded Feature Vector".bold());
            let rows: Vec<FeatureRow> = vector
                .iter()
                .enumerate()
                .map(|(index, (column, value))| FeatureRow {
                    index,
                    column: column.to_string(),
                    value: format_value(value),
                })
                .collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            warn_out_of_domain(&record);
        }
    }
    Ok(())
}
