//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use habitability_core::HabitabilityLabel;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a probability with two decimals
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}", probability)
}

/// Format a feature value without trailing noise
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Color the predicted label
pub fn color_label(label: HabitabilityLabel) -> String {
    match label {
        HabitabilityLabel::Habitable => label.to_string().green().bold().to_string(),
        HabitabilityLabel::NonHabitable => label.to_string().red().bold().to_string(),
    }
}

/// Color probability based on value
pub fn color_probability(probability: f64) -> String {
    let formatted = format_probability(probability);
    if probability >= 0.5 {
        formatted.green().to_string()
    } else if probability >= 0.2 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}
