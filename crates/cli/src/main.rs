//! Exoplanet Habitability CLI
//!
//! Collects planetary and stellar parameters as flags, runs the habitability
//! classifier locally or through the prediction server, and prints the
//! predicted class with its probability.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{encode, predict, schema, InputArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exoplanet Habitability CLI
#[derive(Parser)]
#[command(name = "habitability")]
#[command(author, version, about = "Exoplanet Habitability Prediction", long_about = None)]
pub struct Cli {
    /// Prediction server URL (can also be set via HABITABILITY_API_URL env var)
    #[arg(long, env = "HABITABILITY_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict habitability for one planet
    Predict {
        #[command(flatten)]
        input: InputArgs,

        /// Classifier artifact to run locally instead of calling the server
        #[arg(long, env = "HABITABILITY_MODEL_PATH")]
        model: Option<PathBuf>,

        /// Expected SHA-256 of the local artifact
        #[arg(long, env = "HABITABILITY_MODEL_SHA256", requires = "model")]
        model_sha256: Option<String>,
    },

    /// Show the encoded feature vector for one planet
    Encode {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the classifier's feature layout and input ranges
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    match cli.command {
        Commands::Predict {
            input,
            model: Some(model),
            model_sha256,
        } => {
            predict::predict_local(&model, model_sha256.as_deref(), &input, cli.format)?;
        }
        Commands::Predict {
            input, model: None, ..
        } => {
            let client = client::ApiClient::new(&cli.api_url)?;
            predict::predict_remote(&client, &input, cli.format).await?;
        }
        Commands::Encode { input } => {
            encode::show_encoding(&input, cli.format)?;
        }
        Commands::Schema => {
            schema::show_schema(cli.format)?;
        }
    }

    Ok(())
}
