//! API client for communicating with the prediction server

use anyhow::{Context, Result};
use habitability_core::PredictionResult;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// API client for the prediction server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| format!("{} ({})", e.error, e.kind))
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, message);
        }

        response.json().await.context("Failed to parse response")
    }
}

// API response types

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub prediction: PredictionResult,
    pub features: HashMap<String, f64>,
    pub generated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitability_core::{HabitabilityLabel, RawInputRecord};

    #[tokio::test]
    async fn test_post_predict_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/predict")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "prediction": {"label": "habitable", "probability_habitable": 0.88},
                    "features": {"S_AGE": 3.9, "P_TYPE_Terran": 1.0},
                    "out_of_domain": [],
                    "generated_at": 1760000000
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let response: PredictResponse = client
            .post("api/v1/predict", &RawInputRecord::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.prediction.label, HabitabilityLabel::Habitable);
        assert_eq!(response.prediction.probability_habitable, 0.88);
        assert_eq!(response.features["P_TYPE_Terran"], 1.0);
    }

    #[tokio::test]
    async fn test_post_surfaces_server_error_kind() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/predict")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "inference failed: classifier not loaded", "kind": "inference_error"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client
            .post::<PredictResponse, _>("api/v1/predict", &RawInputRecord::default())
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("500"), "message was {}", msg);
        assert!(msg.contains("inference_error"), "message was {}", msg);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
