//! Client for the external emotion-classification service.

use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    emotion_large: String,
}

/// Send free text to the classifier and return the coarse emotion label.
/// One blocking call, no retries; any transport or non-2xx failure surfaces
/// to the caller as an upstream error.
pub async fn classify(config: &Config, sentence: &str) -> AppResult<String> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.classifier_timeout_secs))
        .build()
        .map_err(|e| AppError::Upstream(format!("classifier client: {}", e)))?;

    let response = client
        .post(&config.classifier_url)
        .json(&serde_json::json!({ "sentence": sentence }))
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("classifier request: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "classifier returned {}: {}",
            status, body
        )));
    }

    let parsed: ClassifyResponse = response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("classifier response: {}", e)))?;

    Ok(parsed.emotion_large)
}
