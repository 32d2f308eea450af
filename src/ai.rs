//! Gemini text-generation client
//!
//! Sends one `generateContent` POST per request and extracts the reply by
//! trying the known response field paths in order. The generation seam is
//! a trait so the render pipeline can be tested without a live model.

use crate::SkypanelError;
use crate::config::AiConfig;
use crate::models::{AirQualitySample, WeatherReading};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// How much advice to ask the model for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVerbosity {
    /// One short sentence
    Short,
    /// A few sentences
    Extended,
}

/// Text-generation seam for the render pipeline
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String, SkypanelError>;
}

/// HTTP client for the Gemini `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: AiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: AiConfig, timeout_seconds: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.into()))
            .user_agent("Skypanel/0.1.0")
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String, SkypanelError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url,
            urlencoding::encode(&self.config.model),
            urlencoding::encode(&self.config.api_key)
        );
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        debug!("POST {}/models/{}:generateContent", self.config.base_url, self.config.model);

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let data: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = data
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("Gemini API error")
                .to_string();
            warn!("AI call failed with HTTP {}: {}", status.as_u16(), message);
            return Err(SkypanelError::ai(message));
        }

        extract_text(&data).ok_or_else(|| SkypanelError::ai("Empty response"))
    }
}

/// Response field paths tried in order; the first non-empty string wins
const TEXT_PATHS: [&str; 3] = [
    "/candidates/0/content/parts/0/text",
    "/candidates/0/output_text",
    "/candidates/0/text",
];

/// Extract the reply text from an arbitrary response shape, or `None`
/// when no known path carries a non-empty string.
#[must_use]
pub fn extract_text(response: &Value) -> Option<String> {
    for path in TEXT_PATHS {
        if let Some(text) = response.pointer(path).and_then(Value::as_str) {
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Build the health-recommendation prompt from the rendered readings
#[must_use]
pub fn health_prompt(
    reading: &WeatherReading,
    air: &AirQualitySample,
    verbosity: PromptVerbosity,
) -> String {
    let instruction = match verbosity {
        PromptVerbosity::Short => {
            "Give a short health recommendation: can people exercise outdoors, \
             and any precautions to take."
        }
        PromptVerbosity::Extended => {
            "Write 2-4 sentences of weather and air quality advice: can people \
             exercise outdoors, and any precautions to take."
        }
    };

    format!(
        "City: {}.\nTemperature: {}°C.\nHumidity: {}%.\nAir Quality Index: {} ({}).\nPM2.5: {} μg/m³; PM10: {} μg/m³.\n{}",
        reading.location.display_name(),
        reading.rounded_temperature(),
        reading.humidity,
        air.category.index(),
        air.category.status_label(),
        air.pm2_5,
        air.pm10,
        instruction
    )
}
