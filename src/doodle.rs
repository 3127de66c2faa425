use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ImageConfig;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client for generating doodle illustrations via the OpenAI images API
pub struct DoodleClient {
    client: Client,
    api_key: String,
    model: String,
    prompt_template: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerationRequest {
    model: String,
    prompt: String,
    size: String,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

impl DoodleClient {
    pub fn new(api_key: String, config: &ImageConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .context("Failed to build HTTP client")?,
            api_key,
            model: config.model.clone(),
            prompt_template: config.prompt_template.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_prompt(&self, joke: &str) -> String {
        self.prompt_template.replace("{joke}", joke)
    }

    /// Generate a doodle for the joke and download it as PNG bytes
    pub async fn generate(&self, joke: &str) -> Result<Vec<u8>> {
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: self.build_prompt(joke),
            size: "1024x1024".to_string(),
            n: 1,
        };

        debug!(model = %self.model, "Requesting image generation");

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to request image generation")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Image generation error ({}): {}", status, body);
        }

        let generated: GenerationResponse = response
            .json()
            .await
            .context("Failed to parse image generation response")?;

        let url = generated
            .data
            .first()
            .map(|img| img.url.as_str())
            .context("Image generation returned no images")?;

        debug!(url, "Downloading generated image");

        let image = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to download generated image")?;

        let status = image.status();
        if !status.is_success() {
            anyhow::bail!("Image download error ({})", status);
        }

        let bytes = image
            .bytes()
            .await
            .context("Failed to read image bytes")?
            .to_vec();

        info!(bytes = bytes.len(), "Generated doodle image");

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt() {
        let client = DoodleClient::new("key".to_string(), &ImageConfig::default()).unwrap();
        let prompt = client.build_prompt("Why did the chicken cross the road?");

        assert_eq!(
            prompt,
            "A hand-drawn doodle-style black and white cartoon representing: \
             Why did the chicken cross the road?"
        );
    }

    #[test]
    fn test_build_prompt_custom_template() {
        let config = ImageConfig {
            prompt_template: "Sketch of {joke}, ink on paper".to_string(),
            ..ImageConfig::default()
        };
        let client = DoodleClient::new("key".to_string(), &config).unwrap();

        assert_eq!(client.build_prompt("a pun"), "Sketch of a pun, ink on paper");
    }
}
