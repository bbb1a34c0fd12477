//! Google Generative Language API client implementation
//!
//! This module provides a native client for the two endpoints the studio
//! needs: the Imagen `:predict` endpoint for text-to-image synthesis and
//! the Gemini `:generateContent` endpoint for image editing (which also
//! serves upscaling).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::core_types::{AspectRatio, EncodedImage};
use crate::errors::StudioError;
use crate::gateway::ImageGateway;

/// Gemini / Imagen API client
pub struct GeminiGateway {
    api_key: String,
    generate_model: String,
    edit_model: String,
    client: Client,
    base_url: String,
}

impl GeminiGateway {
    /// Create a new gateway with the default models and endpoint.
    pub fn new(api_key: String) -> Self {
        let defaults = GatewayConfig::default();
        Self {
            api_key,
            generate_model: defaults.generate_model,
            edit_model: defaults.edit_model,
            client: Client::new(),
            base_url: defaults.base_url,
        }
    }

    /// Create a new gateway with custom models and base URL.
    pub fn with_config(api_key: String, config: &GatewayConfig) -> Self {
        Self {
            api_key,
            generate_model: config.generate_model.clone(),
            edit_model: config.edit_model.clone(),
            client: Client::new(),
            base_url: config.base_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct PredictParameters {
    #[serde(rename = "sampleCount")]
    sample_count: u32,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
    #[serde(rename = "outputMimeType")]
    output_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: String,
    #[serde(rename = "mimeType", default)]
    mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: ContentPayload,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct ContentPayload {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    data: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

/// One part of a heterogeneous candidate payload. Only the image-bearing
/// shape matters here; text parts and anything unrecognized deserialize
/// with `inline_data` empty and are skipped during extraction.
#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(rename = "inlineData", default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetails {
    code: u16,
    message: String,
}

/// Extracts the first image-bearing part from the candidates, or fails with
/// `missing_message` when no part carries image data.
fn first_inline_image(
    candidates: Vec<Candidate>,
    missing_message: &str,
) -> Result<EncodedImage, StudioError> {
    candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
        .map(|inline| EncodedImage::new(inline.data, inline.mime_type))
        .ok_or_else(|| StudioError::Upstream(missing_message.to_string()))
}

impl GeminiGateway {
    async fn post_json<T: Serialize>(
        &self,
        url: &str,
        request: &T,
    ) -> Result<reqwest::Response, StudioError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| StudioError::Upstream(format!("Gemini API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(StudioError::Upstream(format!(
                    "Gemini API error {}: {}",
                    api_error.error.code, api_error.error.message
                )));
            }

            return Err(StudioError::Upstream(format!(
                "Gemini API request failed with status {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ImageGateway for GeminiGateway {
    async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<EncodedImage, StudioError> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: aspect_ratio.as_str().to_string(),
                output_mime_type: "image/jpeg".to_string(),
            },
        };

        let url = format!(
            "{}/models/{}:predict?key={}",
            self.base_url, self.generate_model, self.api_key
        );
        log::debug!(
            "Requesting generation from model {} at {}",
            self.generate_model,
            aspect_ratio
        );

        let response: PredictResponse = self
            .post_json(&url, &request)
            .await?
            .json()
            .await
            .map_err(|e| {
                StudioError::Upstream(format!("Failed to parse Gemini response: {}", e))
            })?;

        let prediction = response
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| StudioError::Upstream("API did not return an image.".to_string()))?;

        Ok(EncodedImage::new(
            prediction.bytes_base64_encoded,
            prediction
                .mime_type
                .unwrap_or_else(|| "image/jpeg".to_string()),
        ))
    }

    async fn edit(
        &self,
        source: &EncodedImage,
        instruction: &str,
    ) -> Result<EncodedImage, StudioError> {
        let request = GenerateContentRequest {
            contents: ContentPayload {
                parts: vec![
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            data: source.data.clone(),
                            mime_type: source.mime_type.clone(),
                        },
                    },
                    RequestPart::Text {
                        text: instruction.to_string(),
                    },
                ],
            },
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.edit_model, self.api_key
        );
        log::debug!("Requesting edit from model {}", self.edit_model);

        let response: GenerateContentResponse = self
            .post_json(&url, &request)
            .await?
            .json()
            .await
            .map_err(|e| {
                StudioError::Upstream(format!("Failed to parse Gemini response: {}", e))
            })?;

        first_inline_image(response.candidates, "API did not return an edited image.")
    }
}

/// Create a gateway from configuration, resolving the API key.
pub fn create_gateway(config: &GatewayConfig) -> Result<Arc<dyn ImageGateway>, StudioError> {
    let api_key = config.resolve_api_key()?;
    Ok(Arc::new(GeminiGateway::with_config(api_key, config)))
}
