use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::AssistantConfig;
use crate::errors::AssistantError;
use crate::external::model_provider::{GenerateContentRequest, ModelProvider};

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

/// Google Gemini generateContent client. No retries and no request timeout:
/// the hosting environment's request timeout is the only bound.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AssistantError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        Self::new(config.base_url.clone(), config.model.clone())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// First candidate's first text part, if the body has one.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text)
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, AssistantError> {
        info!("Calling Gemini generateContent (model: {}, turns: {})", self.model, request.contents.len());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key
                error!("Gemini API request failed: {}", e.without_url());
                AssistantError::Upstream {
                    status: None,
                    detail: "Failed to reach Gemini API".to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini API error (HTTP {}): {}", status.as_u16(), error_text);
            return Err(AssistantError::upstream_status(status.as_u16()));
        }

        let data: GenerateContentResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e.without_url());
            AssistantError::invalid_response()
        })?;

        if let Some(total) = data.usage_metadata.as_ref().and_then(|u| u.total_token_count) {
            info!("Gemini completion generated. Tokens: {} total", total);
        }

        extract_text(data).ok_or_else(|| {
            error!("Gemini response had no candidate text");
            AssistantError::invalid_response()
        })
    }
}
