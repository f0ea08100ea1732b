use std::sync::Arc;

use tracing::{error, info};

use crate::config::AssistantConfig;
use crate::errors::AssistantError;
use crate::external::model_provider::{Content, GenerateContentRequest, GenerationConfig, ModelProvider};
use crate::models::ChatRequest;
use crate::services::conversation_assembler::assemble_contents;
use crate::services::prompt_composer::{build_system_prompt, compose_context_block};

/// Reply given without contacting the model when the user has no holdings yet.
pub const ONBOARDING_REPLY: &str =
    "Add your crypto holdings to your portfolio first so I can give you personalized insights. Once your investments are in, ask me anything about them.";

/// Stateless request handler in front of the hosted model.
///
/// One call to [`AssistantGateway::reply`] makes at most one outbound request.
/// Nothing is persisted here; storing turns is the chat session's job.
pub struct AssistantGateway {
    config: AssistantConfig,
    provider: Arc<dyn ModelProvider>,
}

impl AssistantGateway {
    pub fn new(config: AssistantConfig, provider: Arc<dyn ModelProvider>) -> Self {
        Self { config, provider }
    }

    pub fn history_window(&self) -> usize {
        self.config.history_window
    }

    /// The generateContent body for a request: system instruction with the
    /// portfolio context, trailing window of history, new message last.
    pub fn build_request(&self, request: &ChatRequest) -> GenerateContentRequest {
        let context_block = compose_context_block(&request.portfolio, &request.selected_coins);

        GenerateContentRequest {
            contents: assemble_contents(&request.chat_history, &request.message, self.config.history_window),
            system_instruction: Content::instruction(build_system_prompt(&context_block)),
            generation_config: GenerationConfig::from(&self.config.generation),
        }
    }

    pub async fn reply(&self, request: &ChatRequest) -> Result<String, AssistantError> {
        let api_key = self.config.credential().ok_or_else(|| {
            error!("GEMINI_API_KEY not configured");
            AssistantError::Configuration("GEMINI_API_KEY not configured".to_string())
        })?;

        if request.message.trim().is_empty() {
            return Err(AssistantError::Validation("Message cannot be empty".to_string()));
        }

        if let Some(e) = request.portfolio.iter().find_map(|entry| entry.validate().err()) {
            return Err(AssistantError::Validation(e));
        }

        if self.config.require_portfolio && request.portfolio.is_empty() {
            info!("Empty portfolio, answering with onboarding reply");
            return Ok(ONBOARDING_REPLY.to_string());
        }

        info!(
            "Assistant request (portfolio entries: {}, tracked coins: {}, history: {})",
            request.portfolio.len(),
            request.selected_coins.len(),
            request.chat_history.len()
        );

        let body = self.build_request(request);
        self.provider.generate_content(api_key, &body).await
    }
}
