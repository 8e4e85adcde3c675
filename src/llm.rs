//! Itinerary generation through an OpenAI-compatible chat completion API
//!
//! Defaults to OpenRouter. The prompt is three messages: a fixed system
//! role, the JSON context behind a marker line, and the free-text request.

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{LlmConfig, API_KEY_ENV};
use crate::error::{Service, TravelPlannerError};
use crate::http::{build_client, ensure_success, read_json};
use crate::models::TripContext;
use crate::Result;

/// System prompt establishing the assistant's role
pub const SYSTEM_PROMPT: &str = "You are a precise travel planning assistant. Use the provided JSON context to create a day-by-day itinerary that considers the weather and arrival/departure details.";

/// Marker line preceding the serialized context
pub const CONTEXT_MARKER: &str = "<<<JSON_CONTEXT>>>";

/// A role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Build the three-message prompt for a context and trip instruction
pub fn build_messages(context: &TripContext, instruction: &str) -> Result<Vec<ChatMessage>> {
    let context_json = context.to_prompt_json()?;
    Ok(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("{CONTEXT_MARKER}\n{context_json}")),
        ChatMessage::user(instruction),
    ])
}

/// Chat completion client that turns a trip context into an itinerary
#[derive(Debug, Clone)]
pub struct ItineraryRequester {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl ItineraryRequester {
    /// Create a new requester from configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = build_client(Service::LanguageModel, config.timeout(), None)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Ask the model for an itinerary and return its text verbatim
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn request(&self, context: &TripContext, instruction: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| TravelPlannerError::missing_credential(API_KEY_ENV))?;

        let messages = build_messages(context, instruction)?;
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        info!("Requesting itinerary from {}", self.model);
        debug!("Chat completion URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TravelPlannerError::transport(Service::LanguageModel, e))?;

        let response = ensure_success(Service::LanguageModel, response).await?;
        let body: ChatCompletionResponse = read_json(Service::LanguageModel, response).await?;

        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TravelPlannerError::malformed(Service::LanguageModel, "no choices"))?
            .message
            .content
            .ok_or_else(|| {
                TravelPlannerError::malformed(Service::LanguageModel, "first choice has no content")
            })?;

        info!(
            "Received {} characters from {} in {:.3}s",
            content.len(),
            self.model,
            start_time.elapsed().as_secs_f64()
        );

        Ok(content)
    }
}
