//! OpenRouter Provider Implementation
//!
//! Integration with the OpenRouter chat-completions API, which fronts
//! the multimodal models used for container OCR.
//!
//! # Features
//!
//! - Async HTTP communication with the OpenRouter API
//! - Multimodal messages (text + base64 image payloads)
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use gantry_oracle::OpenRouterOracle;
//!
//! // Create an OpenRouter provider
//! let oracle = OpenRouterOracle::new("google/gemini-2.5-flash", "sk-or-...");
//!
//! // Note: the complete method is async; use it in an async context or
//! // through the Oracle trait's sync wrapper
//! ```

use crate::OracleError;
use gantry_domain::{ConversationTurn, ImageData, Oracle, TurnContent};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenRouter API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1";

/// Default model for container OCR
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Default timeout for oracle requests (2 minutes; vision calls are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Completion cap, sized for large multi-container responses
const MAX_TOKENS: u32 = 64_000;

/// OCR wants reproducible reads, not creativity
const TEMPERATURE: f32 = 0.0;

/// OpenRouter API provider for multimodal OCR inference
///
/// Communicates with the OpenRouter chat-completions endpoint to read
/// container markings from photographs.
pub struct OpenRouterOracle {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// One role-tagged message on the wire
#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: WireContent,
}

/// Message content: plain text, or a text+image part list
#[derive(Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum WirePart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: WireImageUrl },
}

#[derive(Serialize)]
struct WireImageUrl {
    url: String,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenRouterOracle {
    /// Create a new OpenRouter provider against the default endpoint.
    ///
    /// # Parameters
    ///
    /// - `model`: model identifier (e.g. "google/gemini-2.5-flash")
    /// - `api_key`: OpenRouter API key
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, model, api_key)
    }

    /// Create a new OpenRouter provider with an explicit endpoint.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the conversation and return the model's reply text.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable
    /// - The model is not available
    /// - The provider rate-limits the request
    /// - The response body is not a well-formed completion
    pub async fn complete(&self, turns: &[ConversationTurn]) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request_body = ChatRequest {
            model: &self.model,
            messages: turns.iter().map(to_wire_message).collect(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    if response.status().is_success() {
                        match response.json::<ChatResponse>().await {
                            Ok(completion) => {
                                return completion
                                    .choices
                                    .into_iter()
                                    .next()
                                    .map(|choice| choice.message.content)
                                    .ok_or_else(|| {
                                        OracleError::InvalidResponse(
                                            "completion carried no choices".to_string(),
                                        )
                                    });
                            }
                            Err(e) => {
                                return Err(OracleError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                )));
                            }
                        }
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(OracleError::ModelNotAvailable(self.model.clone()));
                    } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(OracleError::RateLimitExceeded);
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(OracleError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(OracleError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| OracleError::Communication("Max retries exceeded".to_string())))
    }
}

/// Map a conversation turn onto the chat-completions wire shape.
///
/// Turns carrying an image become a two-part content array with the
/// payload inlined as a data URL; text turns stay plain strings.
fn to_wire_message(turn: &ConversationTurn) -> WireMessage {
    let content = match &turn.content {
        TurnContent::Text(text) => WireContent::Text(text.clone()),
        TurnContent::TextWithImage { text, image } => WireContent::Parts(vec![
            WirePart::Text { text: text.clone() },
            WirePart::ImageUrl {
                image_url: WireImageUrl {
                    url: data_url(image),
                },
            },
        ]),
    };

    WireMessage {
        role: turn.role.as_str(),
        content,
    }
}

fn data_url(image: &ImageData) -> String {
    format!("data:{};base64,{}", image.media_type, image.data)
}

impl Oracle for OpenRouterOracle {
    type Error = OracleError;

    fn call(&self, turns: &[ConversationTurn]) -> Result<String, Self::Error> {
        // Blocking wrapper for the async client
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.complete(turns).await })
    }
}
