//! Chat-completions client for the AI gateway used for sentiment analysis.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

#[derive(Debug, Clone, Error)]
pub enum AiGatewayError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("json error: {0}")]
    Serde(String),
    #[error("missing api key: LOVABLE_API_KEY environment variable not set")]
    MissingApiKey,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Request body for the gateway
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// Response from the gateway
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Extract the text content of the first choice
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// AI gateway client. Requests are a single attempt with a fixed timeout;
/// failures surface to the caller and are never retried here.
#[derive(Debug, Clone)]
pub struct AiGatewayClient {
    http: Client,
    api_key: SecretString,
    model: String,
}

impl AiGatewayClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new client using the LOVABLE_API_KEY environment variable
    pub fn from_env() -> Result<Self, AiGatewayError> {
        let api_key =
            std::env::var("LOVABLE_API_KEY").map_err(|_| AiGatewayError::MissingApiKey)?;
        Self::new(api_key.into(), None)
    }

    /// Create a new client with the given API key
    pub fn new(api_key: SecretString, model: Option<String>) -> Result<Self, AiGatewayError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("feedback-sentiment/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AiGatewayError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Send a completion request with a system instruction and one user message
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatResponse, AiGatewayError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
        };

        let res = self
            .http
            .post(GATEWAY_URL)
            .header(
                "authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => res
                .json::<ChatResponse>()
                .await
                .map_err(|e| AiGatewayError::Serde(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(AiGatewayError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(AiGatewayError::RateLimited),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(AiGatewayError::Http { status, body })
            }
        }
    }

    /// Send a system instruction plus one user message and return the reply text
    pub async fn ask(&self, system: &str, prompt: &str) -> Result<String, AiGatewayError> {
        let response = self
            .complete(vec![ChatMessage::system(system), ChatMessage::user(prompt)])
            .await?;

        response
            .text()
            .map(|s| s.to_string())
            .ok_or_else(|| AiGatewayError::Serde("no text content in response".to_string()))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> AiGatewayError {
    if e.is_timeout() {
        AiGatewayError::Timeout
    } else {
        AiGatewayError::Transport(e.to_string())
    }
}

/// Extract JSON from a string that might contain markdown code blocks
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();

    if let Some(start) = text.find("```json") {
        let content_start = start + 7;
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }

    if let Some(start) = text.find("```") {
        let content_start = start + 3;
        // Skip past any language identifier on the same line
        let content_start = text[content_start..]
            .find('\n')
            .map(|i| content_start + i + 1)
            .unwrap_or(content_start);
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }

    text
}
