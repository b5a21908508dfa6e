//! Completion gateway client.

use async_trait::async_trait;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use promptforge_core::config::GatewaySettings;

use crate::error::GatewayError;
use crate::prompt::SYSTEM_PROMPT;
use crate::request::{ChatCompletionResponse, ChatRequest, ContentPart, Message, MessageContent};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Sends one multi-part refinement request and returns the raw completion
/// text. Implemented over HTTP in production and by a mock in pipeline tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, parts: Vec<ContentPart>) -> Result<String, GatewayError>;
}

/// HTTP client for an OpenAI-style chat completions endpoint.
pub struct HttpCompletionClient {
    http_client: reqwest::Client,
    settings: GatewaySettings,
}

impl Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // Never expose settings here: they carry the API key.
        f.debug_struct("HttpCompletionClient")
            .field("endpoint", &self.settings.endpoint)
            .field("model", &self.settings.model)
            .finish()
    }
}

impl HttpCompletionClient {
    pub fn new(settings: GatewaySettings) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to build HTTP client for completion gateway, using default client");
                reqwest::Client::default()
            });

        Self {
            http_client,
            settings,
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, parts: Vec<ContentPart>) -> Result<String, GatewayError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredentials)?;

        let body = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
                },
                Message {
                    role: "user",
                    content: MessageContent::Parts(parts),
                },
            ],
            temperature: self.settings.temperature,
        };

        tracing::debug!(
            endpoint = %self.settings.endpoint,
            model = %self.settings.model,
            "Sending refinement request to completion gateway"
        );

        let response = self
            .http_client
            .post(&self.settings.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), body = %body, "Completion gateway returned an error");

            return Err(match status.as_u16() {
                429 => GatewayError::RateLimited,
                402 => GatewayError::QuotaExhausted,
                code => GatewayError::Http { status: code, body },
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GatewayError::EmptyCompletion)?;

        Ok(content)
    }
}
