//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API.
//! The request carries a fixed system prompt embedding the response JSON
//! schema and the university reference services, plus the built user prompt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::ModelBackend;

/// Request timeout for the upstream model call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling temperature for analysis requests
const TEMPERATURE: f32 = 0.3;

/// Fixed system prompt: response schema plus Lancaster reference services
const SYSTEM_PROMPT: &str = "You are a finance advisor for Lancaster University students. \
Analyse their spending patterns and provide actionable advice. \
Return ONLY valid JSON matching this exact schema:\n\
{\n\
\"risk_level\": \"low|medium|high\",\n\
\"risk_factors\": [\"string\"],\n\
\"total_spent\": number,\n\
\"avg_daily_spend\": number,\n\
\"alerts\": [\n\
    {\"type\": \"string\", \"message\": \"string\", \"url\": \"string|null\"}\n\
],\n\
\"advice\": [\"string\"]\n\
}\n\
Reference Lancaster University's services: ASK money advice, LUSU hardship fund, campus store discounts.";

/// OpenAI-compatible backend
///
/// Posts to `{base}/v1/chat/completions` with a bearer credential. Any
/// transport failure or non-2xx status is a `ServiceUnavailable`-class
/// error; the reply content is returned untouched for the normalizer.
#[derive(Clone, Debug)]
pub struct OpenAiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiBackend {
    /// Create a new backend
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn chat_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ServiceUnavailable(format!(
                "chat completion returned {status}: {body}"
            )));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponseFormat(format!("malformed completion body: {e}")))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::InvalidResponseFormat("no choices in completion".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    async fn analyze(&self, prompt: &str) -> Result<String> {
        let response = self.chat_completion(prompt).await?;
        debug!(model = %self.model, "chat completion reply: {}", response);
        Ok(response)
    }

    async fn health_check(&self) -> bool {
        // /v1/models is the standard OpenAI listing endpoint
        match self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
