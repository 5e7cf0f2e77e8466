//! Pluggable model backend abstraction
//!
//! A backend turns a built prompt into a raw text reply that is expected,
//! but not guaranteed, to be JSON. The normalizer owns all validation of
//! that reply; backends only move bytes.
//!
//! - `ModelBackend` trait: the prompt-in / raw-text-out contract
//! - `ModelClient` enum: concrete wrapper providing Clone + compile-time
//!   dispatch
//! - Backend implementations: `OpenAiBackend` (live), `MockBackend`
//!   (offline/demo)

mod mock;
mod openai;

pub use mock::MockBackend;
pub use openai::OpenAiBackend;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{Error, Result};

/// Trait defining the interface for model backends
///
/// Backends must be Send + Sync so in-flight requests can await their model
/// calls concurrently.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Analyze a prompt, returning the model's raw text reply
    async fn analyze(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model identifier (for logging)
    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete model client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone, Debug)]
pub enum ModelClient {
    /// Live OpenAI-compatible chat-completion backend
    OpenAi(OpenAiBackend),
    /// Offline backend fabricating replies locally
    Mock(MockBackend),
}

impl ModelClient {
    /// Select a backend from process configuration
    ///
    /// Mock mode wins; otherwise the live backend is built and a missing
    /// credential is a configuration error surfaced at startup, not on the
    /// first request.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.mock_mode {
            tracing::info!("mock mode enabled, model replies will be fabricated locally");
            return Ok(ModelClient::Mock(MockBackend::new()));
        }

        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("AI_API_KEY not set (or enable MOCK_MODE)".into()))?;

        Ok(ModelClient::OpenAi(OpenAiBackend::new(
            &config.api_base,
            &config.model,
            api_key,
        )?))
    }

    /// Create a mock client directly (for tests)
    pub fn mock() -> Self {
        ModelClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl ModelBackend for ModelClient {
    async fn analyze(&self, prompt: &str) -> Result<String> {
        match self {
            ModelClient::OpenAi(b) => b.analyze(prompt).await,
            ModelClient::Mock(b) => b.analyze(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ModelClient::OpenAi(b) => b.health_check().await,
            ModelClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            ModelClient::OpenAi(b) => b.model(),
            ModelClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            ModelClient::OpenAi(b) => b.host(),
            ModelClient::Mock(b) => b.host(),
        }
    }
}
