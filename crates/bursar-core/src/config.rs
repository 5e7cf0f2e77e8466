//! Process configuration
//!
//! Read once from environment variables at startup and treated as immutable
//! for the process lifetime.
//!
//! Environment variables:
//! - `MOCK_MODE`: "true"/"1" selects the offline mock backend (default: off)
//! - `AI_API_KEY`: bearer credential for the live model service
//! - `AI_API_BASE`: chat-completion base URL (default: https://api.openai.com)
//! - `AI_MODEL`: model identifier (default: gpt-4o-mini)
//! - `HIGH_SPEND_THRESHOLD`: high-spend alert threshold in currency units
//!   (default: 200)

use rust_decimal::Decimal;

/// Default chat-completion base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Offline/demo mode: fabricate model replies locally, no network calls
    pub mock_mode: bool,
    /// Bearer credential for the live model service
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible endpoint
    pub api_base: String,
    /// Model identifier sent with every chat-completion request
    pub model: String,
    /// Total spend above which a high_spend alert is injected
    pub high_spend_threshold: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mock_mode: false,
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            high_spend_threshold: Decimal::from(200),
        }
    }
}

impl Config {
    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            mock_mode: std::env::var("MOCK_MODE")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            api_key: std::env::var("AI_API_KEY").ok().filter(|k| !k.is_empty()),
            api_base: std::env::var("AI_API_BASE").unwrap_or(defaults.api_base),
            model: std::env::var("AI_MODEL").unwrap_or(defaults.model),
            high_spend_threshold: std::env::var("HIGH_SPEND_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.high_spend_threshold),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
