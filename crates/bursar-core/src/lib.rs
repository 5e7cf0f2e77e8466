//! Bursar Core Library
//!
//! Shared functionality for the Bursar student finance analysis service:
//! - Request/response data model with fixed-point currency amounts
//! - Deterministic prompt builder for model analysis
//! - Pluggable model backends (OpenAI-compatible, offline mock)
//! - Response normalizer: untrusted model JSON -> validated response
//! - Process configuration read once from the environment

pub mod ai;
pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod prompt;

pub use ai::{MockBackend, ModelBackend, ModelClient, OpenAiBackend};
pub use config::Config;
pub use error::{Error, Result};
pub use models::{
    Alert, Category, CategorySummary, Expense, FinanceRequest, FinanceResponse, Summary,
};
pub use normalizer::normalize_response;
pub use prompt::build_finance_prompt;
