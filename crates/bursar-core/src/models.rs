//! Data model for finance analysis requests and responses
//!
//! The request side (`FinanceRequest`, `Expense`) is deserialized from the
//! caller and treated as immutable. The response side (`FinanceResponse` and
//! friends) is only ever constructed by the normalizer; the model reply is
//! never deserialized directly into these types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single spending event
///
/// `description` and `merchant` are free text, used only for keyword-based
/// categorisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub merchant: String,
}

/// One analysis request
///
/// `expenses` must be non-empty; the request handler rejects empty lists
/// before any of the core logic runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRequest {
    pub student_id: String,
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub income_sources: Vec<String>,
}

/// The closed set of spending categories
///
/// Order matters: categorisation tests categories in declaration order and
/// the first keyword match wins, with `Miscellaneous` as the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Food,
    Transport,
    Rent,
    Utilities,
    Entertainment,
    Groceries,
    Miscellaneous,
}

/// Per-category spending totals
///
/// Every expense lands in exactly one bucket, so the sum of all fields always
/// equals the sum of the categorised expense amounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub food: Decimal,
    pub transport: Decimal,
    pub rent: Decimal,
    pub utilities: Decimal,
    pub entertainment: Decimal,
    pub groceries: Decimal,
    pub miscellaneous: Decimal,
}

impl CategorySummary {
    /// Add an amount to the given category's running total
    pub fn add(&mut self, category: Category, amount: Decimal) {
        match category {
            Category::Food => self.food += amount,
            Category::Transport => self.transport += amount,
            Category::Rent => self.rent += amount,
            Category::Utilities => self.utilities += amount,
            Category::Entertainment => self.entertainment += amount,
            Category::Groceries => self.groceries += amount,
            Category::Miscellaneous => self.miscellaneous += amount,
        }
    }

    /// Sum of all category buckets
    pub fn total(&self) -> Decimal {
        self.food
            + self.transport
            + self.rent
            + self.utilities
            + self.entertainment
            + self.groceries
            + self.miscellaneous
    }
}

/// A structured warning surfaced alongside advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Short machine-readable tag, e.g. "high_spend"
    #[serde(rename = "type")]
    pub alert_type: String,
    pub message: String,
    /// Optional reference link; omitted from JSON when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Spending summary with an explicit allow-list for model-supplied fields
///
/// `total_spent` and `avg_daily_spend` are always computed locally.
/// `risk_level` and `risk_factors` are the only keys copied from the model
/// reply; everything else the model sends at the top level is dropped. The
/// values are passed through untyped because risk semantics belong to the
/// model, not to this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_spent: Decimal,
    pub avg_daily_spend: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_factors: Option<serde_json::Value>,
}

/// The final analysis artifact returned to the caller
///
/// `alerts` is always present, possibly empty; model-supplied alerts come
/// first, rule-injected alerts after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceResponse {
    pub summary: Summary,
    pub categorisation: CategorySummary,
    pub alerts: Vec<Alert>,
    pub advice: Vec<String>,
}
