//! Mock backend for demo mode and testing
//!
//! Fabricates a model-shaped JSON reply locally without any network call:
//! scans the prompt for `£`-marked amounts, sums the ones that parse
//! (unparsable tokens are skipped silently), and classifies the total into a
//! three-tier risk level by fixed thresholds.

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::Result;

use super::ModelBackend;

/// Mock model backend
///
/// Never fails, whatever the prompt looks like. Risk thresholds are
/// configurable so tests can pin specific tiers.
#[derive(Clone, Debug)]
pub struct MockBackend {
    /// Totals above this are "high" risk
    high_threshold: Decimal,
    /// Totals above this (but not high) are "medium" risk
    medium_threshold: Decimal,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            high_threshold: Decimal::from(100),
            medium_threshold: Decimal::from(30),
        }
    }
}

impl MockBackend {
    /// Create a mock backend with the reference thresholds (high > 100,
    /// medium > 30)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock backend with custom risk thresholds
    pub fn with_thresholds(high: Decimal, medium: Decimal) -> Self {
        Self {
            high_threshold: high,
            medium_threshold: medium,
        }
    }

    /// Sum every parsable `£`-marked amount in the prompt
    fn total_from_prompt(&self, prompt: &str) -> Decimal {
        let mut total = Decimal::ZERO;
        for line in prompt.lines() {
            let Some(rest) = line.split('£').nth(1) else {
                continue;
            };
            let Some(token) = rest.split_whitespace().next() else {
                continue;
            };
            if let Ok(amount) = token.replace(',', "").parse::<Decimal>() {
                total += amount;
            }
        }
        total
    }

    fn risk_level(&self, total: Decimal) -> &'static str {
        if total > self.high_threshold {
            "high"
        } else if total > self.medium_threshold {
            "medium"
        } else {
            "low"
        }
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    async fn analyze(&self, prompt: &str) -> Result<String> {
        let total = self.total_from_prompt(prompt);
        let avg_daily = (total / Decimal::from(7))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let reply = serde_json::json!({
            "risk_level": self.risk_level(total),
            "risk_factors": [format!("Total spending: £{total:.2}")],
            "total_spent": total,
            "avg_daily_spend": avg_daily,
            "advice": [
                "Track spending weekly via this API",
                "Batch cook to save £20/week",
                "Use campus store discounts"
            ]
        });

        Ok(reply.to_string())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
