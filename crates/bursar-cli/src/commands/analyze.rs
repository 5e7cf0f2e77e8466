//! Analyze command
//!
//! Runs the full pipeline offline with the mock backend: useful for trying
//! the service without a credential or a running server.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;

use bursar_core::{
    build_finance_prompt, normalize_response, Config, FinanceRequest, MockBackend, ModelBackend,
};

/// Analyze a finance request file and print the response as pretty JSON
pub async fn cmd_analyze(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let request: FinanceRequest =
        serde_json::from_str(&text).with_context(|| format!("invalid request in {}", file.display()))?;

    if request.expenses.is_empty() {
        bail!("request must contain at least one expense");
    }

    let total_spent: Decimal = request.expenses.iter().map(|e| e.amount).sum();
    let config = Config::from_env();

    let backend = MockBackend::new();
    let prompt = build_finance_prompt(&request);
    let raw = backend.analyze(&prompt).await?;
    let response = normalize_response(
        &raw,
        total_spent,
        &request.expenses,
        config.high_spend_threshold,
    )?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
