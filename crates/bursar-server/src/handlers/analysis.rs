//! Finance analysis handlers
//!
//! The sole place where errors become HTTP status codes and where requests
//! are logged; the core stays pure.

use std::sync::Arc;

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::info;

use bursar_core::{build_finance_prompt, normalize_response, Error, ModelBackend};
use bursar_core::{FinanceRequest, FinanceResponse};

use crate::{AppError, AppState, SERVICE_NAME};

/// GET /health - Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
    }))
}

/// POST /feature - Analyse a student's expenses
///
/// Validates the request shape, computes the exact spend total, builds the
/// prompt, invokes the model backend, and normalizes the reply.
pub async fn analyse_finances(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FinanceRequest>,
) -> Result<Json<FinanceResponse>, AppError> {
    if request.expenses.is_empty() {
        return Err(Error::InvalidRequest("at least one expense is required".into()).into());
    }
    if let Some(bad) = request.expenses.iter().find(|e| e.amount <= Decimal::ZERO) {
        return Err(Error::InvalidRequest(format!(
            "expense amounts must be positive, got {} for \"{}\"",
            bad.amount, bad.description
        ))
        .into());
    }

    info!(
        student_id = %request.student_id,
        expenses = request.expenses.len(),
        "finance analysis requested"
    );

    // Exact fixed-point sum, computed before anything is handed to the model
    let total_spent: Decimal = request.expenses.iter().map(|e| e.amount).sum();

    let prompt = build_finance_prompt(&request);
    let raw = state.model.analyze(&prompt).await?;
    let response = normalize_response(
        &raw,
        total_spent,
        &request.expenses,
        state.config.high_spend_threshold,
    )?;

    info!(
        student_id = %request.student_id,
        risk = ?response.summary.risk_level,
        alerts = response.alerts.len(),
        "finance analysis complete"
    );

    Ok(Json(response))
}
