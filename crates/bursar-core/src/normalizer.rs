//! Response normalizer
//!
//! Turns the model's untrusted free-form reply into a guaranteed-shape
//! `FinanceResponse`, or a well-defined failure. The reply is parsed into a
//! `serde_json::Value` and projected field-by-field; every value the service
//! can compute deterministically (totals, averages, categorisation) is
//! recomputed here from the raw expenses and never trusted from the model.
//!
//! Pure function: no I/O, no logging. All failures are
//! `Error::InvalidResponseFormat` carrying the parse/validation detail.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Alert, Category, CategorySummary, Expense, FinanceResponse, Summary};

/// Advice returned when the model supplies none
pub const DEFAULT_ADVICE: &str = "Track weekly spending";

/// Message for the rule-injected high-spend alert
pub const HIGH_SPEND_MESSAGE: &str = "Weekly spending exceeds £200. Review ASK money advice.";

/// Reference link for the rule-injected high-spend alert
pub const HIGH_SPEND_URL: &str = "https://portal.lancaster.ac.uk/ask/money/";

/// Keyword table for deterministic categorisation
///
/// Tested in order; the first category with a matching keyword wins, so a
/// description containing both "food" and "shop" is food, not groceries.
/// Expenses matching nothing fall through to miscellaneous.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Food, &["food", "coffee", "restaurant", "takeaway", "meal"]),
    (Category::Transport, &["transport", "bus", "train"]),
    (Category::Rent, &["rent", "accommodation"]),
    (Category::Utilities, &["utility", "electricity", "water"]),
    (Category::Entertainment, &["entertainment", "movie", "game"]),
    (Category::Groceries, &["grocery", "supermarket", "shop"]),
];

/// Normalize a raw model reply into a validated `FinanceResponse`
///
/// `total_spent` is the exact sum of expense amounts, computed by the caller.
/// Totals above `high_spend_threshold` get a `high_spend` alert appended
/// after any model-supplied alerts.
pub fn normalize_response(
    raw: &str,
    total_spent: Decimal,
    expenses: &[Expense],
    high_spend_threshold: Decimal,
) -> Result<FinanceResponse> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::InvalidResponseFormat(format!("not valid JSON: {e}")))?;
    let reply = value.as_object().ok_or_else(|| {
        Error::InvalidResponseFormat(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        ))
    })?;

    // Inclusive day span: a single-day request spans 1 day, never 0.
    let days_span = days_span(expenses);
    let avg_daily_spend = if days_span > 0 {
        round_currency(total_spent / Decimal::from(days_span))
    } else {
        Decimal::ZERO
    };

    let categorisation = categorise_expenses(expenses);

    let mut alerts = match reply.get("alerts") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries.iter().map(parse_alert).collect::<Result<_>>()?,
        Some(other) => {
            return Err(Error::InvalidResponseFormat(format!(
                "\"alerts\" must be an array, got {}",
                json_type_name(other)
            )))
        }
    };
    if total_spent > high_spend_threshold {
        alerts.push(Alert {
            alert_type: "high_spend".to_string(),
            message: HIGH_SPEND_MESSAGE.to_string(),
            url: Some(HIGH_SPEND_URL.to_string()),
        });
    }

    let advice = parse_advice(reply.get("advice"))?;

    let summary = Summary {
        total_spent,
        avg_daily_spend,
        // Allow-list: these are the only model-supplied keys that survive.
        risk_level: reply.get("risk_level").cloned(),
        risk_factors: reply.get("risk_factors").cloned(),
    };

    Ok(FinanceResponse {
        summary,
        categorisation,
        alerts,
        advice,
    })
}

/// Pick the category for a lower-cased description/merchant text
pub fn categorise(text: &str) -> Category {
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return *category;
        }
    }
    Category::Miscellaneous
}

/// Partition every expense into exactly one category bucket
fn categorise_expenses(expenses: &[Expense]) -> CategorySummary {
    let mut summary = CategorySummary::default();
    for expense in expenses {
        let text = format!("{} {}", expense.description, expense.merchant).to_lowercase();
        summary.add(categorise(&text), round_currency(expense.amount));
    }
    summary
}

/// Inclusive span in days between the earliest and latest expense dates
fn days_span(expenses: &[Expense]) -> i64 {
    let min = expenses.iter().map(|e| e.date).min();
    let max = expenses.iter().map(|e| e.date).max();
    match (min, max) {
        (Some(min), Some(max)) => (max - min).num_days() + 1,
        _ => 0,
    }
}

fn parse_alert(value: &Value) -> Result<Alert> {
    let entry = value.as_object().ok_or_else(|| {
        Error::InvalidResponseFormat(format!(
            "alert entry must be an object, got {}",
            json_type_name(value)
        ))
    })?;

    let alert_type = entry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidResponseFormat("alert entry missing \"type\"".into()))?;
    let message = entry
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidResponseFormat("alert entry missing \"message\"".into()))?;
    let url = match entry.get("url") {
        None | Some(Value::Null) => None,
        Some(Value::String(url)) => Some(url.clone()),
        Some(other) => {
            return Err(Error::InvalidResponseFormat(format!(
                "alert \"url\" must be a string, got {}",
                json_type_name(other)
            )))
        }
    };

    Ok(Alert {
        alert_type: alert_type.to_string(),
        message: message.to_string(),
        url,
    })
}

fn parse_advice(value: Option<&Value>) -> Result<Vec<String>> {
    match value {
        None | Some(Value::Null) => Ok(vec![DEFAULT_ADVICE.to_string()]),
        Some(Value::Array(items)) if items.is_empty() => Ok(vec![DEFAULT_ADVICE.to_string()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_owned).ok_or_else(|| {
                    Error::InvalidResponseFormat(format!(
                        "advice entry must be a string, got {}",
                        json_type_name(item)
                    ))
                })
            })
            .collect(),
        Some(other) => Err(Error::InvalidResponseFormat(format!(
            "\"advice\" must be an array, got {}",
            json_type_name(other)
        ))),
    }
}

/// Round to the cent, halves away from zero
fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn expense(date: (i32, u32, u32), amount: Decimal, description: &str, merchant: &str) -> Expense {
        Expense {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            amount,
            description: description.to_string(),
            merchant: merchant.to_string(),
        }
    }

    fn threshold() -> Decimal {
        dec!(200)
    }

    #[test]
    fn test_normalize_valid_response() {
        let raw = r#"{
            "risk_level": "medium",
            "risk_factors": ["high food spend"],
            "total_spent": 250.00,
            "avg_daily_spend": 12.5,
            "alerts": [{"type": "food_risk", "message": "Check money advice", "url": "https://example.org/advice"}],
            "advice": ["Learn to cook simple meals in bulk."]
        }"#;
        let expenses = vec![expense((2025, 11, 25), dec!(75.00), "test", "test")];

        let response = normalize_response(raw, dec!(75.00), &expenses, threshold()).unwrap();

        assert_eq!(response.summary.risk_level, Some("medium".into()));
        assert!(!response.alerts.is_empty());
        assert!(response.advice[0].contains("cook"));
        // "test test" matches no keyword
        assert_eq!(response.categorisation.miscellaneous, dec!(75.00));
    }

    #[test]
    fn test_invalid_json_fails() {
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];
        let err = normalize_response("invalid json", dec!(100), &expenses, threshold()).unwrap_err();
        assert!(matches!(err, Error::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_non_object_json_fails() {
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];
        let err = normalize_response("[1, 2, 3]", dec!(10), &expenses, threshold()).unwrap_err();
        assert!(matches!(err, Error::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_partition_invariant() {
        let expenses = vec![
            expense((2025, 11, 24), dec!(12.30), "Coffee", "Campus Cafe"),
            expense((2025, 11, 24), dec!(45.99), "Weekly shop", "Aldi"),
            expense((2025, 11, 25), dec!(3.20), "Bus ticket", "Stagecoach"),
            expense((2025, 11, 26), dec!(120.00), "Rent instalment", "Unite Students"),
            expense((2025, 11, 26), dec!(8.75), "Mystery", "Somewhere"),
        ];
        let total: Decimal = expenses.iter().map(|e| e.amount).sum();

        let response = normalize_response("{}", total, &expenses, threshold()).unwrap();

        assert_eq!(response.categorisation.total(), total);
        assert_eq!(response.summary.total_spent, total);
    }

    #[test]
    fn test_priority_order_food_beats_groceries() {
        let expenses = vec![expense((2025, 11, 25), dec!(20), "food shop", "Tesco")];

        let response = normalize_response("{}", dec!(20), &expenses, threshold()).unwrap();

        assert_eq!(response.categorisation.food, dec!(20));
        assert_eq!(response.categorisation.groceries, Decimal::ZERO);
    }

    #[test]
    fn test_categorise_each_bucket() {
        assert_eq!(categorise("takeaway dinner"), Category::Food);
        assert_eq!(categorise("train to manchester"), Category::Transport);
        assert_eq!(categorise("student accommodation"), Category::Rent);
        assert_eq!(categorise("electricity bill"), Category::Utilities);
        assert_eq!(categorise("movie night"), Category::Entertainment);
        assert_eq!(categorise("local supermarket"), Category::Groceries);
        assert_eq!(categorise("textbook"), Category::Miscellaneous);
    }

    #[test]
    fn test_high_spend_alert_appended_last() {
        let raw = r#"{"alerts": [{"type": "food_risk", "message": "Watch food spend"}]}"#;
        let expenses = vec![expense((2025, 11, 25), dec!(250), "rent", "landlord")];

        let response = normalize_response(raw, dec!(250), &expenses, threshold()).unwrap();

        assert_eq!(response.alerts.len(), 2);
        assert_eq!(response.alerts[0].alert_type, "food_risk");
        let last = response.alerts.last().unwrap();
        assert_eq!(last.alert_type, "high_spend");
        assert_eq!(last.url.as_deref(), Some(HIGH_SPEND_URL));
    }

    #[test]
    fn test_no_high_spend_alert_at_threshold() {
        let expenses = vec![expense((2025, 11, 25), dec!(200), "rent", "landlord")];

        let response = normalize_response("{}", dec!(200), &expenses, threshold()).unwrap();

        assert!(response.alerts.is_empty());
    }

    #[test]
    fn test_summary_allow_list_drops_unknown_keys() {
        let raw = r#"{"risk_level": "low", "foo": "bar", "total_spent": 9999}"#;
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];

        let response = normalize_response(raw, dec!(10), &expenses, threshold()).unwrap();

        let summary = serde_json::to_value(&response.summary).unwrap();
        assert!(summary.get("foo").is_none());
        assert_eq!(summary["risk_level"], "low");
        // The model's total_spent is ignored in favour of the computed one
        assert_eq!(summary["total_spent"], 10.0);
    }

    #[test]
    fn test_days_span_single_day() {
        let expenses = vec![expense((2025, 11, 25), dec!(75.00), "test", "test")];

        let response = normalize_response("{}", dec!(75.00), &expenses, threshold()).unwrap();

        // One date => span of 1 day, so the average equals the total
        assert_eq!(response.summary.avg_daily_spend, dec!(75.00));
    }

    #[test]
    fn test_days_span_inclusive() {
        let expenses = vec![
            expense((2025, 11, 24), dec!(30), "a", "a"),
            expense((2025, 11, 26), dec!(60), "b", "b"),
        ];

        let response = normalize_response("{}", dec!(90), &expenses, threshold()).unwrap();

        // 24th..26th inclusive is 3 days
        assert_eq!(response.summary.avg_daily_spend, dec!(30));
    }

    #[test]
    fn test_avg_daily_spend_rounded_to_cents() {
        let expenses = vec![
            expense((2025, 11, 24), dec!(50), "a", "a"),
            expense((2025, 11, 26), dec!(50), "b", "b"),
        ];

        let response = normalize_response("{}", dec!(100), &expenses, threshold()).unwrap();

        // 100 / 3 = 33.333... -> 33.33
        assert_eq!(response.summary.avg_daily_spend, dec!(33.33));
    }

    #[test]
    fn test_alert_missing_message_fails() {
        let raw = r#"{"alerts": [{"type": "food_risk"}]}"#;
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];

        let err = normalize_response(raw, dec!(10), &expenses, threshold()).unwrap_err();
        assert!(matches!(err, Error::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_alert_missing_type_fails_whole_call() {
        // One bad entry poisons the call even when others are valid
        let raw = r#"{"alerts": [
            {"type": "ok", "message": "fine"},
            {"message": "no type"}
        ]}"#;
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];

        let err = normalize_response(raw, dec!(10), &expenses, threshold()).unwrap_err();
        assert!(matches!(err, Error::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_alerts_not_array_fails() {
        let raw = r#"{"alerts": "lots"}"#;
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];

        let err = normalize_response(raw, dec!(10), &expenses, threshold()).unwrap_err();
        assert!(matches!(err, Error::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_alert_url_null_treated_as_absent() {
        let raw = r#"{"alerts": [{"type": "t", "message": "m", "url": null}]}"#;
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];

        let response = normalize_response(raw, dec!(10), &expenses, threshold()).unwrap();
        assert_eq!(response.alerts[0].url, None);
    }

    #[test]
    fn test_advice_defaults_when_absent() {
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];

        let response = normalize_response("{}", dec!(10), &expenses, threshold()).unwrap();
        assert_eq!(response.advice, vec![DEFAULT_ADVICE.to_string()]);
    }

    #[test]
    fn test_advice_defaults_when_empty() {
        let raw = r#"{"advice": []}"#;
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];

        let response = normalize_response(raw, dec!(10), &expenses, threshold()).unwrap();
        assert_eq!(response.advice, vec![DEFAULT_ADVICE.to_string()]);
    }

    #[test]
    fn test_advice_non_string_entry_fails() {
        let raw = r#"{"advice": ["cook more", 42]}"#;
        let expenses = vec![expense((2025, 11, 25), dec!(10), "test", "test")];

        let err = normalize_response(raw, dec!(10), &expenses, threshold()).unwrap_err();
        assert!(matches!(err, Error::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_amounts_rounded_per_expense() {
        let expenses = vec![expense((2025, 11, 25), dec!(9.999), "coffee", "cafe")];

        let response = normalize_response("{}", dec!(9.999), &expenses, threshold()).unwrap();
        assert_eq!(response.categorisation.food, dec!(10.00));
    }
}
