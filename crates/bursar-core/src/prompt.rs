//! Prompt builder
//!
//! Renders a `FinanceRequest` into the fixed natural-language prompt the
//! model analyzes. Pure and deterministic: the same request always produces
//! the same string, byte for byte.

use crate::models::FinanceRequest;

/// Build the analysis prompt for a finance request
///
/// One line per expense (`- <date>: £<amount> | <description> | <merchant>`,
/// amounts with two decimal places), the income sources (or "unknown"), and
/// the fixed analysis instructions.
pub fn build_finance_prompt(request: &FinanceRequest) -> String {
    let expenses_text = request
        .expenses
        .iter()
        .map(|e| {
            format!(
                "- {}: £{:.2} | {} | {}",
                e.date, e.amount, e.description, e.merchant
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let income_text = if request.income_sources.is_empty() {
        "unknown".to_string()
    } else {
        request.income_sources.join(", ")
    };

    format!(
        "Lancaster University student {student_id} expenses:\n{expenses_text}\n\
         \n\
         Income sources: {income_text}\n\
         \n\
         Analyse for:\n\
         1. Risky spending patterns (food > 40%, frequent takeaways)\n\
         2. Bursary/hardship fund eligibility signals.\n\
         3. Lancaster-specific savings (campus store, shuttles, bulk cooking).\n\
         4. Practical next steps.\n\
         \n\
         Return analysis as JSON only.",
        student_id = request.student_id,
    )
}
