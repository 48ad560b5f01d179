use crate::domain::model::{AffordabilityRequest, AffordabilityResult, ExplanationPrompt};

pub const SYSTEM_PROMPT: &str = "You are a mortgage affordability assistant.

Instructions:
Walk through the math step-by-step to explain *why* the system determined the affordability status.
IMPORTANT: Use plain text only for calculations. Do NOT use LaTeX formatting (e.g., no \\[ or \\frac).
1. Calculate monthly gross income.
2. Verify the max total debt allowed.
3. Explain the remaining budget for a mortgage.
4. Compare the estimated payment to the budget.";

/// Builds the chain-of-thought prompt for a finished calculation.
///
/// The three computed values are embedded as-is (payments at cent
/// precision); the model is asked to explain them, not to recompute them.
pub fn build_prompt(
    request: &AffordabilityRequest,
    result: &AffordabilityResult,
) -> ExplanationPrompt {
    let user_message = format!(
        "User inputs:
- Annual income: ${}
- Monthly debt: ${}
- Home price: ${}
- Down payment: {}%
- Interest rate: {}%
- Term: {} years
- DTI limit: {}
- Property tax rate: {}%
- Home insurance rate: {}%

The system has pre-calculated the following:
- Estimated Monthly Payment: ${:.2}
- Max Monthly Budget: ${:.2}
- Affordability: {}

Answer: Let's think step by step.",
        request.annual_income,
        request.monthly_debt,
        request.home_price,
        request.down_payment_percent,
        request.annual_rate_percent,
        request.term_years,
        request.dti_limit,
        request.property_tax_rate_percent,
        request.home_insurance_rate_percent,
        result.estimated_monthly_payment,
        result.max_monthly_budget,
        result.status,
    );

    ExplanationPrompt {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_message,
    }
}
