//! Mortgage affordability arithmetic.
//!
//! Everything here is a pure function of an [`AffordabilityRequest`]: no I/O,
//! no logging, no rounding. Callers format to currency precision themselves.

use crate::domain::model::{
    AffordabilityRequest, AffordabilityResult, AffordabilityStatus, PaymentBreakdown,
};
use crate::utils::error::{AffordError, Result};
use crate::utils::validation::{
    require_finite, require_non_negative, require_positive, require_within, Validate,
};

impl Validate for AffordabilityRequest {
    fn validate(&self) -> Result<()> {
        require_positive("annual_income", self.annual_income)?;
        // 負債不做範圍檢查，只要求是有限數
        require_finite("monthly_debt", self.monthly_debt)?;
        require_positive("home_price", self.home_price)?;
        require_within("down_payment_percent", self.down_payment_percent, 0.0, 100.0)?;
        require_non_negative("annual_rate_percent", self.annual_rate_percent)?;
        if self.term_years == 0 {
            return Err(AffordError::invalid_input(
                "term_years",
                self.term_years,
                "must be at least one year",
            ));
        }
        if self.term_years.checked_mul(12).is_none() {
            return Err(AffordError::invalid_input(
                "term_years",
                self.term_years,
                "too many monthly payments",
            ));
        }
        require_positive("dti_limit", self.dti_limit)?;
        require_within("dti_limit", self.dti_limit, 0.0, 1.0)?;
        require_non_negative("property_tax_rate_percent", self.property_tax_rate_percent)?;
        require_non_negative(
            "home_insurance_rate_percent",
            self.home_insurance_rate_percent,
        )?;
        Ok(())
    }
}

/// Fixed-rate, fully amortizing monthly payment.
///
/// A zero rate amortizes linearly instead of going through the annuity
/// formula, whose denominator is zero at `monthly_rate == 0`.
pub fn monthly_principal_and_interest(loan_amount: f64, monthly_rate: f64, n_payments: u32) -> f64 {
    let n = f64::from(n_payments);
    if monthly_rate == 0.0 {
        return loan_amount / n;
    }
    // 1 - (1 + r)^-n，用 ln_1p/exp_m1 避免極小利率時的抵銷誤差
    let denominator = -(-n * monthly_rate.ln_1p()).exp_m1();
    if denominator == 0.0 {
        return loan_amount / n;
    }
    loan_amount * monthly_rate / denominator
}

/// Validates `request` and returns every intermediate figure of the calculation.
pub fn payment_breakdown(request: &AffordabilityRequest) -> Result<PaymentBreakdown> {
    request.validate()?;

    // 1. 貸款本金
    let down_payment = request.home_price * (request.down_payment_percent / 100.0);
    let loan_amount = request.home_price - down_payment;

    // 2. 每月本息
    let monthly_rate = request.annual_rate_percent / 100.0 / 12.0;
    let n_payments = request.term_years * 12;
    let principal_and_interest =
        monthly_principal_and_interest(loan_amount, monthly_rate, n_payments);

    // 3. 稅金與保險（年費率按月攤）
    let property_tax = request.home_price * (request.property_tax_rate_percent / 100.0) / 12.0;
    let home_insurance =
        request.home_price * (request.home_insurance_rate_percent / 100.0) / 12.0;

    // 5. DTI 上限
    let monthly_gross_income = request.annual_income / 12.0;
    let max_total_debt = monthly_gross_income * request.dti_limit;

    Ok(PaymentBreakdown {
        down_payment,
        loan_amount,
        monthly_rate,
        n_payments,
        principal_and_interest,
        property_tax,
        home_insurance,
        monthly_gross_income,
        max_total_debt,
    })
}

pub(crate) fn result_from_breakdown(
    request: &AffordabilityRequest,
    breakdown: &PaymentBreakdown,
) -> AffordabilityResult {
    let estimated_monthly_payment = breakdown.total_monthly_payment();
    // 可能為負數，不做下限
    let max_monthly_budget = breakdown.max_monthly_budget(request.monthly_debt);

    let status = if estimated_monthly_payment <= max_monthly_budget {
        AffordabilityStatus::Affordable
    } else {
        AffordabilityStatus::NotAffordable
    };

    AffordabilityResult {
        status,
        estimated_monthly_payment,
        max_monthly_budget,
    }
}

/// Decides whether the PITI payment for `request` fits under the buyer's DTI budget.
///
/// Fails with [`AffordError::InvalidInput`] before any arithmetic when the
/// request violates a precondition; no partial result is ever returned.
pub fn calculate_affordability(request: &AffordabilityRequest) -> Result<AffordabilityResult> {
    let breakdown = payment_breakdown(request)?;
    Ok(result_from_breakdown(request, &breakdown))
}
