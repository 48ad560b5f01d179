use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ANNUAL_INCOME: f64 = 120_000.0;
pub const DEFAULT_MONTHLY_DEBT: f64 = 600.0;
pub const DEFAULT_HOME_PRICE: f64 = 420_000.0;
pub const DEFAULT_DOWN_PAYMENT_PERCENT: f64 = 20.0;
pub const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 6.5;
pub const DEFAULT_TERM_YEARS: u32 = 30;
pub const DEFAULT_DTI_LIMIT: f64 = 0.43;
pub const DEFAULT_PROPERTY_TAX_RATE_PERCENT: f64 = 1.2;
pub const DEFAULT_HOME_INSURANCE_RATE_PERCENT: f64 = 0.5;

/// Inputs to a single affordability calculation.
///
/// Percentages are expressed as percent (`6.5` means 6.5%), except
/// `dti_limit` which is a fraction of gross monthly income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityRequest {
    pub annual_income: f64,
    pub monthly_debt: f64,
    pub home_price: f64,
    pub down_payment_percent: f64,
    pub annual_rate_percent: f64,
    pub term_years: u32,
    pub dti_limit: f64,
    pub property_tax_rate_percent: f64,
    pub home_insurance_rate_percent: f64,
}

impl AffordabilityRequest {
    /// Builds a request with the standard loan terms: 20% down, 6.5% over
    /// 30 years, 43% DTI, 1.2% property tax and 0.5% insurance.
    pub fn new(annual_income: f64, monthly_debt: f64, home_price: f64) -> Self {
        Self {
            annual_income,
            monthly_debt,
            home_price,
            down_payment_percent: DEFAULT_DOWN_PAYMENT_PERCENT,
            annual_rate_percent: DEFAULT_ANNUAL_RATE_PERCENT,
            term_years: DEFAULT_TERM_YEARS,
            dti_limit: DEFAULT_DTI_LIMIT,
            property_tax_rate_percent: DEFAULT_PROPERTY_TAX_RATE_PERCENT,
            home_insurance_rate_percent: DEFAULT_HOME_INSURANCE_RATE_PERCENT,
        }
    }

    pub fn with_down_payment_percent(mut self, percent: f64) -> Self {
        self.down_payment_percent = percent;
        self
    }

    pub fn with_rate(mut self, annual_rate_percent: f64) -> Self {
        self.annual_rate_percent = annual_rate_percent;
        self
    }

    pub fn with_term_years(mut self, term_years: u32) -> Self {
        self.term_years = term_years;
        self
    }

    pub fn with_dti_limit(mut self, dti_limit: f64) -> Self {
        self.dti_limit = dti_limit;
        self
    }

    pub fn with_property_tax_rate(mut self, percent: f64) -> Self {
        self.property_tax_rate_percent = percent;
        self
    }

    pub fn with_home_insurance_rate(mut self, percent: f64) -> Self {
        self.home_insurance_rate_percent = percent;
        self
    }
}

impl Default for AffordabilityRequest {
    fn default() -> Self {
        Self::new(
            DEFAULT_ANNUAL_INCOME,
            DEFAULT_MONTHLY_DEBT,
            DEFAULT_HOME_PRICE,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AffordabilityStatus {
    #[serde(rename = "affordable")]
    Affordable,
    #[serde(rename = "not affordable")]
    NotAffordable,
}

impl AffordabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AffordabilityStatus::Affordable => "affordable",
            AffordabilityStatus::NotAffordable => "not affordable",
        }
    }

    pub fn is_affordable(&self) -> bool {
        matches!(self, AffordabilityStatus::Affordable)
    }
}

impl fmt::Display for AffordabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub status: AffordabilityStatus,
    /// Full PITI payment per month.
    pub estimated_monthly_payment: f64,
    /// Income-derived ceiling minus existing debt. Negative when debt alone
    /// exceeds the DTI ceiling.
    pub max_monthly_budget: f64,
}

/// Intermediate figures of one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub monthly_rate: f64,
    pub n_payments: u32,
    pub principal_and_interest: f64,
    pub property_tax: f64,
    pub home_insurance: f64,
    pub monthly_gross_income: f64,
    pub max_total_debt: f64,
}

impl PaymentBreakdown {
    pub fn total_monthly_payment(&self) -> f64 {
        self.principal_and_interest + self.property_tax + self.home_insurance
    }

    pub fn max_monthly_budget(&self, monthly_debt: f64) -> f64 {
        self.max_total_debt - monthly_debt
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationPrompt {
    pub system_prompt: String,
    pub user_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AffordabilityReport {
    pub request: AffordabilityRequest,
    pub result: AffordabilityResult,
    pub breakdown: PaymentBreakdown,
    pub explanation: Option<String>,
    pub model: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Parameters as typed by a user or given on the command line, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInputs {
    pub annual_income: Option<String>,
    pub monthly_debt: Option<String>,
    pub home_price: Option<String>,
    pub down_payment_percent: Option<String>,
    pub annual_rate_percent: Option<String>,
    pub term_years: Option<String>,
    pub dti_limit: Option<String>,
    pub property_tax_rate_percent: Option<String>,
    pub home_insurance_rate_percent: Option<String>,
}

impl RawInputs {
    /// Fills every field that is still `None` from `other`.
    pub fn or(self, other: RawInputs) -> RawInputs {
        RawInputs {
            annual_income: self.annual_income.or(other.annual_income),
            monthly_debt: self.monthly_debt.or(other.monthly_debt),
            home_price: self.home_price.or(other.home_price),
            down_payment_percent: self.down_payment_percent.or(other.down_payment_percent),
            annual_rate_percent: self.annual_rate_percent.or(other.annual_rate_percent),
            term_years: self.term_years.or(other.term_years),
            dti_limit: self.dti_limit.or(other.dti_limit),
            property_tax_rate_percent: self
                .property_tax_rate_percent
                .or(other.property_tax_rate_percent),
            home_insurance_rate_percent: self
                .home_insurance_rate_percent
                .or(other.home_insurance_rate_percent),
        }
    }
}

/// What to do with text that does not parse as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Reject with a parse error.
    #[default]
    Strict,
    /// Substitute the documented default for that field.
    DefaultOnParseError,
}
