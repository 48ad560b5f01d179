use crate::domain::model::AffordabilityReport;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    annual_income: f64,
    monthly_debt: f64,
    home_price: f64,
    down_payment_percent: f64,
    annual_rate_percent: f64,
    term_years: u32,
    dti_limit: f64,
    property_tax_rate_percent: f64,
    home_insurance_rate_percent: f64,
    status: &'a str,
    estimated_monthly_payment: f64,
    max_monthly_budget: f64,
}

pub fn render(report: &AffordabilityReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
        OutputFormat::Csv => render_csv(report),
    }
}

pub fn render_text(report: &AffordabilityReport) -> String {
    let request = &report.request;
    let breakdown = &report.breakdown;
    let result = &report.result;
    let mut out = String::new();

    // 寫入 String 不會失敗
    let _ = writeln!(out, "--- Mortgage Affordability ---");
    let _ = writeln!(out, "Annual income:        ${:.2}", request.annual_income);
    let _ = writeln!(out, "Monthly debt:         ${:.2}", request.monthly_debt);
    let _ = writeln!(out, "Home price:           ${:.2}", request.home_price);
    let _ = writeln!(
        out,
        "Down payment:         {}% (${:.2})",
        request.down_payment_percent, breakdown.down_payment
    );
    let _ = writeln!(out, "Loan amount:          ${:.2}", breakdown.loan_amount);
    let _ = writeln!(
        out,
        "Rate / term:          {}% over {} years ({} payments)",
        request.annual_rate_percent, request.term_years, breakdown.n_payments
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Principal & interest: ${:.2}",
        breakdown.principal_and_interest
    );
    let _ = writeln!(out, "Property tax:         ${:.2}", breakdown.property_tax);
    let _ = writeln!(out, "Home insurance:       ${:.2}", breakdown.home_insurance);
    let _ = writeln!(
        out,
        "Estimated payment:    ${:.2}",
        result.estimated_monthly_payment
    );
    let _ = writeln!(
        out,
        "Max monthly budget:   ${:.2} (DTI limit {})",
        result.max_monthly_budget, request.dti_limit
    );
    let _ = writeln!(out, "Affordability:        {}", result.status);

    if let Some(explanation) = &report.explanation {
        let _ = writeln!(out);
        match &report.model {
            Some(model) => {
                let _ = writeln!(out, "--- Explanation ({}) ---", model);
            }
            None => {
                let _ = writeln!(out, "--- Explanation ---");
            }
        }
        let _ = writeln!(out, "{}", explanation);
    }

    out
}

pub fn render_json(report: &AffordabilityReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_csv(report: &AffordabilityReport) -> Result<String> {
    let request = &report.request;
    let result = &report.result;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(CsvRow {
        annual_income: request.annual_income,
        monthly_debt: request.monthly_debt,
        home_price: request.home_price,
        down_payment_percent: request.down_payment_percent,
        annual_rate_percent: request.annual_rate_percent,
        term_years: request.term_years,
        dti_limit: request.dti_limit,
        property_tax_rate_percent: request.property_tax_rate_percent,
        home_insurance_rate_percent: request.home_insurance_rate_percent,
        status: result.status.as_str(),
        estimated_monthly_payment: result.estimated_monthly_payment,
        max_monthly_budget: result.max_monthly_budget,
    })?;

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
