use crate::domain::model::*;
use crate::utils::error::{AffordError, Result};
use crate::utils::validation::Validate;
use std::str::FromStr;

/// 解析單一欄位：空白 → 預設值；解析失敗 → 依 policy 決定
fn parse_field<T>(field: &str, raw: Option<&str>, default: T, policy: FallbackPolicy) -> Result<T>
where
    T: FromStr + std::fmt::Display + Copy,
    T::Err: std::fmt::Display,
{
    let text = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(text) => text,
    };

    match text.parse::<T>() {
        Ok(value) => Ok(value),
        Err(e) => match policy {
            FallbackPolicy::Strict => Err(AffordError::ParseError {
                field: field.to_string(),
                value: text.to_string(),
                reason: e.to_string(),
            }),
            FallbackPolicy::DefaultOnParseError => {
                tracing::warn!(
                    "⚠️ Could not parse {} from '{}', using default {}",
                    field,
                    text,
                    default
                );
                Ok(default)
            }
        },
    }
}

fn parse_term_years(raw: Option<&str>, policy: FallbackPolicy) -> Result<u32> {
    // 先用有號整數解析，負數應該是 InvalidInput 而不是解析失敗
    let years = parse_field(
        "term_years",
        raw,
        i64::from(DEFAULT_TERM_YEARS),
        policy,
    )?;

    u32::try_from(years).map_err(|_| {
        AffordError::invalid_input("term_years", years, "must be a positive whole number of years")
    })
}

/// Turns raw text parameters into a validated [`AffordabilityRequest`].
///
/// Missing or blank fields take their documented defaults. Unparseable text
/// is rejected or defaulted according to `policy`. Values that parse but are
/// out of range are never coerced and fail with [`AffordError::InvalidInput`].
pub fn build_request(raw: &RawInputs, policy: FallbackPolicy) -> Result<AffordabilityRequest> {
    let request = AffordabilityRequest {
        annual_income: parse_field(
            "annual_income",
            raw.annual_income.as_deref(),
            DEFAULT_ANNUAL_INCOME,
            policy,
        )?,
        monthly_debt: parse_field(
            "monthly_debt",
            raw.monthly_debt.as_deref(),
            DEFAULT_MONTHLY_DEBT,
            policy,
        )?,
        home_price: parse_field(
            "home_price",
            raw.home_price.as_deref(),
            DEFAULT_HOME_PRICE,
            policy,
        )?,
        down_payment_percent: parse_field(
            "down_payment_percent",
            raw.down_payment_percent.as_deref(),
            DEFAULT_DOWN_PAYMENT_PERCENT,
            policy,
        )?,
        annual_rate_percent: parse_field(
            "annual_rate_percent",
            raw.annual_rate_percent.as_deref(),
            DEFAULT_ANNUAL_RATE_PERCENT,
            policy,
        )?,
        term_years: parse_term_years(raw.term_years.as_deref(), policy)?,
        dti_limit: parse_field(
            "dti_limit",
            raw.dti_limit.as_deref(),
            DEFAULT_DTI_LIMIT,
            policy,
        )?,
        property_tax_rate_percent: parse_field(
            "property_tax_rate_percent",
            raw.property_tax_rate_percent.as_deref(),
            DEFAULT_PROPERTY_TAX_RATE_PERCENT,
            policy,
        )?,
        home_insurance_rate_percent: parse_field(
            "home_insurance_rate_percent",
            raw.home_insurance_rate_percent.as_deref(),
            DEFAULT_HOME_INSURANCE_RATE_PERCENT,
            policy,
        )?,
    };

    request.validate()?;
    tracing::debug!("Built affordability request: {:?}", request);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(income: &str, debt: &str, price: &str) -> RawInputs {
        RawInputs {
            annual_income: Some(income.to_string()),
            monthly_debt: Some(debt.to_string()),
            home_price: Some(price.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_inputs_use_defaults() {
        let request = build_request(&RawInputs::default(), FallbackPolicy::Strict).unwrap();
        assert_eq!(request, AffordabilityRequest::default());
    }

    #[test]
    fn test_blank_text_uses_default() {
        let request = build_request(&raw("  ", "", "300000"), FallbackPolicy::Strict).unwrap();
        assert_eq!(request.annual_income, DEFAULT_ANNUAL_INCOME);
        assert_eq!(request.monthly_debt, DEFAULT_MONTHLY_DEBT);
        assert_eq!(request.home_price, 300_000.0);
    }

    #[test]
    fn test_strict_policy_rejects_garbage() {
        let err = build_request(&raw("lots", "600", "420000"), FallbackPolicy::Strict).unwrap_err();
        match err {
            AffordError::ParseError { field, value, .. } => {
                assert_eq!(field, "annual_income");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_lenient_policy_substitutes_default() {
        let request =
            build_request(&raw("lots", "600", "420000"), FallbackPolicy::DefaultOnParseError)
                .unwrap();
        assert_eq!(request.annual_income, DEFAULT_ANNUAL_INCOME);
    }

    #[test]
    fn test_out_of_range_is_never_coerced() {
        let mut inputs = raw("120000", "600", "420000");
        inputs.down_payment_percent = Some("150".to_string());

        for policy in [FallbackPolicy::Strict, FallbackPolicy::DefaultOnParseError] {
            assert!(matches!(
                build_request(&inputs, policy),
                Err(AffordError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_negative_term_is_invalid_input() {
        let mut inputs = raw("120000", "600", "420000");
        inputs.term_years = Some("-5".to_string());
        match build_request(&inputs, FallbackPolicy::DefaultOnParseError) {
            Err(AffordError::InvalidInput { field, .. }) => assert_eq!(field, "term_years"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_fractional_term_follows_policy() {
        let mut inputs = raw("120000", "600", "420000");
        inputs.term_years = Some("15.5".to_string());
        assert!(matches!(
            build_request(&inputs, FallbackPolicy::Strict),
            Err(AffordError::ParseError { .. })
        ));
        let request = build_request(&inputs, FallbackPolicy::DefaultOnParseError).unwrap();
        assert_eq!(request.term_years, DEFAULT_TERM_YEARS);
    }

    #[test]
    fn test_all_fields_are_parsed() {
        let inputs = RawInputs {
            annual_income: Some("95000".to_string()),
            monthly_debt: Some("250.5".to_string()),
            home_price: Some("310000".to_string()),
            down_payment_percent: Some("10".to_string()),
            annual_rate_percent: Some("5.75".to_string()),
            term_years: Some("15".to_string()),
            dti_limit: Some("0.36".to_string()),
            property_tax_rate_percent: Some("0.9".to_string()),
            home_insurance_rate_percent: Some("0.35".to_string()),
        };

        let request = build_request(&inputs, FallbackPolicy::Strict).unwrap();
        assert_eq!(
            request,
            AffordabilityRequest::new(95_000.0, 250.5, 310_000.0)
                .with_down_payment_percent(10.0)
                .with_rate(5.75)
                .with_term_years(15)
                .with_dti_limit(0.36)
                .with_property_tax_rate(0.9)
                .with_home_insurance_rate(0.35)
        );
    }
}
