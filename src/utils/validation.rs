use crate::utils::error::{AffordError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AffordError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AffordError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AffordError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AffordError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AffordError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 比較永遠為 false，所以用否定形式
    if !(value >= min && value <= max) {
        return Err(AffordError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

// 以下為貸款參數的檢查，錯誤一律是 InvalidInput

pub fn require_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AffordError::invalid_input(
            field_name,
            value,
            "must be a finite number",
        ));
    }
    Ok(())
}

pub fn require_positive(field_name: &str, value: f64) -> Result<()> {
    require_finite(field_name, value)?;
    if value <= 0.0 {
        return Err(AffordError::invalid_input(
            field_name,
            value,
            "must be greater than zero",
        ));
    }
    Ok(())
}

pub fn require_non_negative(field_name: &str, value: f64) -> Result<()> {
    require_finite(field_name, value)?;
    if value < 0.0 {
        return Err(AffordError::invalid_input(
            field_name,
            value,
            "must not be negative",
        ));
    }
    Ok(())
}

pub fn require_within(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    require_finite(field_name, value)?;
    if value < min || value > max {
        return Err(AffordError::invalid_input(
            field_name,
            value,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
