use thiserror::Error;

#[derive(Error, Debug)]
pub enum AffordError {
    #[error("Invalid input for '{field}' ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not parse '{field}' from '{value}': {reason}")]
    ParseError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Explanation request failed: {message}")]
    ExplanationError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Network,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AffordError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        AffordError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AffordError::InvalidInput { .. } | AffordError::ParseError { .. } => {
                ErrorCategory::Input
            }
            AffordError::ExplanationError { .. } | AffordError::ApiError(_) => {
                ErrorCategory::Network
            }
            AffordError::CsvError(_)
            | AffordError::IoError(_)
            | AffordError::SerializationError(_) => ErrorCategory::Output,
            AffordError::ConfigError { .. }
            | AffordError::ConfigValidationError { .. }
            | AffordError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤可重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AffordError::InvalidInput { field, .. } => format!(
                "Check the value given for '{}' (income, price and term must be positive, percentages within range)",
                field
            ),
            AffordError::ParseError { field, .. } => format!(
                "Enter a plain number for '{}', or leave it blank to use the default",
                field
            ),
            AffordError::ExplanationError { .. } | AffordError::ApiError(_) => {
                "Check the LLM endpoint, model name and API key, or run with --no-explain"
                    .to_string()
            }
            AffordError::CsvError(_) | AffordError::SerializationError(_) => {
                "Try a different --format".to_string()
            }
            AffordError::IoError(_) => "Check file paths and permissions".to_string(),
            AffordError::ConfigError { .. }
            | AffordError::ConfigValidationError { .. }
            | AffordError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or the corresponding command line flag".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AffordError::InvalidInput { field, value, reason } => {
                format!("The value '{}' for {} is not usable: {}", value, field, reason)
            }
            AffordError::ParseError { field, value, .. } => {
                format!("'{}' is not a valid number for {}", value, field)
            }
            AffordError::ExplanationError { .. } | AffordError::ApiError(_) => {
                "The explanation service could not be reached".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AffordError>;
