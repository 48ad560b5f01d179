use crate::adapters::llm::ChatCompletionsConfig;
use crate::domain::model::{FallbackPolicy, RawInputs};
use crate::utils::error::{AffordError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A saved profile: default loan terms, input policy and model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub loan: LoanConfig,
    pub input: InputConfig,
    pub explanation: ExplanationConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanConfig {
    pub annual_income: Option<f64>,
    pub monthly_debt: Option<f64>,
    pub home_price: Option<f64>,
    pub down_payment_percent: Option<f64>,
    pub annual_rate_percent: Option<f64>,
    pub term_years: Option<i64>,
    pub dti_limit: Option<f64>,
    pub property_tax_rate_percent: Option<f64>,
    pub home_insurance_rate_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub interactive: Option<bool>,
    pub fallback: Option<FallbackPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationConfig {
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

fn is_placeholder(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AffordError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AffordError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AffordError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// [loan] 區段轉成原始輸入，交給輸入層統一解析與驗證
    pub fn raw_inputs(&self) -> RawInputs {
        let loan = &self.loan;
        RawInputs {
            annual_income: loan.annual_income.map(|v| v.to_string()),
            monthly_debt: loan.monthly_debt.map(|v| v.to_string()),
            home_price: loan.home_price.map(|v| v.to_string()),
            down_payment_percent: loan.down_payment_percent.map(|v| v.to_string()),
            annual_rate_percent: loan.annual_rate_percent.map(|v| v.to_string()),
            term_years: loan.term_years.map(|v| v.to_string()),
            dti_limit: loan.dti_limit.map(|v| v.to_string()),
            property_tax_rate_percent: loan.property_tax_rate_percent.map(|v| v.to_string()),
            home_insurance_rate_percent: loan.home_insurance_rate_percent.map(|v| v.to_string()),
        }
    }

    pub fn explanation_enabled(&self) -> bool {
        self.explanation.enabled.unwrap_or(false)
    }

    pub fn fallback_policy(&self) -> Option<FallbackPolicy> {
        self.input.fallback
    }

    /// 取得 LLM 設定，未指定的欄位使用預設值
    pub fn llm_config(&self) -> ChatCompletionsConfig {
        let defaults = ChatCompletionsConfig::default();
        let llm = &self.llm;

        let api_key = llm
            .api_key
            .as_deref()
            .filter(|key| !is_placeholder(key) && !key.trim().is_empty())
            .map(str::to_string);

        ChatCompletionsConfig {
            base_url: llm.endpoint.clone().unwrap_or(defaults.base_url),
            model: llm.model.clone().unwrap_or(defaults.model),
            api_key,
            temperature: llm.temperature.unwrap_or(defaults.temperature),
            max_tokens: llm.max_tokens.or(defaults.max_tokens),
            timeout_secs: llm.timeout_seconds.unwrap_or(defaults.timeout_secs),
            max_retries: llm.max_retries.unwrap_or(defaults.max_retries),
            retry_delay_ms: llm.retry_delay_ms.unwrap_or(defaults.retry_delay_ms),
        }
    }

    /// api_key 引用了未設定的環境變數時，回傳該佔位字串
    pub fn unresolved_api_key(&self) -> Option<&str> {
        self.llm.api_key.as_deref().filter(|key| is_placeholder(key))
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.explanation_enabled() {
            self.llm_config().validate()?;
        } else if let Some(endpoint) = &self.llm.endpoint {
            crate::utils::validation::validate_url("llm.endpoint", endpoint)?;
        }

        if let Some(level) = &self.logging.level {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.as_str()) {
                return Err(AffordError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
