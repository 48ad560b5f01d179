pub mod toml_config;

use crate::adapters::llm::ChatCompletionsConfig;
use crate::core::report::OutputFormat;
use crate::domain::model::{FallbackPolicy, RawInputs};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

/// Command line flags. Loan parameters stay raw text so that parse failures
/// go through the same fallback policy as interactive answers.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "mortgage-cot"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Mortgage affordability check with an optional step-by-step explanation")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, help = "Gross annual income"))]
    pub annual_income: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Existing recurring monthly debt payments"))]
    pub monthly_debt: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Price of the home"))]
    pub home_price: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Down payment, percent of price [default: 20]"))]
    pub down_payment_percent: Option<String>,

    #[cfg_attr(feature = "cli", arg(long = "rate", help = "Annual interest rate, percent [default: 6.5]"))]
    pub annual_rate_percent: Option<String>,

    #[cfg_attr(feature = "cli", arg(long = "term-years", help = "Loan term in years [default: 30]"))]
    pub term_years: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Debt-to-income limit as a fraction [default: 0.43]"))]
    pub dti_limit: Option<String>,

    #[cfg_attr(
        feature = "cli",
        arg(long = "property-tax-rate", help = "Annual property tax, percent of price [default: 1.2]")
    )]
    pub property_tax_rate_percent: Option<String>,

    #[cfg_attr(
        feature = "cli",
        arg(long = "home-insurance-rate", help = "Annual insurance, percent of price [default: 0.5]")
    )]
    pub home_insurance_rate_percent: Option<String>,

    /// Path to a TOML profile
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub config: Option<String>,

    /// Prompt for income, debt, price, rate and term when not given
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub interactive: bool,

    /// Reject unparseable numbers instead of using defaults
    #[cfg_attr(feature = "cli", arg(long, conflicts_with = "lenient"))]
    pub strict: bool,

    /// Use the default for any number that does not parse
    #[cfg_attr(feature = "cli", arg(long))]
    pub lenient: bool,

    /// Ask the model for a step-by-step explanation
    #[cfg_attr(feature = "cli", arg(long, conflicts_with = "no_explain"))]
    pub explain: bool,

    #[cfg_attr(feature = "cli", arg(long))]
    pub no_explain: bool,

    /// OpenAI-compatible base URL, e.g. http://localhost:11434/v1
    #[cfg_attr(feature = "cli", arg(long))]
    pub llm_endpoint: Option<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub llm_model: Option<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub llm_api_key: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value = "text"))]
    pub format: OutputFormat,

    #[cfg_attr(feature = "cli", arg(short, long, help = "Enable verbose output"))]
    pub verbose: bool,
}

impl CliConfig {
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            annual_income: self.annual_income.clone(),
            monthly_debt: self.monthly_debt.clone(),
            home_price: self.home_price.clone(),
            down_payment_percent: self.down_payment_percent.clone(),
            annual_rate_percent: self.annual_rate_percent.clone(),
            term_years: self.term_years.clone(),
            dti_limit: self.dti_limit.clone(),
            property_tax_rate_percent: self.property_tax_rate_percent.clone(),
            home_insurance_rate_percent: self.home_insurance_rate_percent.clone(),
        }
    }

    pub fn load_profile(&self) -> Result<Option<TomlConfig>> {
        self.config
            .as_deref()
            .map(TomlConfig::from_file)
            .transpose()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_non_empty_string("config", path)?;
        }
        if let Some(endpoint) = &self.llm_endpoint {
            validate_url("llm_endpoint", endpoint)?;
        }
        if let Some(model) = &self.llm_model {
            validate_non_empty_string("llm_model", model)?;
        }
        Ok(())
    }
}

/// Command line flags layered over an optional profile over built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub inputs: RawInputs,
    pub policy: FallbackPolicy,
    pub interactive: bool,
    pub explain: bool,
    pub llm: ChatCompletionsConfig,
    pub format: OutputFormat,
    pub verbose: bool,
    pub log_level: Option<String>,
    pub json_logs: bool,
    /// `${VAR}` placeholder left in the profile's api_key, reported once logging is up.
    pub unresolved_api_key: Option<String>,
}

impl Settings {
    pub fn resolve(cli: &CliConfig, profile: Option<&TomlConfig>) -> Self {
        let profile_inputs = profile.map(TomlConfig::raw_inputs).unwrap_or_default();
        let inputs = cli.raw_inputs().or(profile_inputs);

        let interactive = cli.interactive
            || profile
                .and_then(|p| p.input.interactive)
                .unwrap_or(false);

        // 互動模式沿用「解析失敗就用預設值」的行為
        let policy = if cli.strict {
            FallbackPolicy::Strict
        } else if cli.lenient {
            FallbackPolicy::DefaultOnParseError
        } else if let Some(policy) = profile.and_then(TomlConfig::fallback_policy) {
            policy
        } else if interactive {
            FallbackPolicy::DefaultOnParseError
        } else {
            FallbackPolicy::Strict
        };

        let explain = if cli.no_explain {
            false
        } else {
            cli.explain || profile.map(TomlConfig::explanation_enabled).unwrap_or(false)
        };

        let mut llm = profile
            .map(TomlConfig::llm_config)
            .unwrap_or_default();
        if let Some(endpoint) = &cli.llm_endpoint {
            llm.base_url = endpoint.clone();
        }
        if let Some(model) = &cli.llm_model {
            llm.model = model.clone();
        }
        if let Some(api_key) = &cli.llm_api_key {
            llm.api_key = Some(api_key.clone());
        }

        // 只有要呼叫模型且沒有金鑰時才需要提醒
        let unresolved_api_key = if explain && llm.api_key.is_none() {
            profile
                .and_then(TomlConfig::unresolved_api_key)
                .map(str::to_string)
        } else {
            None
        };

        Self {
            inputs,
            policy,
            interactive,
            explain,
            llm,
            format: cli.format,
            verbose: cli.verbose,
            log_level: profile.and_then(|p| p.logging.level.clone()),
            json_logs: profile.and_then(|p| p.logging.json).unwrap_or(false),
            unresolved_api_key,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        if self.explain {
            self.llm.validate()?;
        }
        Ok(())
    }
}
