pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::console::ConsoleInput;
pub use adapters::input::build_request;
pub use adapters::llm::{ChatCompletionsConfig, ChatCompletionsExplainer};
pub use config::{toml_config::TomlConfig, CliConfig, Settings};
pub use crate::core::calculator::{calculate_affordability, payment_breakdown};
pub use crate::core::engine::AffordabilityEngine;
pub use crate::core::report::OutputFormat;
pub use domain::model::{
    AffordabilityReport, AffordabilityRequest, AffordabilityResult, AffordabilityStatus,
    FallbackPolicy, PaymentBreakdown, RawInputs,
};
pub use utils::error::{AffordError, Result};
