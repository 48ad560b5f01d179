pub mod calculator;
pub mod engine;
pub mod prompt;
pub mod report;

pub use crate::domain::model::{AffordabilityReport, AffordabilityRequest, AffordabilityResult};
pub use crate::domain::ports::{ExplanationProvider, InputSource};
pub use crate::utils::error::Result;
