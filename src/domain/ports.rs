use crate::domain::model::{ExplanationPrompt, RawInputs};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Supplies loan parameters that were not given up front.
pub trait InputSource {
    /// Returns `given` with any missing fields this source knows how to ask for filled in.
    fn collect(&mut self, given: RawInputs) -> Result<RawInputs>;
}

/// Produces a narrative for an already-finalized calculation.
#[async_trait]
pub trait ExplanationProvider: Send + Sync {
    async fn explain(&self, prompt: &ExplanationPrompt) -> Result<String>;

    fn model(&self) -> &str;
}
