use crate::core::calculator::{payment_breakdown, result_from_breakdown};
use crate::core::prompt::build_prompt;
use crate::domain::model::{AffordabilityReport, AffordabilityRequest};
use crate::domain::ports::ExplanationProvider;
use crate::utils::error::Result;

/// Runs one calculation and, when an explainer is configured, asks it for a
/// narrative of the finished numbers.
pub struct AffordabilityEngine {
    explainer: Option<Box<dyn ExplanationProvider>>,
}

impl AffordabilityEngine {
    pub fn new(explainer: Option<Box<dyn ExplanationProvider>>) -> Self {
        Self { explainer }
    }

    pub fn without_explanation() -> Self {
        Self::new(None)
    }

    pub fn explains(&self) -> bool {
        self.explainer.is_some()
    }

    pub async fn run(&self, request: &AffordabilityRequest) -> Result<AffordabilityReport> {
        // 計算必須先完成，解說只讀取結果
        let breakdown = payment_breakdown(request)?;
        let result = result_from_breakdown(request, &breakdown);
        tracing::info!(
            "🏠 Estimated payment {:.2} vs budget {:.2}: {}",
            result.estimated_monthly_payment,
            result.max_monthly_budget,
            result.status
        );

        let (explanation, model) = match &self.explainer {
            Some(explainer) => {
                let prompt = build_prompt(request, &result);
                tracing::info!("🤖 Requesting explanation from model {}", explainer.model());

                match explainer.explain(&prompt).await {
                    Ok(text) => (Some(text), Some(explainer.model().to_string())),
                    Err(e) => {
                        // 解說失敗不影響判定
                        tracing::warn!(
                            "⚠️ Explanation unavailable: {} ({})",
                            e,
                            e.recovery_suggestion()
                        );
                        (None, Some(explainer.model().to_string()))
                    }
                }
            }
            None => (None, None),
        };

        Ok(AffordabilityReport {
            request: *request,
            result,
            breakdown,
            explanation,
            model,
            generated_at: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::calculate_affordability;
    use crate::domain::model::{AffordabilityStatus, ExplanationPrompt};
    use crate::utils::error::AffordError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct RecordingExplainer {
        prompts: Arc<Mutex<Vec<ExplanationPrompt>>>,
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl ExplanationProvider for RecordingExplainer {
        async fn explain(&self, prompt: &ExplanationPrompt) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.clone());
            self.reply
                .clone()
                .map_err(|message| AffordError::ExplanationError { message })
        }

        fn model(&self) -> &str {
            "recording"
        }
    }

    struct CountingExplainer(Arc<AtomicUsize>);

    #[async_trait]
    impl ExplanationProvider for CountingExplainer {
        async fn explain(&self, _prompt: &ExplanationPrompt) -> Result<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("never".to_string())
        }

        fn model(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_run_without_explainer() {
        let engine = AffordabilityEngine::without_explanation();
        let request = AffordabilityRequest::default();

        let report = engine.run(&request).await.unwrap();

        assert!(!engine.explains());
        assert_eq!(report.result, calculate_affordability(&request).unwrap());
        assert_eq!(report.explanation, None);
        assert_eq!(report.model, None);
    }

    #[tokio::test]
    async fn test_explainer_sees_final_numbers() {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let engine = AffordabilityEngine::new(Some(Box::new(RecordingExplainer {
            prompts: prompts.clone(),
            reply: Ok("Step 1: monthly income is $10000.".to_string()),
        })));

        let report = engine.run(&AffordabilityRequest::default()).await.unwrap();

        assert_eq!(
            report.explanation.as_deref(),
            Some("Step 1: monthly income is $10000.")
        );
        assert_eq!(report.model.as_deref(), Some("recording"));

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].user_message.contains("- Max Monthly Budget: $3700.00"));
    }

    #[tokio::test]
    async fn test_explainer_failure_keeps_verdict() {
        let engine = AffordabilityEngine::new(Some(Box::new(RecordingExplainer {
            prompts: Arc::new(Mutex::new(Vec::new())),
            reply: Err("model offline".to_string()),
        })));
        let request = AffordabilityRequest::new(60_000.0, 3_000.0, 200_000.0);

        let report = engine.run(&request).await.unwrap();

        assert_eq!(report.result.status, AffordabilityStatus::NotAffordable);
        assert_eq!(report.explanation, None);
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_explainer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = AffordabilityEngine::new(Some(Box::new(CountingExplainer(calls.clone()))));
        let request = AffordabilityRequest::default().with_term_years(0);

        let result = engine.run(&request).await;

        assert!(matches!(result, Err(AffordError::InvalidInput { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
