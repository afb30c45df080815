use std::sync::Arc;

use anyhow::Result;

use shelfwise_core::catalog::Catalog;
use shelfwise_core::constraint::ConstraintExtractor;
use shelfwise_core::domain::product::{Category, Product};
use shelfwise_core::reconcile::{reconcile, ParseMode, ReconcileOutcome};

use crate::llm::LlmClient;
use crate::prompt::build_recommendation_prompt;

/// The shaped result of one pipeline run, ready for the HTTP layer.
#[derive(Clone, Debug)]
pub struct Recommendation {
    pub products: Vec<Product>,
    pub message: String,
    /// Fence-stripped advisor text, surfaced for diagnostics.
    pub ai_response: String,
    pub category: Option<Category>,
    pub outcome: ReconcileOutcome,
    pub parse_mode: ParseMode,
}

/// Per-request orchestration: constraint extraction runs independently of
/// the advisor call, and reconciliation combines both. Advisor transport
/// failure propagates untouched; advisor semantic misfires never do.
pub struct RecommendationRuntime {
    catalog: Arc<Catalog>,
    llm: Box<dyn LlmClient>,
    extractor: ConstraintExtractor,
}

impl RecommendationRuntime {
    pub fn new(catalog: Arc<Catalog>, llm: Box<dyn LlmClient>) -> Self {
        Self { catalog, llm, extractor: ConstraintExtractor::new() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn recommend(&self, user_input: &str) -> Result<Recommendation> {
        let constraint = self.extractor.extract(user_input);

        let prompt = build_recommendation_prompt(&self.catalog, user_input);
        let raw_response = self.llm.complete(&prompt).await?;
        let cleaned = strip_code_fences(&raw_response);

        let reconciliation = reconcile(&self.catalog, &constraint, &cleaned);

        Ok(Recommendation {
            products: reconciliation.products,
            message: reconciliation.message,
            ai_response: cleaned,
            category: constraint.category,
            outcome: reconciliation.outcome,
            parse_mode: reconciliation.parse_mode,
        })
    }
}

fn strip_code_fences(raw: &str) -> String {
    let without_fences = raw.replace("```json", "").replace("```", "");
    without_fences.trim().to_string()
}
