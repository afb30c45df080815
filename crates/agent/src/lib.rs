pub mod llm;
pub mod prompt;
pub mod runtime;

pub use llm::{GeminiClient, LlmClient, MockLlmClient, OllamaClient};
pub use prompt::build_recommendation_prompt;
pub use runtime::{Recommendation, RecommendationRuntime};
