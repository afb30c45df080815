//! Advisor client abstraction and provider implementations.
//!
//! The service treats the model as an opaque function: prompt in, text out,
//! or failure. Everything downstream of the raw text lives in the
//! reconciliation pipeline, so providers stay thin.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// Lets callers keep a handle on a shared client (tests inspect the mock
// after handing it to the runtime).
#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for std::sync::Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

// Generation parameters biasing the model toward deterministic output.
const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.8;
const TOP_K: u32 = 20;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Google Generative Language API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("could not build HTTP client")?;

        Ok(Self { client, api_key, base_url: GEMINI_BASE_URL.to_string(), model: model.into() })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let request_body = GeminiRequest {
            contents: vec![GeminiContent { parts: vec![GeminiPart { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await
            .context("gemini request failed")?
            .error_for_status()
            .context("gemini returned an error status")?;

        let payload: GeminiResponse =
            response.json().await.context("could not decode gemini response")?;

        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| anyhow!("gemini returned no text content"))
    }
}

/// Client for a local Ollama daemon (`/api/generate`).
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("could not build HTTP client")?;

        Ok(Self { client, base_url: base_url.into(), model: model.into() })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));

        let request_body = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions { temperature: TEMPERATURE, top_p: TOP_P, top_k: TOP_K },
        };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .context("ollama request failed")?
            .error_for_status()
            .context("ollama returned an error status")?;

        let payload: OllamaResponse =
            response.json().await.context("could not decode ollama response")?;

        Ok(payload.response)
    }
}

/// Scripted test double. Returns queued responses in FIFO order and records
/// every prompt, so tests can assert both what the pipeline sent and that no
/// call happened at all. Lives outside `#[cfg(test)]` because server-crate
/// tests drive the pipeline through it.
#[derive(Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl MockLlmClient {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// A client whose every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|prompts| prompts.len()).unwrap_or(0)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|prompts| prompts.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(message) = &self.failure {
            bail!("{message}");
        }

        match self.responses.lock().ok().and_then(|mut responses| responses.pop_front()) {
            Some(response) => Ok(response),
            None => bail!("mock llm client has no scripted response left"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LlmClient, MockLlmClient};

    #[tokio::test]
    async fn mock_returns_responses_in_order_and_records_prompts() {
        let mock = MockLlmClient::new(vec!["[1]".to_string(), "[2]".to_string()]);

        assert_eq!(mock.complete("first prompt").await.unwrap(), "[1]");
        assert_eq!(mock.complete("second prompt").await.unwrap(), "[2]");
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.prompts(), vec!["first prompt", "second prompt"]);
    }

    #[tokio::test]
    async fn exhausted_mock_fails_instead_of_panicking() {
        let mock = MockLlmClient::new(Vec::new());
        assert!(mock.complete("prompt").await.is_err());
    }

    #[tokio::test]
    async fn failing_mock_reports_the_scripted_message() {
        let mock = MockLlmClient::failing("connection reset");
        let error = mock.complete("prompt").await.unwrap_err();
        assert!(error.to_string().contains("connection reset"));
        assert_eq!(mock.call_count(), 1);
    }
}
