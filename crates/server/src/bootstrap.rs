use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use shelfwise_agent::llm::{GeminiClient, LlmClient, OllamaClient};
use shelfwise_agent::runtime::RecommendationRuntime;
use shelfwise_core::catalog::{Catalog, CatalogError};
use shelfwise_core::config::{AppConfig, ConfigError, LlmProvider, LoadOptions};

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<RecommendationRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not read catalog file `{path}`: {source}")]
    CatalogRead { path: PathBuf, source: std::io::Error },
    #[error("catalog file `{path}` is invalid: {source}")]
    CatalogInvalid { path: PathBuf, source: CatalogError },
    #[error("llm client construction failed: {0}")]
    LlmClient(String),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = load_catalog(&config)?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        product_count = catalog.len(),
        source = if config.catalog.path.is_some() { "file" } else { "builtin" },
        "catalog loaded"
    );

    let llm = build_llm_client(&config)?;
    let runtime = Arc::new(RecommendationRuntime::new(Arc::new(catalog), llm));

    Ok(Application { config, runtime })
}

fn load_catalog(config: &AppConfig) -> Result<Catalog, BootstrapError> {
    match &config.catalog.path {
        Some(path) => {
            let raw = fs::read(path)
                .map_err(|source| BootstrapError::CatalogRead { path: path.clone(), source })?;
            Catalog::from_json_slice(&raw)
                .map_err(|source| BootstrapError::CatalogInvalid { path: path.clone(), source })
        }
        None => Ok(Catalog::builtin()),
    }
}

fn build_llm_client(config: &AppConfig) -> Result<Box<dyn LlmClient>, BootstrapError> {
    let timeout = Duration::from_secs(config.llm.timeout_secs);

    match config.llm.provider {
        LlmProvider::Gemini => {
            let api_key = config.llm.api_key.clone().ok_or_else(|| {
                BootstrapError::LlmClient(
                    "llm.api_key is required for the gemini provider".to_string(),
                )
            })?;
            let client = GeminiClient::new(api_key, config.llm.model.clone(), timeout)
                .map_err(|error| BootstrapError::LlmClient(error.to_string()))?;
            Ok(Box::new(client))
        }
        LlmProvider::Ollama => {
            let base_url = config.llm.base_url.clone().ok_or_else(|| {
                BootstrapError::LlmClient(
                    "llm.base_url is required for the ollama provider".to_string(),
                )
            })?;
            let client = OllamaClient::new(base_url, config.llm.model.clone(), timeout)
                .map_err(|error| BootstrapError::LlmClient(error.to_string()))?;
            Ok(Box::new(client))
        }
    }
}
