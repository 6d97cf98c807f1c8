use anyhow::{anyhow, Result};
use log::debug;

use crate::cli_args::Cli;
use crate::config::Config;
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;
use crate::llm::{LlmClient, NoopClient};

/// Build the LLM client based on CLI + config.
pub fn build_llm_client(cli: &Cli, cfg: &Config) -> Result<Box<dyn LlmClient>> {
    if cli.no_model || cfg.model.eq_ignore_ascii_case("none") {
        debug!("Using NoopClient (no model calls)");
        return Ok(Box::new(NoopClient));
    }

    if cli.ollama {
        debug!(
            "Using OllamaClient at {} with model {}",
            cfg.ollama_url, cfg.model
        );
        return Ok(Box::new(OllamaClient::new(
            cfg.ollama_url.clone(),
            cfg.model.clone(),
        )));
    }

    let key = cfg.api_key.clone().ok_or_else(|| {
        anyhow!("OPENAI_API_KEY (or --api-key) is required unless --no-model or --ollama is used")
    })?;

    debug!("Using OpenAiClient with model {}", cfg.model);
    Ok(Box::new(OpenAiClient::new(
        key,
        cfg.model.clone(),
        cfg.api_base_url.clone(),
    )))
}
