pub mod ollama;
pub mod openai;
mod prompt_builder;
mod prompts;

use anyhow::Result;

use crate::git::ChangedFile;

/// Everything the model sees for one generation attempt. Assembled once and
/// reused verbatim across regenerate attempts.
#[derive(Debug, Clone)]
pub struct PrRequest {
    pub base_branch: String,
    pub from_branch: String,
    pub commits: Vec<String>,
    pub files: Vec<ChangedFile>,
    pub stats: String,
    /// Already filtered and compacted.
    pub diff: String,
}

/// Trait for talking to an LLM (real or canned backend).
pub trait LlmClient: Send + Sync {
    /// Produce the raw reply text for a PR description request. The reply
    /// should contain a JSON object but is not trusted to; coercion happens
    /// downstream.
    fn generate_pr(&self, request: &PrRequest) -> Result<String>;
}

/// No-op / canned model client for development with --no-model.
pub struct NoopClient;

impl LlmClient for NoopClient {
    fn generate_pr(&self, request: &PrRequest) -> Result<String> {
        Ok(format!(
            "{{\"title\": \"Dummy PR description for testing\", \"type\": \"chore\", \
             \"summary\": \"Canned response; model calls are disabled. {count} commit(s) against {base}.\", \
             \"changes\": [\"(LLM disabled)\"], \"breaking_changes\": [], \"testing\": \"\", \"notes\": \"\"}}",
            count = request.commits.len(),
            base = request.base_branch,
        ))
    }
}
