use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "prdraft",
    version,
    about = "LLM-assisted pull request description generator"
)]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
pub struct Cli {
    /// Base branch to compare against; auto-detected (main/master/develop) if omitted
    pub base: Option<String>,

    /// Optional feature/source branch; defaults to current branch if omitted
    pub from: Option<String>,

    /// Model name to use (e.g. gpt-4o-mini)
    #[arg(long)]
    pub model: Option<String>,

    /// Disable model calls; use a canned response instead
    #[arg(long)]
    pub no_model: bool,

    /// API key (otherwise uses OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY")]
    pub api_key: Option<String>,

    /// Talk to a local Ollama server instead of OpenAI
    #[arg(long)]
    pub ollama: bool,

    /// Base URL of the Ollama server
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Extra exclusion pattern, appended to the configured set (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Character budget for the compacted diff sent to the model
    #[arg(long)]
    pub budget: Option<usize>,

    /// Write the markdown file immediately instead of showing the action menu
    #[arg(long)]
    pub save: bool,

    /// Output path override (defaults to {branch}_pr.md in the current directory)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
