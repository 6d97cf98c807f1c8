use crate::cli_args::Cli;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Built-in exclusions: lockfiles, minified and bundled assets, build-output
/// directories, source maps, and generated-file markers.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "composer.lock",
    "Gemfile.lock",
    "poetry.lock",
    "go.sum",
    "*.min.js",
    "*.min.css",
    "*.bundle.js",
    "*.map",
    "dist/*",
    "build/*",
    "out/*",
    "target/*",
    "node_modules/*",
    "vendor/*",
    "coverage/*",
    "*.generated.*",
];

const DEFAULT_DIFF_BUDGET: usize = 8000;

/// Final resolved configuration for prdraft.
///
/// The exclusion list is an immutable snapshot for the whole run; the
/// pipeline never consults ambient state.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: String,
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub ollama_url: String,
    pub diff_budget: usize,
    pub excludes: Vec<String>,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--budget`, `--exclude`, ...)
    ///   2. Env vars `PRDRAFT_MODEL` / `OPENAI_API_KEY`
    ///   3. TOML `~/.config/prdraft.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Self {
        let file_cfg = load_file_config().unwrap_or_default();

        let model = cli
            .model
            .clone()
            .or_else(|| env::var("PRDRAFT_MODEL").ok())
            .or(file_cfg.model)
            .unwrap_or_else(|| "gpt-4o-mini".to_string());

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .or(file_cfg.openai_api_key);

        let api_base_url = file_cfg
            .api_base_url
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        let ollama_url = cli
            .ollama_url
            .clone()
            .or(file_cfg.ollama_url)
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        let diff_budget = cli.budget.or(file_cfg.diff_budget).unwrap_or(DEFAULT_DIFF_BUDGET);

        // Snapshot order: built-ins, then config file, then CLI extras.
        let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        excludes.extend(file_cfg.exclude.unwrap_or_default());
        excludes.extend(cli.excludes.iter().cloned());

        Config {
            model,
            api_key,
            api_base_url,
            ollama_url,
            diff_budget,
            excludes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub ollama_url: Option<String>,
    pub diff_budget: Option<usize>,
    pub exclude: Option<Vec<String>>,
}

/// Return `~/.config/prdraft.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("prdraft.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    toml::from_str::<FileConfig>(&data).ok()
}
