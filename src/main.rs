mod cli_args;
mod coerce;
mod config;
mod diff;
mod git;
mod llm;
mod logging;
mod render;
mod setup;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli_args::Cli;
use crate::coerce::coerce_reply;
use crate::config::Config;
use crate::diff::compact::compact_diff;
use crate::diff::exclude::PatternSet;
use crate::diff::filter::filter_diff;
use crate::git::{ChangeStatus, ChangedFile};
use crate::llm::{LlmClient, PrRequest};
use crate::render::{output_filename, render, RunContext};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let config = Config::from_sources(&cli);
    let llm = setup::build_llm_client(&cli, &config)?;

    let from_branch = match &cli.from {
        Some(name) => name.clone(),
        None => git::current_branch()?,
    };
    let base_branch = git::resolve_base_branch(cli.base.as_deref())?;

    let raw_diff = git::branch_diff(&base_branch, &from_branch)?;
    let excludes = PatternSet::compile(&config.excludes);
    let filtered = filter_diff(&raw_diff, &excludes);
    if filtered.trim().is_empty() {
        println!("No changes found between {base_branch} and {from_branch}.");
        return Ok(());
    }

    let commits = git::commit_summaries(&base_branch, &from_branch)?;
    let files = git::changed_files(&base_branch, &from_branch)?;
    let stats = git::diff_stat(&base_branch, &from_branch)?;

    let context = run_context(&base_branch, &from_branch, commits.len(), &files);
    let request = PrRequest {
        base_branch,
        from_branch: from_branch.clone(),
        commits,
        files,
        stats,
        diff: compact_diff(&filtered, config.diff_budget),
    };

    // Each loop turn is an independent, stateless generation attempt.
    loop {
        let markdown = match generate_once(llm.as_ref(), &request, &context) {
            Ok(markdown) => markdown,
            Err(err) => {
                eprintln!("{} {err:#}", "Model call failed:".red().bold());
                if cli.save || !confirm_retry()? {
                    return Err(err);
                }
                continue;
            }
        };

        println!();
        println!("{}", "----- PR Description Preview -----".bold());
        println!("{markdown}");
        println!("{}", "----------------------------------".bold());

        if cli.save {
            return write_artifact(&cli, &from_branch, &markdown);
        }

        match prompt_action()? {
            Action::Save => return write_artifact(&cli, &from_branch, &markdown),
            Action::Regenerate => continue,
            Action::Quit => return Ok(()),
        }
    }
}

/// One blocking generation attempt: model call, coercion, rendering.
fn generate_once(llm: &dyn LlmClient, request: &PrRequest, context: &RunContext) -> Result<String> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Generating PR description...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let reply = llm.generate_pr(request);
    spinner.finish_and_clear();
    let reply = reply?;

    let coerced = coerce_reply(&reply);
    if coerced.was_fallback() {
        log::warn!("model reply was not valid JSON; used heuristic extraction");
    }

    Ok(render(&coerced.into_inner(), context))
}

fn run_context(
    base: &str,
    from: &str,
    commit_count: usize,
    files: &[ChangedFile],
) -> RunContext {
    let count = |status: ChangeStatus| files.iter().filter(|f| f.status == status).count();
    RunContext {
        current_branch: from.to_string(),
        base_branch: base.to_string(),
        commit_count,
        added: count(ChangeStatus::Added),
        modified: count(ChangeStatus::Modified),
        deleted: count(ChangeStatus::Deleted),
        total_files: files.len(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Save,
    Regenerate,
    Quit,
}

/// Single-key action menu shown after the preview.
fn prompt_action() -> Result<Action> {
    println!();
    println!("[s]ave  [r]egenerate  [q]uit");

    read_key(|c| match c {
        's' => Some(Action::Save),
        'r' => Some(Action::Regenerate),
        'q' => Some(Action::Quit),
        _ => None,
    })
}

/// After a failed model call: retry or give up.
fn confirm_retry() -> Result<bool> {
    println!("[r]etry  [q]uit");
    read_key(|c| match c {
        'r' => Some(true),
        'q' => Some(false),
        _ => None,
    })
}

/// Read single keypresses in raw mode until `map` accepts one.
fn read_key<T>(map: impl Fn(char) -> Option<T>) -> Result<T> {
    terminal::enable_raw_mode().context("failed to enter raw terminal mode")?;
    let picked = loop {
        match event::read() {
            Ok(Event::Key(KeyEvent { code, .. })) => {
                if let crossterm::event::KeyCode::Char(c) = code {
                    if let Some(choice) = map(c.to_ascii_lowercase()) {
                        break Ok(choice);
                    }
                }
            }
            Ok(_) => {}
            Err(err) => break Err(err.into()),
        }
    };
    let _ = terminal::disable_raw_mode();
    picked
}

fn write_artifact(cli: &Cli, branch: &str, markdown: &str) -> Result<()> {
    let path = match &cli.out {
        Some(path) => path.clone(),
        None => PathBuf::from(output_filename(branch)),
    };
    fs::write(&path, markdown)
        .with_context(|| format!("failed to write PR description to {path:?}"))?;
    println!("{} {}", "Saved".green().bold(), path.display());
    Ok(())
}
