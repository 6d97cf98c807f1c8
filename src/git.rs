use anyhow::{anyhow, Context, Result};
use std::process::Command as GitCommand;

/// How a file changed between the base and feature branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Deleted => "deleted",
            ChangeStatus::Renamed => "renamed",
        }
    }
}

/// A changed file plus how it changed.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    pub status: ChangeStatus,
    pub path: String,
}

/// Run a git command and capture stdout as String.
pub fn git_output(args: &[&str]) -> Result<String> {
    let output = GitCommand::new("git")
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {:?}", args))?;

    if !output.status.success() {
        return Err(anyhow!(
            "git {:?} exited with status {:?}",
            args,
            output.status.code()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Get the current branch name.
pub fn current_branch() -> Result<String> {
    let name = git_output(&["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string();
    Ok(name)
}

/// True if `name` resolves to a commit.
fn branch_exists(name: &str) -> bool {
    GitCommand::new("git")
        .args(["rev-parse", "--verify", "--quiet", name])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Resolve the base branch: an explicit name is verified, otherwise the
/// first of main/master/develop that exists wins.
pub fn resolve_base_branch(explicit: Option<&str>) -> Result<String> {
    if let Some(name) = explicit {
        if branch_exists(name) {
            return Ok(name.to_string());
        }
        return Err(anyhow!("base branch {name:?} does not exist"));
    }

    for candidate in ["main", "master", "develop"] {
        if branch_exists(candidate) {
            log::info!("auto-detected base branch: {candidate}");
            return Ok(candidate.to_string());
        }
    }

    Err(anyhow!(
        "could not auto-detect a base branch; pass one explicitly"
    ))
}

/// Full diff of the feature branch against its merge base with `base`.
pub fn branch_diff(base: &str, from: &str) -> Result<String> {
    git_output(&["diff", &format!("{base}...{from}")])
}

/// One-line commit summaries in base..from, oldest first.
pub fn commit_summaries(base: &str, from: &str) -> Result<Vec<String>> {
    let range = format!("{base}..{from}");
    let output = git_output(&["log", "--reverse", "--pretty=format:%s", &range])?;
    Ok(output
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Changed files with statuses, from `git diff --name-status`.
pub fn changed_files(base: &str, from: &str) -> Result<Vec<ChangedFile>> {
    let output = git_output(&["diff", "--name-status", &format!("{base}...{from}")])?;
    Ok(parse_name_status(&output))
}

fn parse_name_status(output: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();

    for line in output.lines() {
        let mut fields = line.split('\t');
        let Some(code) = fields.next() else { continue };
        let status = match code.chars().next() {
            Some('A') => ChangeStatus::Added,
            Some('M') => ChangeStatus::Modified,
            Some('D') => ChangeStatus::Deleted,
            Some('R') => ChangeStatus::Renamed,
            _ => continue,
        };
        // Renames carry old and new paths; the last field is the post-image path.
        let Some(path) = fields.last() else { continue };
        if path.is_empty() {
            continue;
        }
        files.push(ChangedFile {
            status,
            path: path.to_string(),
        });
    }

    files
}

/// Free-text stat summary block from `git diff --stat`.
pub fn diff_stat(base: &str, from: &str) -> Result<String> {
    git_output(&["diff", "--stat", &format!("{base}...{from}")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_statuses() {
        let out = "A\tsrc/new.rs\nM\tsrc/lib.rs\nD\told/gone.rs\n";
        let files = parse_name_status(out);
        assert_eq!(files.len(), 3);
        assert_eq!(files[0].status, ChangeStatus::Added);
        assert_eq!(files[1].path, "src/lib.rs");
        assert_eq!(files[2].status, ChangeStatus::Deleted);
    }

    #[test]
    fn rename_keeps_the_new_path() {
        let out = "R100\tsrc/old_name.rs\tsrc/new_name.rs\n";
        let files = parse_name_status(out);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, ChangeStatus::Renamed);
        assert_eq!(files[0].path, "src/new_name.rs");
    }

    #[test]
    fn unknown_codes_and_blank_lines_are_skipped() {
        let out = "\nX\tweird\nM\tsrc/ok.rs\n";
        let files = parse_name_status(out);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/ok.rs");
    }
}
