use crate::coerce::PrType;
use crate::llm::{prompts, PrRequest};

pub struct PromptPair {
    pub system: String,
    pub user: String,
}

pub fn pr_prompt(request: &PrRequest) -> PromptPair {
    let system = prompts::PR_SYSTEM.to_owned();

    let allowed = PrType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut user = String::new();
    user.push_str(&format!(
        "Base branch: {base}\nFeature branch: {from}\nAllowed values for \"type\": {allowed}\n\n",
        base = request.base_branch,
        from = request.from_branch,
    ));

    user.push_str("Commits (oldest first):\n");
    for subject in &request.commits {
        user.push_str(&format!("- {}\n", subject.trim()));
    }

    user.push_str("\nChanged files:\n");
    for file in &request.files {
        user.push_str(&format!("- [{}] {}\n", file.status.as_str(), file.path));
    }

    if !request.stats.trim().is_empty() {
        user.push_str("\nStats:\n");
        user.push_str(request.stats.trim_end());
        user.push('\n');
    }

    user.push_str(&format!("\nDiff:\n```diff\n{}\n```", request.diff));

    PromptPair { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{ChangeStatus, ChangedFile};

    fn sample_request() -> PrRequest {
        PrRequest {
            base_branch: "main".to_string(),
            from_branch: "feature/x".to_string(),
            commits: vec!["Add x".to_string(), "Fix x edge case".to_string()],
            files: vec![ChangedFile {
                status: ChangeStatus::Added,
                path: "src/x.rs".to_string(),
            }],
            stats: " 1 file changed, 10 insertions(+)".to_string(),
            diff: "diff --git a/src/x.rs b/src/x.rs\n+fn x() {}".to_string(),
        }
    }

    #[test]
    fn user_prompt_carries_all_run_context() {
        let pair = pr_prompt(&sample_request());
        assert!(pair.user.contains("Base branch: main"));
        assert!(pair.user.contains("- Add x"));
        assert!(pair.user.contains("- [added] src/x.rs"));
        assert!(pair.user.contains("1 file changed"));
        assert!(pair.user.contains("```diff"));
    }

    #[test]
    fn enum_hint_lists_every_canonical_type() {
        let pair = pr_prompt(&sample_request());
        for ty in PrType::ALL {
            assert!(pair.user.contains(ty.as_str()), "missing {}", ty.as_str());
        }
    }
}
