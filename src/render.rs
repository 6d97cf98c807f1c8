use crate::coerce::{PrType, StructuredPr};

/// Branch and change-count context for the rendered document.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub current_branch: String,
    pub base_branch: String,
    pub commit_count: usize,
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub total_files: usize,
}

/// Badge shown next to the type line. Keyed by the canonical string form;
/// the fallback arm is unreachable after coercion but kept anyway.
fn type_badge(ty: PrType) -> &'static str {
    match ty.as_str() {
        "feature" => "✨",
        "fix" => "🐛",
        "docs" => "📝",
        "style" => "🎨",
        "refactor" => "♻️",
        "perf" => "⚡",
        "test" => "✅",
        "chore" => "🔧",
        "ci" => "🤖",
        "revert" => "⏪",
        _ => "🔹",
    }
}

/// Render a validated record plus run context into the final markdown
/// document. Deterministic: identical inputs yield byte-identical output.
pub fn render(pr: &StructuredPr, ctx: &RunContext) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", pr.title));
    out.push_str(&format!(
        "**Type:** {} {}\n\n",
        type_badge(pr.ty),
        pr.ty.as_str()
    ));
    out.push_str(&format!(
        "**Branch:** `{}` → `{}`\n\n",
        ctx.current_branch, ctx.base_branch
    ));

    out.push_str("## Description\n\n");
    out.push_str(&pr.summary);
    out.push_str("\n\n");

    out.push_str("## Changes\n\n");
    if pr.changes.is_empty() {
        out.push_str("- General code updates\n");
    } else {
        for change in &pr.changes {
            out.push_str(&format!("- {change}\n"));
        }
    }
    out.push('\n');

    if !pr.breaking_changes.is_empty() {
        out.push_str("## Breaking Changes\n\n");
        for breaking in &pr.breaking_changes {
            out.push_str(&format!("- ⚠️ {breaking}\n"));
        }
        out.push('\n');
    }

    if !pr.testing.is_empty() {
        out.push_str("## Testing\n\n");
        out.push_str(&pr.testing);
        out.push_str("\n\n");
    }

    out.push_str("## Stats\n\n");
    out.push_str(&format!("- Commits: {}\n", ctx.commit_count));
    out.push_str(&format!("- Files changed: {}\n", ctx.total_files));
    if ctx.added > 0 {
        out.push_str(&format!("- Added: {}\n", ctx.added));
    }
    if ctx.modified > 0 {
        out.push_str(&format!("- Modified: {}\n", ctx.modified));
    }
    if ctx.deleted > 0 {
        out.push_str(&format!("- Deleted: {}\n", ctx.deleted));
    }
    out.push('\n');

    if !pr.notes.is_empty() {
        out.push_str("## Notes\n\n");
        out.push_str(&pr.notes);
        out.push_str("\n\n");
    }

    out.push_str("## Checklist\n\n");
    out.push_str("- [ ] Code builds and existing tests pass\n");
    out.push_str("- [ ] Self-review completed\n");
    out.push_str("- [ ] Tests added or updated where needed\n");
    out.push_str("- [ ] Documentation updated where needed\n");

    out
}

/// Artifact filename for a branch, e.g. `feature_login_pr.md`.
pub fn output_filename(branch: &str) -> String {
    format!("{}_pr.md", sanitize_component(branch))
}

/// Make a branch name safe as a filename component: unsafe characters,
/// whitespace, and separator runs collapse to single underscores; leading and
/// trailing dots and underscores are stripped; the result is capped at 100
/// characters.
fn sanitize_component(branch: &str) -> String {
    let mut out = String::with_capacity(branch.len());
    let mut last_was_sep = false;

    for ch in branch.chars() {
        let is_sep = matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '_')
            || ch.is_whitespace();
        if is_sep {
            if !last_was_sep {
                out.push('_');
            }
        } else {
            out.push(ch);
        }
        last_was_sep = is_sep;
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let clipped: String = trimmed.chars().take(100).collect();
    if clipped.is_empty() {
        "branch".to_string()
    } else {
        clipped
    }
}
