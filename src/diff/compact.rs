use super::header_target_path;

/// One file's worth of a unified diff, reduced to its changed lines.
///
/// `lines` keeps only `@@` hunk markers and added/removed content lines;
/// unchanged context is dropped at split time.
#[derive(Debug)]
struct FileChunk {
    header: String,
    path: String,
    lines: Vec<String>,
}

/// Bound a diff to roughly `budget` characters while keeping every file
/// represented and marking every omission explicitly.
///
/// Small diffs are returned verbatim. Large diffs are split per file, each
/// file gets a fair line allowance, and anything hidden or omitted is named
/// in a marker. The output can overshoot the budget by a small constant
/// factor; it never loses a file silently. A zero budget degrades to
/// header-only output per file.
pub fn compact_diff(diff: &str, budget: usize) -> String {
    if diff.len() <= budget {
        return diff.to_string();
    }

    let chunks = split_chunks(diff);
    if chunks.is_empty() {
        // No file headers to apportion; hard-cut at the budget instead.
        return truncate_plain(diff, budget);
    }

    let allowance = if budget == 0 {
        0
    } else {
        (budget / (60 * chunks.len())).max(10)
    };

    let mut out = String::new();
    for (idx, chunk) in chunks.iter().enumerate() {
        if budget > 0 && out.len() > budget {
            let rest = &chunks[idx..];
            let names = rest
                .iter()
                .map(|c| c.path.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "[... {} more file(s) omitted: {names} ...]\n",
                rest.len()
            ));
            break;
        }

        out.push_str(&chunk.header);
        out.push('\n');
        for line in chunk.lines.iter().take(allowance) {
            out.push_str(line);
            out.push('\n');
        }
        if chunk.lines.len() > allowance {
            out.push_str(&format!(
                "[... {} changed line(s) hidden in {} ...]\n",
                chunk.lines.len() - allowance,
                chunk.path
            ));
        }
    }
    out
}

fn split_chunks(diff: &str) -> Vec<FileChunk> {
    let mut chunks: Vec<FileChunk> = Vec::new();

    for line in diff.lines() {
        if line.starts_with("diff --git ") {
            let path = header_target_path(line).unwrap_or_default().to_string();
            chunks.push(FileChunk {
                header: line.to_string(),
                path,
                lines: Vec::new(),
            });
        } else if let Some(chunk) = chunks.last_mut() {
            if line.starts_with("@@") || is_change_line(line) {
                chunk.lines.push(line.to_string());
            }
        }
    }

    chunks
}

/// Added/removed content lines, not the `+++`/`---` file markers.
fn is_change_line(line: &str) -> bool {
    (line.starts_with('+') && !line.starts_with("+++"))
        || (line.starts_with('-') && !line.starts_with("---"))
}

fn truncate_plain(text: &str, budget: usize) -> String {
    let mut cut = budget;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!(
        "{}\n[... {} more character(s) truncated ...]\n",
        &text[..cut],
        text.len() - cut
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A synthetic per-file diff section with `changed` +/- lines.
    fn file_section(path: &str, changed: usize) -> String {
        let mut s = format!(
            "diff --git a/{path} b/{path}\nindex 0000000..1111111 100644\n--- a/{path}\n+++ b/{path}\n@@ -1,{changed} +1,{changed} @@\n"
        );
        for i in 0..changed {
            s.push_str(&format!(" let context_{i} = {i}; // kept out of chunks\n"));
            s.push_str(&format!("-let old_value_{i} = {i};\n"));
            s.push_str(&format!("+let new_value_{i} = {i} + 1;\n"));
        }
        s
    }

    #[test]
    fn small_diff_returned_verbatim() {
        let diff = file_section("src/lib.rs", 3);
        assert_eq!(compact_diff(&diff, 8000), diff);
    }

    #[test]
    fn three_large_files_all_keep_headers_within_bounded_length() {
        let mut diff = String::new();
        for path in ["src/a.rs", "src/b.rs", "src/c.rs"] {
            diff.push_str(&file_section(path, 120));
        }
        assert!(diff.len() > 30_000);

        let budget = 8000;
        let out = compact_diff(&diff, budget);

        for path in ["src/a.rs", "src/b.rs", "src/c.rs"] {
            assert!(
                out.contains(&format!("diff --git a/{path} b/{path}")),
                "missing header for {path}"
            );
        }
        assert!(out.len() <= budget * 3 / 2, "output too long: {}", out.len());
    }

    #[test]
    fn over_allowance_files_get_hidden_line_markers() {
        let diff = file_section("src/big.rs", 200);
        let out = compact_diff(&diff, 1000);

        // allowance = max(10, 1000/60) = 16, so 2*200 + 1 hunk lines shrink
        assert!(out.contains("changed line(s) hidden in src/big.rs"));
        assert!(out.len() < diff.len());
    }

    #[test]
    fn context_lines_are_not_retained() {
        let diff = file_section("src/ctx.rs", 50);
        let out = compact_diff(&diff, 600);
        assert!(!out.contains("kept out of chunks"));
    }

    #[test]
    fn omitted_files_are_named_in_trailing_marker() {
        let mut diff = String::new();
        for i in 0..40 {
            diff.push_str(&file_section(&format!("src/file_{i}.rs"), 80));
        }

        let out = compact_diff(&diff, 2000);
        for i in 0..40 {
            let header = format!("diff --git a/src/file_{i}.rs");
            let named = format!("src/file_{i}.rs");
            assert!(
                out.contains(&header) || trailing_marker(&out).contains(&named),
                "file_{i} neither emitted nor named in the omission marker"
            );
        }
    }

    fn trailing_marker(out: &str) -> &str {
        out.lines()
            .rev()
            .find(|l| l.starts_with("[... ") && l.contains("omitted"))
            .unwrap_or("")
    }

    #[test]
    fn zero_budget_degrades_to_headers_and_markers_only() {
        let mut diff = String::new();
        for path in ["src/a.rs", "src/b.rs"] {
            diff.push_str(&file_section(path, 20));
        }

        let out = compact_diff(&diff, 0);
        assert!(out.contains("diff --git a/src/a.rs"));
        assert!(out.contains("diff --git a/src/b.rs"));
        assert!(!out.contains("+let new_value_"));
    }

    #[test]
    fn headerless_oversized_text_is_cut_with_a_marker() {
        let text = "x".repeat(500);
        let out = compact_diff(&text, 100);
        assert!(out.starts_with(&"x".repeat(100)));
        assert!(out.contains("400 more character(s) truncated"));
    }
}
