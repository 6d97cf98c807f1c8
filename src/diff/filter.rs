use super::exclude::PatternSet;
use super::header_target_path;

/// Drop whole per-file sections for excluded paths from a unified diff.
///
/// A `diff --git` header flips the excluding flag for everything up to the
/// next header; a diff with no headers passes through unchanged. The result
/// may be empty when every file is excluded, which callers must treat the
/// same as "no changes".
pub fn filter_diff(diff: &str, excludes: &PatternSet) -> String {
    let mut out = String::with_capacity(diff.len());
    let mut excluding = false;

    for line in diff.lines() {
        if let Some(path) = header_target_path(line) {
            excluding = excludes.matches(path);
            if excluding {
                log::debug!("excluding {path} from diff");
            }
        }
        if !excluding {
            out.push_str(line);
            out.push('\n');
        }
    }

    if !diff.ends_with('\n') && out.ends_with('\n') {
        out.pop();
    }
    out
}
