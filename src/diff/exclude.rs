use regex::Regex;

/// One exclusion pattern, with its glob form precompiled when it has one.
#[derive(Debug)]
struct CompiledPattern {
    raw: String,
    glob: Option<Regex>,
}

/// An ordered set of exclusion patterns, compiled once per run and reused
/// across every candidate path.
#[derive(Debug)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| {
                let raw = p.as_ref().to_string();
                let glob = if raw.contains('*') {
                    // Anchored literal match except '*', which spans anything.
                    let expr = format!("^{}$", regex::escape(&raw).replace(r"\*", ".*"));
                    Some(Regex::new(&expr).expect("escaped glob pattern is valid regex"))
                } else {
                    None
                };
                CompiledPattern { raw, glob }
            })
            .collect();
        PatternSet { patterns }
    }

    /// True if any pattern matches the path. Pure and total.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| pattern_matches(p, path))
    }
}

/// Ordered matching cascade for a single pattern, first hit wins:
/// exact, `*suffix`, `prefix/*`, embedded-wildcard glob, bare basename.
fn pattern_matches(pattern: &CompiledPattern, path: &str) -> bool {
    let raw = pattern.raw.as_str();

    if path == raw {
        return true;
    }

    if let Some(suffix) = raw.strip_prefix('*') {
        if path.ends_with(suffix) {
            return true;
        }
    }

    if let Some(prefix) = raw.strip_suffix("/*") {
        if path == prefix || (path.starts_with(prefix) && path[prefix.len()..].starts_with('/')) {
            return true;
        }
    }

    if let Some(glob) = &pattern.glob {
        if glob.is_match(path) {
            return true;
        }
    }

    let basename = path.rsplit('/').next().unwrap_or(path);
    basename == raw
}
