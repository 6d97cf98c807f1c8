use serde_json::Value;

const TITLE_MAX: usize = 72;
const SUMMARY_MAX: usize = 500;
const FALLBACK_TITLE: &str = "Update code";

/// Canonical change categories a PR can be labeled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrType {
    Feature,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Chore,
    Ci,
    Revert,
}

impl PrType {
    pub const ALL: [PrType; 10] = [
        PrType::Feature,
        PrType::Fix,
        PrType::Docs,
        PrType::Style,
        PrType::Refactor,
        PrType::Perf,
        PrType::Test,
        PrType::Chore,
        PrType::Ci,
        PrType::Revert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrType::Feature => "feature",
            PrType::Fix => "fix",
            PrType::Docs => "docs",
            PrType::Style => "style",
            PrType::Refactor => "refactor",
            PrType::Perf => "perf",
            PrType::Test => "test",
            PrType::Chore => "chore",
            PrType::Ci => "ci",
            PrType::Revert => "revert",
        }
    }

    /// Accept loose spellings from the model; anything unrecognized lands on
    /// Chore rather than failing.
    fn from_loose(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "feature" | "feat" => PrType::Feature,
            "fix" | "bug" | "bugfix" => PrType::Fix,
            "docs" | "doc" | "documentation" => PrType::Docs,
            "style" => PrType::Style,
            "refactor" => PrType::Refactor,
            "perf" | "performance" => PrType::Perf,
            "test" | "tests" | "testing" => PrType::Test,
            "chore" | "maintenance" | "build" => PrType::Chore,
            "ci" => PrType::Ci,
            "revert" => PrType::Revert,
            _ => PrType::Chore,
        }
    }
}

/// A validated, fully populated PR description record.
///
/// Invariants hold after coercion: the title is at most 72 characters, the
/// type is canonical, and both lists contain only trimmed non-empty strings.
#[derive(Debug, Clone)]
pub struct StructuredPr {
    pub title: String,
    pub ty: PrType,
    pub summary: String,
    pub changes: Vec<String>,
    pub breaking_changes: Vec<String>,
    pub testing: String,
    pub notes: String,
}

/// Outcome of coercing a model reply. `Fallback` means the strict JSON path
/// failed and heuristic text extraction filled the record instead; either way
/// the record satisfies every invariant.
#[derive(Debug)]
pub enum Coerced {
    Parsed(StructuredPr),
    Fallback(StructuredPr),
}

impl Coerced {
    pub fn was_fallback(&self) -> bool {
        matches!(self, Coerced::Fallback(_))
    }

    pub fn into_inner(self) -> StructuredPr {
        match self {
            Coerced::Parsed(pr) | Coerced::Fallback(pr) => pr,
        }
    }
}

/// Turn a raw model reply into a StructuredPr, no matter what it contains.
pub fn coerce_reply(raw: &str) -> Coerced {
    match parse_strict(raw) {
        Some(pr) => Coerced::Parsed(pr),
        None => Coerced::Fallback(extract_heuristic(raw)),
    }
}

fn parse_strict(raw: &str) -> Option<StructuredPr> {
    let body = strip_fences(raw);
    let span = isolate_object(body)?;
    let value: Value = serde_json::from_str(span).ok()?;
    let obj = value.as_object()?;

    // title/type/summary must be present and string-typed; anything else
    // sends the whole reply down the heuristic path.
    let title = obj.get("title")?.as_str()?;
    let ty = obj.get("type")?.as_str()?;
    let summary = obj.get("summary")?.as_str()?;

    Some(StructuredPr {
        title: clip(title.trim(), TITLE_MAX),
        ty: PrType::from_loose(ty),
        summary: summary.trim().to_string(),
        changes: string_list(obj.get("changes")),
        breaking_changes: string_list(obj.get("breaking_changes")),
        testing: string_or_empty(obj.get("testing")),
        notes: string_or_empty(obj.get("notes")),
    })
}

/// Drop surrounding ``` / ```json fence lines the model may wrap a reply in.
fn strip_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if s.starts_with("```") {
        s = match s.find('\n') {
            Some(idx) => &s[idx + 1..],
            None => "",
        };
    }
    let trimmed = s.trim_end();
    if trimmed.ends_with("```") {
        s = &trimmed[..trimmed.len() - 3];
    }
    s
}

/// First `{` through last `}`, discarding any surrounding prose.
fn isolate_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Coerce a field into a list of trimmed non-empty strings: a bare string
/// wraps to one element, null/absent becomes empty, junk elements drop out.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn string_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Character-safe truncation; the limits are in characters, not bytes.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Last-resort extraction from a reply that never parsed as JSON.
fn extract_heuristic(raw: &str) -> StructuredPr {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let title = lines
        .first()
        .map(|l| clip(l, TITLE_MAX))
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    let summary = clip(
        &lines.iter().take(3).copied().collect::<Vec<_>>().join(" "),
        SUMMARY_MAX,
    );

    let changes = lines
        .iter()
        .filter_map(|l| l.strip_prefix('-').or_else(|| l.strip_prefix('*')))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    StructuredPr {
        title,
        ty: PrType::Chore,
        summary,
        changes,
        breaking_changes: Vec::new(),
        testing: String::new(),
        notes: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_REPLY: &str = r#"{
        "title": "Add login rate limiting",
        "type": "feat",
        "summary": "Limits login attempts per IP.",
        "changes": ["Add limiter middleware", "Wire it into the login route"],
        "breaking_changes": [],
        "testing": "cargo test plus manual lockout check",
        "notes": ""
    }"#;

    #[test]
    fn well_formed_reply_parses_strictly() {
        let coerced = coerce_reply(GOOD_REPLY);
        assert!(!coerced.was_fallback());
        let pr = coerced.into_inner();
        assert_eq!(pr.title, "Add login rate limiting");
        assert_eq!(pr.ty, PrType::Feature);
        assert_eq!(pr.changes.len(), 2);
        assert_eq!(pr.testing, "cargo test plus manual lockout check");
    }

    #[test]
    fn fenced_reply_with_surrounding_prose_still_parses() {
        let wrapped = format!("Here you go!\n```json\n{GOOD_REPLY}\n```\nHope that helps.");
        let coerced = coerce_reply(&wrapped);
        assert!(!coerced.was_fallback());
        assert_eq!(coerced.into_inner().title, "Add login rate limiting");
    }

    #[test]
    fn bare_string_changes_wraps_to_single_element() {
        let reply = r#"{"title": "t", "type": "fix", "summary": "s", "changes": "one thing"}"#;
        let pr = coerce_reply(reply).into_inner();
        assert_eq!(pr.changes, vec!["one thing".to_string()]);
    }

    #[test]
    fn missing_changes_becomes_empty_list() {
        let reply = r#"{"title": "t", "type": "fix", "summary": "s"}"#;
        let pr = coerce_reply(reply).into_inner();
        assert!(pr.changes.is_empty());
        assert!(pr.breaking_changes.is_empty());
    }

    #[test]
    fn null_and_junk_list_elements_are_dropped() {
        let reply = r#"{"title": "t", "type": "fix", "summary": "s",
            "changes": ["  ok  ", "", null, 7, "also ok"]}"#;
        let pr = coerce_reply(reply).into_inner();
        assert_eq!(pr.changes, vec!["ok".to_string(), "also ok".to_string()]);
    }

    #[test]
    fn type_synonyms_map_to_canonical_values() {
        for (loose, expected) in [
            ("feat", PrType::Feature),
            ("bug", PrType::Fix),
            ("bugfix", PrType::Fix),
            ("doc", PrType::Docs),
            ("documentation", PrType::Docs),
            ("tests", PrType::Test),
            ("testing", PrType::Test),
            ("performance", PrType::Perf),
            ("maintenance", PrType::Chore),
            ("build", PrType::Chore),
            ("Feature", PrType::Feature),
        ] {
            assert_eq!(PrType::from_loose(loose), expected, "for {loose:?}");
        }
    }

    #[test]
    fn unrecognized_type_defaults_to_chore() {
        let reply = r#"{"title": "t", "type": "unknowntype123", "summary": "s"}"#;
        assert_eq!(coerce_reply(reply).into_inner().ty, PrType::Chore);
    }

    #[test]
    fn non_string_testing_coerces_to_empty() {
        let reply = r#"{"title": "t", "type": "fix", "summary": "s", "testing": 42, "notes": ["x"]}"#;
        let pr = coerce_reply(reply).into_inner();
        assert_eq!(pr.testing, "");
        assert_eq!(pr.notes, "");
    }

    #[test]
    fn overlong_title_is_truncated_to_72_chars() {
        let long = "x".repeat(200);
        let reply = format!(r#"{{"title": "{long}", "type": "fix", "summary": "s"}}"#);
        let pr = coerce_reply(&reply).into_inner();
        assert_eq!(pr.title.chars().count(), 72);
    }

    #[test]
    fn missing_required_field_falls_back() {
        let reply = r#"{"title": "t", "summary": "no type field"}"#;
        assert!(coerce_reply(reply).was_fallback());
    }

    #[test]
    fn wrong_typed_required_field_falls_back() {
        let reply = r#"{"title": 17, "type": "fix", "summary": "s"}"#;
        assert!(coerce_reply(reply).was_fallback());
    }

    #[test]
    fn plain_prose_falls_back_with_populated_record() {
        let coerced = coerce_reply("not json at all");
        assert!(coerced.was_fallback());
        let pr = coerced.into_inner();
        assert_eq!(pr.title, "not json at all");
        assert_eq!(pr.ty, PrType::Chore);
        assert!(pr.breaking_changes.is_empty());
    }

    #[test]
    fn fallback_collects_bullet_lines_as_changes() {
        let coerced = coerce_reply("Reworked the parser\n\n- split lexer\n* new AST types\n");
        let pr = coerced.into_inner();
        assert_eq!(pr.title, "Reworked the parser");
        assert_eq!(
            pr.changes,
            vec!["split lexer".to_string(), "new AST types".to_string()]
        );
    }

    #[test]
    fn empty_reply_falls_back_to_default_title() {
        let pr = coerce_reply("").into_inner();
        assert_eq!(pr.title, "Update code");
        assert_eq!(pr.ty, PrType::Chore);
    }
}
