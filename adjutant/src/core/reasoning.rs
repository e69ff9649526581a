//! Best-effort extraction of reasoning segments from model replies.
//!
//! Planner and presenter replies may carry an internal reasoning trace inside
//! the reserved `<think>...</think>` marker pair. Extraction never fails a
//! run: a malformed or absent marker leaves the whole reply as the remainder.

use std::sync::LazyLock;

use regex::Regex;

static THINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think>(.*?)</think>").expect("reasoning marker pattern should be valid")
});

/// Split a model reply into an optional reasoning segment and the remainder.
///
/// The first marker pair supplies the reasoning; all pairs are removed from
/// the remainder. Both halves are trimmed. A reasoning segment that is empty
/// after trimming is reported as absent.
pub fn extract_reasoning(text: &str) -> (Option<String>, String) {
    let Some(caps) = THINK_RE.captures(text) else {
        return (None, text.trim().to_string());
    };
    let thought = caps.get(1).map_or("", |m| m.as_str()).trim();
    let remainder = THINK_RE.replace_all(text, "").trim().to_string();
    let reasoning = (!thought.is_empty()).then(|| thought.to_string());
    (reasoning, remainder)
}

/// Remainder with every reasoning segment removed and discarded.
pub fn strip_reasoning(text: &str) -> String {
    extract_reasoning(text).1
}
