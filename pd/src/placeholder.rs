//! Placeholder extraction
//!
//! A placeholder is a span enclosed in `【】` or `[]` on a single line, e.g.
//! `【会社名】` or `[topic]`. The span ends at the nearest closing bracket of
//! the same kind.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【([^\r\n]*?)】|\[([^\r\n]*?)\]").expect("placeholder regex is valid"));

/// Distinct placeholder names in `body`, delimiters stripped
pub fn extract(body: &str) -> BTreeSet<String> {
    let names: BTreeSet<String> = matches(body).map(str::to_string).collect();
    debug!(count = names.len(), "extract: found placeholders");
    names
}

/// Distinct placeholder names in order of first appearance
pub fn extract_in_order(body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in matches(body) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    debug!(count = names.len(), "extract_in_order: found placeholders");
    names
}

/// Replace every placeholder span of `body` in a single left-to-right pass
///
/// `replacement` gets the placeholder name; `None` keeps the span as written.
/// Replacement text is never scanned again.
pub(crate) fn replace_all<F>(body: &str, mut replacement: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(body, |caps: &Captures<'_>| {
            replacement(name_of(caps)).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn matches(body: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER_RE.captures_iter(body).map(|caps| name_of(&caps))
}

fn name_of<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str())
}
